//! Backend boundary for stave
//!
//! Two transports talk to the transcription backend:
//!
//! - [`Api`]: plain HTTP for job submission, note/status fetches, and
//!   artifact downloads.
//! - [`PushChannel`]: a long-lived WebSocket carrying `job_update` events
//!   inbound and realtime playback events outbound.
//!
//! # Architecture
//!
//! ```text
//! backend WS → reader task → flume channel → app tick handler
//! app → SyncPublisher → flume channel → writer task → backend WS
//! ```
//!
//! The socket tasks are plain tokio tasks owned by the [`PushChannel`]
//! handle; the app never touches the socket directly. Outbound publishing
//! is fire-and-forget and the local UI stays authoritative when the channel
//! is down.

pub mod api;
pub mod publisher;
pub mod push;

pub use api::{Api, ApiError, JobAccepted, NoteSheet};
pub use publisher::SyncPublisher;
pub use push::{PushChannel, PushError};
