//! Core domain logic for stave
//!
//! This crate holds everything the GUI and network crates share, with no UI
//! or I/O dependencies of its own:
//!
//! - [`Stage`]: the backend pipeline stages and their total order
//! - [`StatusStore`]: reconciliation of push-channel job updates
//! - [`step_state`]: derivation of the three-step progress display
//! - [`NoteIndex`]: time-indexed note lookup for the realtime listener
//! - [`PlaybackClock`]: the idle/running sampling gate for playback ticks
//! - [`ClientEvent`]/[`ServerEvent`]: the push-channel wire vocabulary
//!
//! Everything here is synchronous and deterministic; the async plumbing
//! lives in `stave-client` and `stave-app`.

pub mod clock;
pub mod notes;
pub mod stage;
pub mod status;
pub mod step;
pub mod sync;

pub use clock::{MediaTransport, PlaybackClock, PlaybackSnapshot, WallClockTransport};
pub use notes::{NoteEvent, NoteIndex};
pub use stage::{Stage, StageParseError};
pub use status::{Applied, JobStatus, StatusStore};
pub use step::{step_state, StepDefinition, StepState, STEPS};
pub use sync::{ClientEvent, ServerEvent};
