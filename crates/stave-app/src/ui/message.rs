//! Application messages for stave
//!
//! All message types that can be dispatched in the stave application.

use std::path::PathBuf;
use std::sync::Arc;

use stave_client::{JobAccepted, NoteSheet, PushChannel};
use stave_core::JobStatus;

/// Messages that can be sent to the application
#[derive(Debug, Clone)]
pub enum Message {
    // Session
    /// Push-channel connect attempt finished
    ChannelConnected(Result<Arc<PushChannel>, String>),
    /// Periodic drain of the push-channel inbox
    PollChannel,
    /// Fallback HTTP status poll fired (push channel down)
    PollStatus,
    /// Fallback HTTP status poll returned
    StatusPolled(Result<JobStatus, String>),

    // Input phase
    /// URL field edited
    UrlChanged(String),
    /// Clear button on the URL field
    ClearUrl,
    /// Thumbnail fetched for a recognized video link
    ThumbnailLoaded(Result<iced::widget::image::Handle, String>),
    /// Instrument card clicked (index into the instrument table)
    PickInstrument(usize),
    /// Generate button pressed
    Submit,
    /// Job submission response
    Submitted(Result<JobAccepted, String>),
    /// Instrument preference persisted to disk
    ConfigSaved(Result<(), String>),
    /// Error banner dismissed
    DismissError,

    // Result phase
    /// Note sheet fetched for the completed job
    NotesFetched(Result<Arc<NoteSheet>, String>),
    /// Audio downloaded to the local cache
    AudioCached(Result<PathBuf, String>),
    /// Play/pause toggle in the listener
    TogglePlayback,
    /// Playback sample tick while the clock runs
    Tick,
    /// Seek slider moved (seconds)
    Seek(f64),
    /// Playback rate button (0.5x - 1.5x)
    SetRate(f64),
    /// Save PDF button pressed
    SavePdf,
    /// Destination picked in the save dialog (None = cancelled)
    PdfDestinationPicked(Option<PathBuf>),
    /// PDF download finished
    PdfSaved(Result<PathBuf, String>),

    /// Back to the input phase
    Reset,
}
