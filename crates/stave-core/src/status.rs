//! Single-job status tracking.
//!
//! The push channel is best-effort: updates can arrive duplicated, out of
//! order, or for jobs other clients submitted. [`StatusStore`] reconciles
//! that stream into one monotone view of the bound job, so the progress UI
//! never moves backwards and never shows someone else's job.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Latest known state of one transcription job, as delivered in a
/// `job_update` push event.
///
/// The backend broadcasts its whole job record; only these fields matter to
/// the client and the rest are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Backend-assigned job id.
    pub id: String,
    /// Current pipeline stage (wire field `step`).
    #[serde(rename = "step")]
    pub stage: Stage,
    /// Overall progress, 0..=100.
    #[serde(default)]
    pub progress: u8,
    /// Video title, known once the download stage resolves it.
    #[serde(default)]
    pub title: Option<String>,
    /// Failure message, set on `error` updates.
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of [`StatusStore::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Update accepted and stored.
    Accepted,
    /// Update was for a job other than the bound one; dropped.
    Foreign,
    /// Update's stage is older than the stored one; dropped.
    Stale,
    /// The store already absorbed a terminal error; dropped.
    Terminal,
}

/// Process-wide store for the one job this client is watching.
///
/// The first accepted update binds the store to that job id; the app also
/// binds explicitly once the submission response returns, which closes the
/// window where another client's broadcast could claim the binding.
#[derive(Debug, Default)]
pub struct StatusStore {
    bound_id: Option<String>,
    status: Option<JobStatus>,
    /// Last non-error stage, kept for the step display after a failure.
    display_stage: Option<Stage>,
    terminal: bool,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the store to a job id ahead of its first update.
    ///
    /// Call after a successful submission, on a freshly reset store.
    pub fn bind(&mut self, id: impl Into<String>) {
        self.bound_id = Some(id.into());
    }

    /// Reconcile one inbound update. See [`Applied`] for the verdicts.
    ///
    /// Ordering guard: a non-error update whose stage index is below the
    /// stored one is a late delivery and is dropped. Error always overrides
    /// and latches the store shut until [`reset`](Self::reset).
    pub fn apply(&mut self, mut update: JobStatus) -> Applied {
        if self.terminal {
            return Applied::Terminal;
        }

        match &self.bound_id {
            Some(id) if *id != update.id => return Applied::Foreign,
            Some(_) => {}
            None => self.bound_id = Some(update.id.clone()),
        }

        if update.stage != Stage::Error {
            if let Some(current) = &self.status {
                if update.stage.index() < current.stage.index() {
                    return Applied::Stale;
                }
            }
        }

        if update.title.as_deref() == Some("") {
            update.title = None;
        }
        update.progress = update.progress.min(100);

        if update.stage == Stage::Error {
            self.terminal = true;
        } else {
            self.display_stage = Some(update.stage);
        }
        self.status = Some(update);
        Applied::Accepted
    }

    /// Forget the job and accept a fresh binding.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn bound_id(&self) -> Option<&str> {
        self.bound_id.as_deref()
    }

    pub fn status(&self) -> Option<&JobStatus> {
        self.status.as_ref()
    }

    /// Stage of the latest accepted update, including `error`.
    pub fn stage(&self) -> Option<Stage> {
        self.status.as_ref().map(|s| s.stage)
    }

    /// Stage to render progress against: the last non-error stage, so a
    /// failed job keeps its partial progress under the error banner.
    pub fn display_stage(&self) -> Stage {
        self.display_stage.unwrap_or(Stage::Queued)
    }

    pub fn progress(&self) -> u8 {
        self.status.as_ref().map(|s| s.progress).unwrap_or(0)
    }

    pub fn title(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.title.as_deref())
    }

    /// Failure message once a terminal error was absorbed.
    pub fn error(&self) -> Option<&str> {
        if !self.terminal {
            return None;
        }
        Some(
            self.status
                .as_ref()
                .and_then(|s| s.error.as_deref())
                .unwrap_or("transcription failed"),
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_complete(&self) -> bool {
        self.stage() == Some(Stage::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: &str, stage: Stage, progress: u8) -> JobStatus {
        JobStatus {
            id: id.to_string(),
            stage,
            progress,
            title: None,
            error: None,
        }
    }

    #[test]
    fn test_first_update_binds() {
        let mut store = StatusStore::new();
        assert_eq!(store.apply(update("a", Stage::Queued, 0)), Applied::Accepted);
        assert_eq!(store.bound_id(), Some("a"));
    }

    #[test]
    fn test_foreign_id_is_discarded() {
        let mut store = StatusStore::new();
        store.apply(update("a", Stage::Downloading, 10));
        assert_eq!(store.apply(update("b", Stage::Complete, 100)), Applied::Foreign);
        assert_eq!(store.stage(), Some(Stage::Downloading));
        assert_eq!(store.progress(), 10);
    }

    #[test]
    fn test_stale_stage_is_discarded() {
        let mut store = StatusStore::new();
        store.apply(update("a", Stage::Transcribing, 55));
        assert_eq!(store.apply(update("a", Stage::Downloading, 5)), Applied::Stale);
        assert_eq!(store.stage(), Some(Stage::Transcribing));
        assert_eq!(store.progress(), 55);
    }

    #[test]
    fn test_same_stage_progress_advances() {
        let mut store = StatusStore::new();
        store.apply(update("a", Stage::Downloading, 10));
        assert_eq!(store.apply(update("a", Stage::Downloading, 25)), Applied::Accepted);
        assert_eq!(store.progress(), 25);
    }

    #[test]
    fn test_error_overrides_and_latches() {
        let mut store = StatusStore::new();
        store.apply(update("a", Stage::Transcribing, 55));

        let mut failed = update("a", Stage::Error, 55);
        failed.error = Some("video unavailable".to_string());
        assert_eq!(store.apply(failed), Applied::Accepted);
        assert_eq!(store.error(), Some("video unavailable"));

        // Nothing gets through after the terminal error, not even complete.
        assert_eq!(store.apply(update("a", Stage::Complete, 100)), Applied::Terminal);
        // The step display keeps the last good stage.
        assert_eq!(store.display_stage(), Stage::Transcribing);
    }

    #[test]
    fn test_explicit_bind_blocks_other_jobs() {
        let mut store = StatusStore::new();
        store.bind("mine");
        assert_eq!(store.apply(update("theirs", Stage::Queued, 0)), Applied::Foreign);
        assert_eq!(store.apply(update("mine", Stage::Queued, 0)), Applied::Accepted);
    }

    #[test]
    fn test_reset_unbinds() {
        let mut store = StatusStore::new();
        let mut failed = update("a", Stage::Error, 0);
        failed.error = Some("boom".to_string());
        store.apply(failed);
        store.reset();
        assert_eq!(store.bound_id(), None);
        assert!(!store.is_terminal());
        assert_eq!(store.apply(update("b", Stage::Queued, 0)), Applied::Accepted);
    }

    #[test]
    fn test_title_and_progress_normalization() {
        let mut store = StatusStore::new();
        let mut first = update("a", Stage::Downloading, 120);
        first.title = Some(String::new());
        store.apply(first);
        assert_eq!(store.title(), None);
        assert_eq!(store.progress(), 100);
    }

    #[test]
    fn test_wire_deserialization_ignores_extra_fields() {
        let json = r#"{
            "id": "j1", "status": "processing", "step": "downloaded",
            "progress": 30, "title": "Some Song", "error": null,
            "audio_path": "/tmp/a.wav", "duration": 183.2
        }"#;
        let status: JobStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.stage, Stage::Downloaded);
        assert_eq!(status.title.as_deref(), Some("Some Song"));
    }

    #[test]
    fn test_unknown_stage_fails_deserialization() {
        let json = r#"{"id": "j1", "step": "uploading", "progress": 10}"#;
        assert!(serde_json::from_str::<JobStatus>(json).is_err());
    }
}
