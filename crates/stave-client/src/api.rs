//! REST client for the transcription backend.

use std::io::Write;
use std::path::Path;

use futures_util::StreamExt;
use serde::Deserialize;

use stave_core::{JobStatus, NoteEvent};

/// Error type for backend API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend refused the request; carries its `{error}` message.
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to write download: {0}")]
    Io(#[from] std::io::Error),
}

/// Response to a successful job submission.
#[derive(Debug, Clone, Deserialize)]
pub struct JobAccepted {
    pub job_id: String,
}

/// The note events of a completed job, as served by `GET /notes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteSheet {
    #[serde(default)]
    pub notes: Vec<NoteEvent>,
    /// Track duration in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Thin wrapper around a shared `reqwest::Client` with the backend base URL.
#[derive(Debug, Clone)]
pub struct Api {
    base: String,
    http: reqwest::Client,
}

/// Error body the backend returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl Api {
    /// Create a client for the given base URL, e.g. `http://localhost:5001/api`.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    /// Submit a transcription job for a video link.
    pub async fn submit(&self, url: &str, instrument: &str) -> Result<JobAccepted, ApiError> {
        let response = self
            .http
            .post(format!("{}/transcribe", self.base))
            .json(&serde_json::json!({ "url": url, "instrument": instrument }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("backend rejected the request ({status})"));
            return Err(ApiError::Rejected(message));
        }

        Ok(response.json().await?)
    }

    /// Fetch the note events of a completed job.
    pub async fn fetch_notes(&self, job_id: &str) -> Result<NoteSheet, ApiError> {
        let response = self
            .http
            .get(format!("{}/notes/{job_id}", self.base))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Poll the current job status over HTTP.
    ///
    /// Fallback for when the push channel is down; feeds the same store as
    /// the pushed updates.
    pub async fn fetch_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        let response = self
            .http
            .get(format!("{}/status/{job_id}", self.base))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// URL of the streamable audio for a job.
    pub fn audio_url(&self, job_id: &str) -> String {
        format!("{}/audio/{job_id}", self.base)
    }

    /// URL of the generated score PDF for a job.
    pub fn download_url(&self, job_id: &str) -> String {
        format!("{}/download/{job_id}", self.base)
    }

    /// Download the job's audio to `dest` for local playback.
    pub async fn download_audio(&self, job_id: &str, dest: &Path) -> Result<(), ApiError> {
        self.download_to(&self.audio_url(job_id), dest).await
    }

    /// Download the job's score PDF to `dest`.
    pub async fn download_pdf(&self, job_id: &str, dest: &Path) -> Result<(), ApiError> {
        self.download_to(&self.download_url(job_id), dest).await
    }

    /// Fetch a small resource (e.g. a video thumbnail) into memory.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<(), ApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;

        let mut file = std::fs::File::create(dest)?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        file.flush()?;

        log::info!("downloaded {url} to {dest:?} ({written} bytes)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = Api::new("http://localhost:5001/api/");
        assert_eq!(api.audio_url("j1"), "http://localhost:5001/api/audio/j1");
        assert_eq!(api.download_url("j1"), "http://localhost:5001/api/download/j1");
    }

    #[test]
    fn test_note_sheet_defaults() {
        let sheet: NoteSheet = serde_json::from_str("{}").unwrap();
        assert!(sheet.notes.is_empty());
        assert_eq!(sheet.duration, 0.0);
        assert_eq!(sheet.title, None);
    }

    #[test]
    fn test_note_sheet_parses_backend_shape() {
        let json = r#"{
            "notes": [{"start": 0.5, "end": 1.0, "pitch": 60, "name": "C4"}],
            "duration": 183.2,
            "title": "Some Song",
            "instrument": "piano"
        }"#;
        let sheet: NoteSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.notes.len(), 1);
        assert_eq!(sheet.notes[0].name, "C4");
        assert_eq!(sheet.title.as_deref(), Some("Some Song"));
    }
}
