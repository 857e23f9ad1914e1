//! Push-channel wire vocabulary.
//!
//! Every frame on the channel is a JSON envelope `{"event": ..., "data": ...}`.
//! Both directions map onto closed enums here, so unrecognized events fail
//! to deserialize at the boundary instead of leaking into the app.

use serde::{Deserialize, Serialize};

use crate::status::JobStatus;

/// Events this client emits. Fire-and-forget: never acknowledged, never
/// retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Playback started for the bound job.
    RealtimeStart { job_id: String },
    /// Periodic position report while playing.
    RealtimeSync { position: f64, playing: bool },
    /// The user scrubbed to a new position.
    RealtimeSeek { position: f64 },
    /// Playback paused.
    RealtimePause,
}

/// Events the backend pushes to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Pipeline progress for some job (not necessarily ours).
    JobUpdate(JobStatus),
    /// Echo of the backend's realtime session state. Observed, unused.
    RealtimeState(serde_json::Value),
    /// Backend-side failure of a realtime request.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;

    #[test]
    fn test_client_event_envelopes() {
        let json = serde_json::to_string(&ClientEvent::RealtimeSync {
            position: 12.5,
            playing: true,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"event":"realtime_sync","data":{"position":12.5,"playing":true}}"#
        );

        let json = serde_json::to_string(&ClientEvent::RealtimePause).unwrap();
        assert_eq!(json, r#"{"event":"realtime_pause"}"#);

        let json = serde_json::to_string(&ClientEvent::RealtimeStart {
            job_id: "j1".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"realtime_start","data":{"job_id":"j1"}}"#);
    }

    #[test]
    fn test_job_update_envelope_parses() {
        let json = r#"{
            "event": "job_update",
            "data": {"id": "j1", "step": "generating", "progress": 80, "title": "Song"}
        }"#;
        match serde_json::from_str::<ServerEvent>(json).unwrap() {
            ServerEvent::JobUpdate(status) => {
                assert_eq!(status.id, "j1");
                assert_eq!(status.stage, Stage::Generating);
                assert_eq!(status.progress, 80);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let json = r#"{"event": "job_deleted", "data": {}}"#;
        assert!(serde_json::from_str::<ServerEvent>(json).is_err());
    }
}
