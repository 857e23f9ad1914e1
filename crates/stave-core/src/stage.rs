//! Backend pipeline stages and their total order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One discrete phase of the backend transcription pipeline.
///
/// Stages are totally ordered by declaration index; a job only ever moves
/// forward through this order. `Error` is the exception: it can be entered
/// from any stage and is terminal.
///
/// Wire values are the lowercase variant names. Anything else fails to
/// deserialize, so unrecognized stages are rejected at the boundary instead
/// of being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Queued,
    Downloading,
    Downloaded,
    Transcribing,
    Transcribed,
    Generating,
    Complete,
    Error,
}

/// All stages in pipeline order.
pub const STAGE_ORDER: [Stage; 8] = [
    Stage::Queued,
    Stage::Downloading,
    Stage::Downloaded,
    Stage::Transcribing,
    Stage::Transcribed,
    Stage::Generating,
    Stage::Complete,
    Stage::Error,
];

impl Stage {
    /// Position of this stage in the pipeline order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether no further (non-error) stage can follow.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete | Stage::Error)
    }

    /// Wire name of this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Queued => "queued",
            Stage::Downloading => "downloading",
            Stage::Downloaded => "downloaded",
            Stage::Transcribing => "transcribing",
            Stage::Transcribed => "transcribed",
            Stage::Generating => "generating",
            Stage::Complete => "complete",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire string names no known stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline stage '{0}'")]
pub struct StageParseError(pub String);

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STAGE_ORDER
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| StageParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_strictly_increasing() {
        for pair in STAGE_ORDER.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].index() < pair[1].index());
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for stage in STAGE_ORDER {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "rendering".parse::<Stage>().unwrap_err();
        assert_eq!(err, StageParseError("rendering".to_string()));
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        let json = serde_json::to_string(&Stage::Transcribing).unwrap();
        assert_eq!(json, "\"transcribing\"");
        assert!(serde_json::from_str::<Stage>("\"Transcribing\"").is_err());
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Complete.is_terminal());
        assert!(Stage::Error.is_terminal());
        assert!(!Stage::Generating.is_terminal());
    }
}
