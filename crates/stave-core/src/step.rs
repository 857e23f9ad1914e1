//! Progress steps derived from the backend stage.
//!
//! The UI shows three steps while a job runs; each one groups a working
//! stage with the settle stage that follows it. Derivation is a pure
//! function of the current stage, so it can be recomputed on every update
//! without history.

use crate::stage::Stage;

/// Visual state of one progress step. Ordered by advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StepState {
    Pending,
    Active,
    Done,
}

/// A UI-facing progress step grouping one or more contiguous stages.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub key: &'static str,
    pub label: &'static str,
    /// Member stages, in pipeline order.
    pub stages: &'static [Stage],
}

/// The three steps shown while a job runs. Their member sets partition the
/// stage order after `queued`, which keeps the derivation well-defined.
pub const STEPS: [StepDefinition; 3] = [
    StepDefinition {
        key: "downloading",
        label: "Downloading audio",
        stages: &[Stage::Downloading, Stage::Downloaded],
    },
    StepDefinition {
        key: "transcribing",
        label: "Transcribing notes",
        stages: &[Stage::Transcribing, Stage::Transcribed],
    },
    StepDefinition {
        key: "generating",
        label: "Engraving score",
        stages: &[Stage::Generating, Stage::Complete],
    },
];

/// Derive the visual state of `step` given the current pipeline stage.
///
/// A step is `Done` once the stage has moved past its last member stage, or
/// two or more stages past its first member. The second clause is the
/// look-ahead that folds the settle stages (`downloaded`, `transcribed`)
/// into the step they conclude.
pub fn step_state(current: Stage, step: &StepDefinition) -> StepState {
    if step.stages.contains(&current) {
        return StepState::Active;
    }

    let idx = current.index();
    let first = step.stages.first().map_or(usize::MAX, |s| s.index());
    let last = step.stages.last().map_or(usize::MAX, |s| s.index());

    if idx > last || idx >= first + 2 {
        StepState::Done
    } else {
        StepState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::STAGE_ORDER;

    fn states(current: Stage) -> [StepState; 3] {
        [
            step_state(current, &STEPS[0]),
            step_state(current, &STEPS[1]),
            step_state(current, &STEPS[2]),
        ]
    }

    #[test]
    fn test_mid_pipeline_snapshot() {
        // transcribing(55%): download done, transcription running, score pending
        assert_eq!(
            states(Stage::Transcribing),
            [StepState::Done, StepState::Active, StepState::Pending]
        );
    }

    #[test]
    fn test_settle_stages_stay_on_their_step() {
        // downloaded belongs to the download step, not the next one
        assert_eq!(
            states(Stage::Downloaded),
            [StepState::Active, StepState::Pending, StepState::Pending]
        );
        assert_eq!(
            states(Stage::Transcribed),
            [StepState::Done, StepState::Active, StepState::Pending]
        );
    }

    #[test]
    fn test_queued_shows_nothing_started() {
        assert_eq!(
            states(Stage::Queued),
            [StepState::Pending, StepState::Pending, StepState::Pending]
        );
    }

    #[test]
    fn test_complete_keeps_final_step_active() {
        assert_eq!(
            states(Stage::Complete),
            [StepState::Done, StepState::Done, StepState::Active]
        );
    }

    #[test]
    fn test_states_are_monotone_as_the_stage_advances() {
        // Walking the pipeline forward never moves any step backwards.
        let mut previous = states(Stage::Queued);
        for stage in STAGE_ORDER.iter().copied().filter(|s| *s != Stage::Error) {
            let current = states(stage);
            for (prev, cur) in previous.iter().zip(current.iter()) {
                assert!(cur >= prev, "step regressed at {stage}");
            }
            previous = current;
        }
    }

    #[test]
    fn test_steps_never_regress_left_to_right() {
        // Earlier steps are always at least as advanced as later ones.
        for stage in STAGE_ORDER.iter().copied().filter(|s| *s != Stage::Error) {
            let s = states(stage);
            assert!(s[0] >= s[1], "left-to-right order broken at {stage}");
            assert!(s[1] >= s[2], "left-to-right order broken at {stage}");
        }
    }

    #[test]
    fn test_derivation_is_idempotent() {
        for stage in STAGE_ORDER {
            assert_eq!(states(stage), states(stage));
        }
    }
}
