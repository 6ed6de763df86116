use thiserror::Error;

/// Configuration errors raised while building tracks, clips, springs and stages.
///
/// These are construction-time failures: a value that passes validation
/// never fails while being sampled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("track `{track}` has no segments")]
    EmptyTrack { track: String },

    #[error("track `{track}` segment {index} has a zero duration")]
    InvalidDuration { track: String, index: usize },

    #[error("track `{track}` segment {index} has a non-finite value")]
    NonFiniteValue { track: String, index: usize },

    #[error("track `{track}` lasts {actual_ms}ms but the clip period is {expected_ms}ms")]
    PeriodMismatch {
        track: String,
        expected_ms: u64,
        actual_ms: u64,
    },

    #[error("track `{track}` does not loop seamlessly: starts at {first}, ends at {last}")]
    Discontinuity { track: String, first: f32, last: f32 },

    #[error("clip has no tracks")]
    EmptyClip,

    #[error("clip already has a track named `{track}`")]
    DuplicateTrack { track: String },

    #[error("stage {index} has no target assignments")]
    EmptyStage { index: usize },

    #[error("sequence has no stages")]
    NoStages,

    #[error("looping sequence has no waits and would never yield")]
    ZeroLengthLoop,

    #[error("spring response must be positive and damping ratio non-negative (response {response_secs}s, damping {damping_ratio})")]
    InvalidSpring {
        response_secs: f32,
        damping_ratio: f32,
    },
}

pub type Result<T> = std::result::Result<T, AnimationError>;
