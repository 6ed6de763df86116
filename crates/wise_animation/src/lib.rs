//! Wise Animation System
//!
//! Spring transitions, looping keyframe clips, and staged timeline
//! orchestration.
//!
//! # Features
//!
//! - **Springs**: closed-form damped springs configured by response time and
//!   damping ratio; retargeting inherits velocity
//! - **Keyframe Clips**: named hold/cubic tracks sharing one loop period,
//!   validated at construction
//! - **Stage Sequencer**: timed stages that retarget channels, run once with a
//!   single completion or loop with a reset, and can be cancelled
//! - **Scheduler**: advances registered springs on one caller-supplied clock

pub mod easing;
pub mod error;
pub mod keyframe;
pub mod scheduler;
pub mod spring;
pub mod timeline;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use keyframe::{KeyframeClip, KeyframeTrack, KeyframeTrackBuilder, Segment, SegmentKind, WrapMode};
pub use scheduler::{AnimationScheduler, SpringId};
pub use spring::{Spring, SpringConfig};
pub use timeline::{
    CancelHandle, PlaybackMode, SequencerEvent, SequencerPhase, Stage, StageSequencer, StageTargets,
};
