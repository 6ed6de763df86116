//! Launch screen choreography
//!
//! A four-stage spring sequence drives four progress scalars, and the
//! geometry mapper turns them into the pill and texture-mask layout each
//! frame.

mod driver;
mod geometry;
mod progress;
mod sequence;
mod stages;

pub use driver::{DriveOutcome, LaunchDriver};
pub use geometry::{
    map_progress_to_geometry, AnimationValues, ArrowOverlay, BackgroundPill, LaunchGeometry, Size,
};
pub use progress::{ProgressField, ProgressState};
pub use sequence::{CompletionCallback, LaunchEvents, LaunchSequence};
pub use stages::{launch_stages, LaunchSettings, BACKGROUND_OVERSHOOT, TEXTURE_FIRST_RISE};
