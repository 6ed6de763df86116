//! Wise application layer
//!
//! Screen-level logic built on `wise_animation`:
//!
//! - [`launch`]: the four-stage spring reveal of the launch screen and its
//!   progress → geometry mapping
//! - [`onboarding`]: the looping coin hop and floating bob, plus the two
//!   button actions
//! - [`root`]: launch → onboarding routing with a cross-fade
//! - [`headless`]: fixed-step frame runs for diagnostics and tests
//!
//! Configuration is read from `wise.toml` (see [`config`]).

pub mod config;
pub mod error;
pub mod headless;
pub mod launch;
pub mod onboarding;
pub mod root;

pub use config::{HeadlessSettings, WiseConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, Result};
pub use headless::{run_launch, run_onboarding, HeadlessRunConfig, LaunchFrame, LaunchMark, LaunchReport};
pub use launch::{
    map_progress_to_geometry, AnimationValues, DriveOutcome, LaunchDriver, LaunchGeometry,
    LaunchSequence, LaunchSettings, ProgressField, ProgressState, Size,
};
pub use onboarding::{CoinClip, CoinTracks, CoinTransform, FloatingBob, Onboarding, OnboardingFrame, OnboardingSettings};
pub use root::{decide_post_launch_destination, Destination, RootFlow};
