//! The launch choreography table

use super::progress::ProgressField;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wise_animation::{PlaybackMode, Stage};

/// Background target; past 1.0 so the pill bounces above its resting place
pub const BACKGROUND_OVERSHOOT: f32 = 1.9;

/// Mask height reached by the first texture rise
pub const TEXTURE_FIRST_RISE: f32 = 0.45;

/// `[launch]` settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Loop forever instead of finishing once
    pub debug: bool,
    /// Pause after the last stage before completion fires
    pub completion_pause_ms: u64,
    /// Pause after the last stage before a debug loop restarts
    pub loop_pause_ms: u64,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            debug: false,
            completion_pause_ms: 500,
            loop_pause_ms: 2000,
        }
    }
}

impl LaunchSettings {
    pub fn playback_mode(&self) -> PlaybackMode {
        if self.debug {
            PlaybackMode::Loop {
                loop_pause: Duration::from_millis(self.loop_pause_ms),
            }
        } else {
            PlaybackMode::Once {
                completion_pause: Duration::from_millis(self.completion_pause_ms),
            }
        }
    }
}

/// Four critically damped stages revealing the launch texture
pub fn launch_stages() -> Vec<Stage<ProgressField>> {
    let ms = Duration::from_millis;
    vec![
        Stage::after(ms(500))
            .target(ProgressField::Background, BACKGROUND_OVERSHOOT)
            .spring(ms(800), 1.0),
        Stage::after(ms(200))
            .target(ProgressField::TextureVertical, TEXTURE_FIRST_RISE)
            .spring(ms(450), 1.0),
        Stage::after(ms(350))
            .target(ProgressField::TextureVertical, 1.0)
            .target(ProgressField::TextureWidth, 1.0)
            .spring(ms(1000), 1.0),
        Stage::after(ms(400))
            .target(ProgressField::TextureFullScreen, 1.0)
            .spring(ms(400), 1.0),
    ]
}
