//! `wise.toml` configuration
//!
//! Every section and field is optional; missing values fall back to the
//! stock launch and onboarding settings.
//!
//! ```toml
//! [launch]
//! debug = true
//!
//! [viewport]
//! width = 430
//! height = 932
//!
//! [headless]
//! tick_ms = 8
//! ```

use crate::error::{ConfigError, Result};
use crate::launch::{LaunchGeometry, LaunchSettings, Size};
use crate::onboarding::{CoinClip, OnboardingSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "wise.toml";

/// `[headless]` settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessSettings {
    /// Logical milliseconds between frames
    pub tick_ms: u64,
    /// Frame budget for a launch run
    pub max_frames: u32,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_frames: 240,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiseConfig {
    pub launch: LaunchSettings,
    pub geometry: LaunchGeometry,
    pub viewport: Size,
    pub onboarding: OnboardingSettings,
    pub headless: HeadlessSettings,
}

impl Default for WiseConfig {
    fn default() -> Self {
        Self {
            launch: LaunchSettings::default(),
            geometry: LaunchGeometry::default(),
            viewport: Size::new(390.0, 844.0),
            onboarding: OnboardingSettings::default(),
            headless: HeadlessSettings::default(),
        }
    }
}

impl WiseConfig {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` if given, else `wise.toml` in the working directory if it
    /// exists, else the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        };

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        positive("geometry.pill_width", self.geometry.pill_width)?;
        positive("geometry.arrow_overlay_size", self.geometry.arrow_overlay_size)?;
        positive(
            "geometry.background_pill_height_ratio",
            self.geometry.background_pill_height_ratio,
        )?;

        for (field, value) in [
            ("geometry.pill_corner_radius", self.geometry.pill_corner_radius),
            ("geometry.texture_overshoot_ratio", self.geometry.texture_overshoot_ratio),
            ("geometry.arrow_top_inset", self.geometry.arrow_top_inset),
            ("onboarding.float_amplitude", self.onboarding.float_amplitude),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must be non-negative, got {value}")));
            }
        }

        if self.onboarding.float_period_ms == 0 {
            return Err(ConfigError::invalid("onboarding.float_period_ms", "must be > 0"));
        }
        if self.headless.tick_ms == 0 {
            return Err(ConfigError::invalid("headless.tick_ms", "must be > 0"));
        }
        if self.headless.max_frames == 0 {
            return Err(ConfigError::invalid("headless.max_frames", "must be > 0"));
        }

        // Malformed coin tracks are fatal at load time, not on first frame
        self.coin_clip()?;
        Ok(())
    }

    /// The coin clip, from the override tracks when present
    pub fn coin_clip(&self) -> Result<CoinClip> {
        let clip = match &self.onboarding.coin {
            Some(tracks) => CoinClip::from_tracks(tracks)?,
            None => CoinClip::standard()?,
        };
        Ok(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wise_animation::AnimationError;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = WiseConfig::from_toml_str("").unwrap();
        assert_eq!(config, WiseConfig::default());
        assert_eq!(config.launch.completion_pause_ms, 500);
        assert_eq!(config.viewport, Size::new(390.0, 844.0));
    }

    #[test]
    fn test_partial_sections() {
        let config = WiseConfig::from_toml_str(
            r#"
            [launch]
            debug = true

            [viewport]
            width = 430.0
            height = 932.0

            [geometry]
            pill_width = 100.0
            "#,
        )
        .unwrap();
        assert!(config.launch.debug);
        assert_eq!(config.launch.loop_pause_ms, 2000);
        assert_eq!(config.viewport.width, 430.0);
        assert_eq!(config.geometry.pill_width, 100.0);
        assert_eq!(config.geometry.pill_corner_radius, 60.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = WiseConfig::from_toml_str("[headless]\ntick_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "headless.tick_ms", .. }));

        let err = WiseConfig::from_toml_str("[viewport]\nwidth = -1.0\nheight = 10.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "viewport.width", .. }));

        let err = WiseConfig::from_toml_str("[launch]\ndebug = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_coin_override_with_diverging_tracks_is_fatal() {
        let err = WiseConfig::from_toml_str(
            r#"
            [onboarding.coin]
            x = [{ value = 0.0, duration_ms = 500 }]
            y = [{ value = 0.0, duration_ms = 500 }]
            rotation = [
                { value = 0.0, duration_ms = 250 },
                { value = 360.0, duration_ms = 300, kind = "cubic" },
            ]
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Animation(AnimationError::PeriodMismatch {
                expected_ms: 500,
                actual_ms: 550,
                ..
            })
        ));
    }

    #[test]
    fn test_coin_override_accepted() {
        let config = WiseConfig::from_toml_str(
            r#"
            [onboarding.coin]
            x = [{ value = 0.0, duration_ms = 200 }, { value = 50.0, duration_ms = 200, kind = "cubic" }, { value = 0.0, duration_ms = 200, kind = "cubic" }]
            y = [{ value = 10.0, duration_ms = 600 }]
            rotation = [{ value = 0.0, duration_ms = 300 }, { value = 180.0, duration_ms = 300, kind = "cubic" }]
            "#,
        )
        .unwrap();
        let clip = config.coin_clip().unwrap();
        assert_eq!(clip.period().as_millis(), 600);
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = WiseConfig::default().to_toml_string().unwrap();
        assert_eq!(WiseConfig::from_toml_str(&text).unwrap(), WiseConfig::default());
    }
}
