use std::path::PathBuf;
use thiserror::Error;
use wise_animation::AnimationError;

/// Errors raised while loading or validating `wise.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Animation(#[from] AnimationError),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
