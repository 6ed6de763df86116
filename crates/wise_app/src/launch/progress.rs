//! Progress scalars driven by the launch choreography

use serde::{Deserialize, Serialize};

/// One animated progress channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressField {
    /// Background pill rise; overshoots to 1.9 for the bounce
    Background,
    /// Texture mask travel from below the screen to the top
    TextureVertical,
    /// Mask width from the pill width to twice the pill width
    TextureWidth,
    /// Mask width from twice the pill width to the full viewport
    TextureFullScreen,
}

impl ProgressField {
    pub const ALL: [ProgressField; 4] = [
        ProgressField::Background,
        ProgressField::TextureVertical,
        ProgressField::TextureWidth,
        ProgressField::TextureFullScreen,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ProgressField::Background => 0,
            ProgressField::TextureVertical => 1,
            ProgressField::TextureWidth => 2,
            ProgressField::TextureFullScreen => 3,
        }
    }
}

/// Snapshot of the four launch progress scalars
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub background: f32,
    pub texture_vertical: f32,
    pub texture_width: f32,
    pub texture_full_screen: f32,
}

impl ProgressState {
    pub const ZERO: ProgressState = ProgressState {
        background: 0.0,
        texture_vertical: 0.0,
        texture_width: 0.0,
        texture_full_screen: 0.0,
    };

    pub fn get(&self, field: ProgressField) -> f32 {
        match field {
            ProgressField::Background => self.background,
            ProgressField::TextureVertical => self.texture_vertical,
            ProgressField::TextureWidth => self.texture_width,
            ProgressField::TextureFullScreen => self.texture_full_screen,
        }
    }

    pub fn set(&mut self, field: ProgressField, value: f32) {
        match field {
            ProgressField::Background => self.background = value,
            ProgressField::TextureVertical => self.texture_vertical = value,
            ProgressField::TextureWidth => self.texture_width = value,
            ProgressField::TextureFullScreen => self.texture_full_screen = value,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip_per_field() {
        let mut state = ProgressState::default();
        for (i, field) in ProgressField::ALL.into_iter().enumerate() {
            state.set(field, i as f32 + 0.5);
            assert_eq!(field.index(), i);
        }
        assert_eq!(state.background, 0.5);
        assert_eq!(state.texture_full_screen, 3.5);
        assert!(!state.is_zero());
        assert!(ProgressState::ZERO.is_zero());
    }
}
