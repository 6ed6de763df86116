//! Progress → geometry mapping for the launch reveal
//!
//! Everything here is a pure function of the progress snapshot and the
//! viewport size; it is recomputed on every frame and never stored.

use super::progress::ProgressState;
use serde::{Deserialize, Serialize};

/// Logical viewport size in points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Fixed launch-screen dimensions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchGeometry {
    /// Width of the rising pill and of the initial texture mask
    pub pill_width: f32,
    /// Top corner radius of the background pill
    pub pill_corner_radius: f32,
    /// Background pill height as a fraction of the viewport height
    pub background_pill_height_ratio: f32,
    /// Extra mask travel below the screen, as a fraction of the viewport height
    pub texture_overshoot_ratio: f32,
    /// Diameter of the circular arrow badge
    pub arrow_overlay_size: f32,
    /// Gap between the mask top and the arrow badge
    pub arrow_top_inset: f32,
}

impl Default for LaunchGeometry {
    fn default() -> Self {
        Self {
            pill_width: 120.0,
            pill_corner_radius: 60.0,
            background_pill_height_ratio: 0.35,
            texture_overshoot_ratio: 0.5,
            arrow_overlay_size: 104.0,
            arrow_top_inset: 16.0,
        }
    }
}

/// Texture mask geometry derived from the progress scalars
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AnimationValues {
    /// Downward offset of the mask from its resting position
    pub vertical_offset: f32,
    pub current_width: f32,
    /// Top corner radius of the mask
    pub current_corner_radius: f32,
    /// Mask height (viewport height plus overshoot)
    pub height: f32,
    pub current_arrow_scale: f32,
}

/// Background pill placement
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BackgroundPill {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub vertical_offset: f32,
}

/// Circular arrow badge riding on top of the mask
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArrowOverlay {
    pub size: f32,
    pub top_inset: f32,
    pub scale: f32,
}

impl LaunchGeometry {
    /// Map a progress snapshot onto mask geometry
    pub fn animation_values(&self, progress: &ProgressState, viewport: Size) -> AnimationValues {
        let overshoot = viewport.height * self.texture_overshoot_ratio;
        let height = viewport.height + overshoot;
        let vertical_offset = height * (1.0 - progress.texture_vertical);

        // Two additive width stages: pill → 2×pill, then 2×pill → full width
        let doubled = self.pill_width * 2.0;
        let current_width = self.pill_width
            + (doubled - self.pill_width) * progress.texture_width
            + (viewport.width - doubled) * progress.texture_full_screen;

        // A perfect pill (radius = half width) until the full-screen stage
        // straightens the corners
        let current_corner_radius = (current_width / 2.0) * (1.0 - progress.texture_full_screen);

        let current_arrow_scale = 1.0 + progress.texture_width / 2.0;

        AnimationValues {
            vertical_offset,
            current_width,
            current_corner_radius,
            height,
            current_arrow_scale,
        }
    }

    pub fn background_pill(&self, progress: &ProgressState, viewport: Size) -> BackgroundPill {
        let height = viewport.height * self.background_pill_height_ratio;
        BackgroundPill {
            width: self.pill_width,
            height,
            corner_radius: self.pill_corner_radius,
            vertical_offset: height * (1.0 - progress.background),
        }
    }

    pub fn arrow_overlay(&self, values: &AnimationValues) -> ArrowOverlay {
        ArrowOverlay {
            size: self.arrow_overlay_size,
            top_inset: self.arrow_top_inset,
            scale: values.current_arrow_scale,
        }
    }
}

/// Mask geometry with the stock launch dimensions
pub fn map_progress_to_geometry(progress: &ProgressState, viewport: Size) -> AnimationValues {
    LaunchGeometry::default().animation_values(progress, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: Size = Size {
        width: 390.0,
        height: 844.0,
    };

    fn progress(vertical: f32, width: f32, full: f32) -> ProgressState {
        ProgressState {
            background: 0.0,
            texture_vertical: vertical,
            texture_width: width,
            texture_full_screen: full,
        }
    }

    #[test]
    fn test_vertical_offset_endpoints() {
        let at_rest = map_progress_to_geometry(&ProgressState::ZERO, PHONE);
        assert_eq!(at_rest.height, 844.0 * 1.5);
        assert_eq!(at_rest.vertical_offset, at_rest.height);

        let risen = map_progress_to_geometry(&progress(1.0, 0.0, 0.0), PHONE);
        assert_eq!(risen.vertical_offset, 0.0);
    }

    #[test]
    fn test_full_screen_erases_corner_radius() {
        for vertical in [0.0, 0.45, 1.0] {
            for width in [0.0, 0.3, 1.0] {
                let values = map_progress_to_geometry(&progress(vertical, width, 1.0), PHONE);
                assert_eq!(values.current_corner_radius, 0.0);
            }
        }
        let full = map_progress_to_geometry(&progress(1.0, 1.0, 1.0), PHONE);
        assert_eq!(full.current_width, PHONE.width);
    }

    #[test]
    fn test_width_starts_at_pill() {
        for vertical in [0.0, 0.2, 0.45, 1.0] {
            let values = map_progress_to_geometry(&progress(vertical, 0.0, 0.0), PHONE);
            assert_eq!(values.current_width, 120.0);
            assert_eq!(values.current_corner_radius, 60.0);
        }
    }

    #[test]
    fn test_width_stages_are_additive() {
        let doubled = map_progress_to_geometry(&progress(1.0, 1.0, 0.0), PHONE);
        assert_eq!(doubled.current_width, 240.0);
        assert_eq!(doubled.current_corner_radius, 120.0);

        let halfway = map_progress_to_geometry(&progress(1.0, 1.0, 0.5), PHONE);
        assert_eq!(halfway.current_width, 240.0 + (390.0 - 240.0) * 0.5);
        assert_eq!(halfway.current_corner_radius, halfway.current_width / 4.0);
    }

    #[test]
    fn test_arrow_scale_range_and_monotonicity() {
        let mut prev = f32::MIN;
        for i in 0..=100 {
            let w = i as f32 / 100.0;
            let scale = map_progress_to_geometry(&progress(0.5, w, 0.3), PHONE).current_arrow_scale;
            assert!(scale >= prev);
            prev = scale;
        }
        assert_eq!(map_progress_to_geometry(&progress(0.0, 0.0, 0.0), PHONE).current_arrow_scale, 1.0);
        assert_eq!(map_progress_to_geometry(&progress(0.0, 1.0, 0.0), PHONE).current_arrow_scale, 1.5);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let p = progress(0.731, 0.42, 0.17);
        assert_eq!(map_progress_to_geometry(&p, PHONE), map_progress_to_geometry(&p, PHONE));
    }

    #[test]
    fn test_background_pill_and_arrow() {
        let geometry = LaunchGeometry::default();
        let mut p = ProgressState::ZERO;
        let hidden = geometry.background_pill(&p, PHONE);
        assert!((hidden.height - 295.4).abs() < 1e-3);
        assert_eq!(hidden.vertical_offset, hidden.height);

        p.background = 1.9;
        let bounced = geometry.background_pill(&p, PHONE);
        assert!(bounced.vertical_offset < 0.0);

        p.texture_width = 1.0;
        let values = geometry.animation_values(&p, PHONE);
        let arrow = geometry.arrow_overlay(&values);
        assert_eq!(arrow.size, 104.0);
        assert_eq!(arrow.scale, 1.5);
    }
}
