//! Easing functions for animations

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInCubic,
    EaseOutCubic,
    /// Symmetric cubic ease: zero velocity at both ends, monotone in between.
    EaseInOutCubic,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// The platform-standard ease-in-out timing curve (0.42, 0, 0.58, 1).
    pub const STANDARD_EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Interpolate from `from` to `to` by an already-eased fraction.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Cubic bezier easing calculation (matches CSS / UIKit timing curves).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter at 120fps.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break; // slope too flat, switch to binary search
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// B'(t)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::STANDARD_EASE_IN_OUT,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(Easing::EaseInOutCubic.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseInOutCubic.apply(1.5), 1.0);
    }

    #[test]
    fn test_ease_in_out_is_monotone_and_symmetric() {
        for easing in [Easing::EaseInOutCubic, Easing::STANDARD_EASE_IN_OUT] {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-4, "{easing:?}");
            let a = easing.apply(0.2);
            let b = easing.apply(0.8);
            assert!((a + b - 1.0).abs() < 1e-4, "{easing:?}");
        }
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(-125.0, -155.0, 0.0), -125.0);
        assert_eq!(lerp(-125.0, -155.0, 1.0), -155.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
