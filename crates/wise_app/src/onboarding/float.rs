use std::time::Duration;
use wise_animation::easing::lerp;
use wise_animation::Easing;

/// Endless vertical bob of the onboarding glass group.
///
/// Starts at `+amplitude`, eases to `-amplitude` over `half_period`, then
/// reverses. Sampled from elapsed time like the coin clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingBob {
    pub amplitude: f32,
    pub half_period: Duration,
    pub easing: Easing,
}

impl Default for FloatingBob {
    fn default() -> Self {
        Self::new(8.0, Duration::from_secs(2))
    }
}

impl FloatingBob {
    pub fn new(amplitude: f32, half_period: Duration) -> Self {
        Self {
            amplitude,
            half_period,
            easing: Easing::STANDARD_EASE_IN_OUT,
        }
    }

    /// Vertical offset at `elapsed`
    pub fn offset(&self, elapsed: Duration) -> f32 {
        let half = self.half_period.as_nanos();
        if half == 0 {
            return self.amplitude;
        }
        let phase = elapsed.as_nanos() % (half * 2);
        let (from, to, local) = if phase < half {
            (self.amplitude, -self.amplitude, phase)
        } else {
            (-self.amplitude, self.amplitude, phase - half)
        };
        let t = (local as f64 / half as f64) as f32;
        lerp(from, to, self.easing.apply(t))
    }
}
