//! Spring physics animation
//!
//! Closed-form damped harmonic oscillator. A spring's position is a pure
//! function of the time elapsed since it was last retargeted, so frames can
//! be sampled at any rate (or skipped) without integration drift.
//!
//! Springs are configured either with raw stiffness/damping/mass or with a
//! perceptual `response` (seconds) and damping ratio, where the natural
//! frequency is `ω = 2π / response`.

use crate::error::{AnimationError, Result};
use std::f64::consts::TAU;
use std::time::Duration;

/// Distance to target below which a spring counts as settled
pub const DEFAULT_REST_EPSILON: f32 = 1e-3;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Build a unit-mass spring from a response time and damping ratio.
    ///
    /// `response` is the period of the undamped oscillation; a critically
    /// damped spring (`damping_ratio == 1.0`) is within ~1.5% of its target
    /// after one response period.
    pub fn from_response(response: Duration, damping_ratio: f32) -> Result<Self> {
        let response_secs = response.as_secs_f32();
        if !(response_secs > 0.0) || !(damping_ratio >= 0.0) || !damping_ratio.is_finite() {
            return Err(AnimationError::InvalidSpring {
                response_secs,
                damping_ratio,
            });
        }

        let omega = TAU / response.as_secs_f64();
        Ok(Self {
            stiffness: (omega * omega) as f32,
            damping: (2.0 * damping_ratio as f64 * omega) as f32,
            mass: 1.0,
        })
    }

    /// Critically damped spring with the given response time
    pub fn critical(response: Duration) -> Result<Self> {
        Self::from_response(response, 1.0)
    }

    /// Natural (undamped) angular frequency ω₀ = √(k/m)
    pub fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio ζ = c / (2√(km))
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping() && !self.is_critically_damped()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping_ratio() - 1.0).abs() < 1e-3
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping() && !self.is_critically_damped()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 400.0,
            damping: 40.0,
            mass: 1.0,
        }
    }
}

/// Displacement and velocity of a damped oscillator released at `x0` (relative
/// to its rest point) with velocity `v0`, after `t` seconds.
fn oscillator(config: &SpringConfig, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let omega = config.natural_frequency() as f64;
    let zeta = config.damping_ratio() as f64;

    if !omega.is_finite() || omega <= 0.0 {
        return (x0, v0);
    }

    if (zeta - 1.0).abs() < 1e-3 {
        // x(t) = (x0 + (v0 + ω·x0)·t)·e^(-ωt)
        let b = v0 + omega * x0;
        let decay = (-omega * t).exp();
        ((x0 + b * t) * decay, (v0 - omega * b * t) * decay)
    } else if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        let (sin, cos) = (omega_d * t).sin_cos();
        let x = decay * (x0 * cos + (v0 + zeta * omega * x0) / omega_d * sin);
        let v = decay * (v0 * cos - (omega * omega * x0 + zeta * omega * v0) / omega_d * sin);
        (x, v)
    } else {
        let root = omega * (zeta * zeta - 1.0).sqrt();
        let r1 = -zeta * omega + root;
        let r2 = -zeta * omega - root;
        let c2 = (v0 - r1 * x0) / (r2 - r1);
        let c1 = x0 - c2;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
    }
}

/// A spring-based animator
///
/// Retargeting keeps the current position and velocity, so an interrupted
/// animation continues smoothly toward its new target.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    /// Position when the current leg started
    origin: f64,
    /// Velocity when the current leg started
    origin_velocity: f64,
    target: f64,
    /// Seconds since the current leg started
    elapsed: f64,
    rest_epsilon: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            origin: initial as f64,
            origin_velocity: 0.0,
            target: initial as f64,
            elapsed: 0.0,
            rest_epsilon: DEFAULT_REST_EPSILON,
        }
    }

    /// Override the settle threshold (units of the animated value)
    pub fn with_rest_epsilon(mut self, epsilon: f32) -> Self {
        self.rest_epsilon = epsilon.abs();
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.sample(0.0).0
    }

    pub fn velocity(&self) -> f32 {
        self.sample(0.0).1
    }

    pub fn target(&self) -> f32 {
        self.target as f32
    }

    /// Position and velocity `ahead` seconds past the current time, without
    /// advancing the spring.
    pub fn sample(&self, ahead: f32) -> (f32, f32) {
        let t = self.elapsed + ahead.max(0.0) as f64;
        let (x, v) = oscillator(
            &self.config,
            self.origin - self.target,
            self.origin_velocity,
            t,
        );
        ((self.target + x) as f32, v as f32)
    }

    /// Retarget using the current configuration
    pub fn set_target(&mut self, target: f32) {
        let config = self.config;
        self.animate_to(target, config);
    }

    /// Retarget with new timing parameters, inheriting the current velocity
    pub fn animate_to(&mut self, target: f32, config: SpringConfig) {
        let (x, v) = oscillator(
            &self.config,
            self.origin - self.target,
            self.origin_velocity,
            self.elapsed,
        );
        self.origin = self.target + x;
        self.origin_velocity = v;
        self.target = target as f64;
        self.config = config;
        self.elapsed = 0.0;
    }

    /// Jump to `value` and come to rest there
    pub fn snap_to(&mut self, value: f32) {
        self.origin = value as f64;
        self.origin_velocity = 0.0;
        self.target = value as f64;
        self.elapsed = 0.0;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        let (value, velocity) = self.sample(0.0);
        let eps = self.rest_epsilon;
        (value - self.target as f32).abs() < eps && velocity.abs() < eps
    }

    /// Advance the spring by `dt` seconds. A spring that ends the step
    /// within the rest epsilon lands exactly on its target.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt as f64;
        if self.is_settled() {
            let target = self.target as f32;
            self.snap_to(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_from_response_maps_to_unit_mass() {
        let config = SpringConfig::from_response(secs(0.8), 1.0).unwrap();
        let omega = std::f32::consts::TAU / 0.8;
        assert!((config.natural_frequency() - omega).abs() < 1e-3);
        assert!(config.is_critically_damped());
        assert!(!config.is_underdamped());
        assert!(!config.is_overdamped());

        assert!(SpringConfig::from_response(secs(0.5), 0.4)
            .unwrap()
            .is_underdamped());
        assert!(SpringConfig::from_response(secs(0.5), 2.0)
            .unwrap()
            .is_overdamped());
    }

    #[test]
    fn test_invalid_spring_parameters_rejected() {
        assert!(matches!(
            SpringConfig::from_response(Duration::ZERO, 1.0),
            Err(AnimationError::InvalidSpring { .. })
        ));
        assert!(SpringConfig::from_response(secs(0.4), -1.0).is_err());
        assert!(SpringConfig::from_response(secs(0.4), f32::NAN).is_err());
    }

    #[test]
    fn test_critical_spring_matches_closed_form() {
        let response = 0.45_f32;
        let config = SpringConfig::critical(secs(response)).unwrap();
        let mut spring = Spring::new(config, 0.0);
        spring.set_target(0.45);

        let omega = std::f32::consts::TAU / response;
        for i in 1..=30 {
            let t = i as f32 * 0.02;
            let expected = 0.45 - 0.45 * (-omega * t).exp() * (1.0 + omega * t);
            let (actual, _) = spring.sample(t);
            assert!((actual - expected).abs() < 1e-5, "t={t}: {actual} vs {expected}");
        }
    }

    #[test]
    fn test_critical_spring_is_monotone_and_reaches_target() {
        let mut spring = Spring::new(SpringConfig::critical(secs(0.8)).unwrap(), 0.0);
        spring.set_target(1.9);

        let mut prev = spring.value();
        for _ in 0..120 {
            spring.step(1.0 / 120.0);
            let value = spring.value();
            assert!(value >= prev, "critically damped spring must not reverse");
            assert!(value <= 1.9 + 1e-6, "critically damped spring must not overshoot");
            prev = value;
        }

        // One response period in: within ~1.5% of the distance
        assert!((spring.value() - 1.9).abs() < 1.9 * 0.015);

        for _ in 0..120 {
            spring.step(1.0 / 120.0);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 1.9);
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::from_response(secs(0.5), 0.5).unwrap(), 0.0);
        spring.set_target(100.0);

        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        let value = spring.value();
        assert!(velocity > 0.0);

        spring.set_target(50.0);
        assert!((spring.velocity() - velocity).abs() < 1e-3);
        assert!((spring.value() - value).abs() < 1e-3);
    }

    #[test]
    fn test_underdamped_overshoots_and_overdamped_does_not() {
        let mut wobbly = Spring::new(SpringConfig::from_response(secs(0.5), 0.3).unwrap(), 0.0);
        wobbly.set_target(1.0);
        let peak = (1..200)
            .map(|i| wobbly.sample(i as f32 / 200.0).0)
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);

        let mut sluggish = Spring::new(SpringConfig::from_response(secs(0.5), 2.0).unwrap(), 0.0);
        sluggish.set_target(1.0);
        for i in 1..400 {
            assert!(sluggish.sample(i as f32 / 100.0).0 <= 1.0 + 1e-6);
        }
        assert!((sluggish.sample(10.0).0 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_snap_to_rests_immediately() {
        let mut spring = Spring::new(SpringConfig::critical(secs(1.0)).unwrap(), 0.0);
        spring.set_target(1.0);
        spring.step(0.1);
        spring.snap_to(0.0);
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }
}
