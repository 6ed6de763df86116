//! Animation scheduler
//!
//! Owns a set of springs and advances them on one clock. Time is supplied by
//! the caller (`tick` / `advance_to`), which keeps playback deterministic in
//! tests and headless runs while a realtime driver can feed it wall time.

use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};
use std::time::Duration;

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
}

/// The animation scheduler that ticks all registered springs
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
    now: Duration,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
            now: Duration::ZERO,
        }
    }

    /// Current scheduler time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        self.springs.insert(spring)
    }

    /// Run a closure against one spring, if it is still registered
    pub fn with_spring_mut<R>(&mut self, id: SpringId, f: impl FnOnce(&mut Spring) -> R) -> Option<R> {
        self.springs.get_mut(id).map(f)
    }

    /// Current value of a spring
    pub fn value(&self, id: SpringId) -> Option<f32> {
        self.springs.get(id).map(Spring::value)
    }

    /// Retarget a spring from its current position and velocity
    pub fn animate(&mut self, id: SpringId, target: f32, config: SpringConfig) -> bool {
        self.with_spring_mut(id, |spring| spring.animate_to(target, config))
            .is_some()
    }

    /// Place a spring at `value`, at rest
    pub fn snap(&mut self, id: SpringId, value: f32) -> bool {
        self.with_spring_mut(id, |spring| spring.snap_to(value))
            .is_some()
    }

    /// Advance every spring by `dt`
    pub fn tick(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        self.now += dt;
        let secs = dt.as_secs_f32();
        for (_, spring) in self.springs.iter_mut() {
            spring.step(secs);
        }
    }

    /// Advance to an absolute scheduler time; earlier times are ignored
    pub fn advance_to(&mut self, time: Duration) {
        if let Some(dt) = time.checked_sub(self.now) {
            self.tick(dt);
        }
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critical(ms: u64) -> SpringConfig {
        SpringConfig::critical(Duration::from_millis(ms)).unwrap()
    }

    #[test]
    fn test_springs_at_rest_are_inactive() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(critical(400), 0.0));
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.value(id), Some(0.0));
    }

    #[test]
    fn test_animate_and_settle() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(critical(400), 0.0));

        assert!(scheduler.animate(id, 1.0, critical(400)));
        assert!(scheduler.has_active_animations());

        for _ in 0..120 {
            scheduler.tick(Duration::from_micros(8_333));
        }
        assert!(!scheduler.has_active_animations());
        assert!((scheduler.value(id).unwrap() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_advance_to_is_monotonic() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.advance_to(Duration::from_millis(500));
        scheduler.advance_to(Duration::from_millis(200));
        assert_eq!(scheduler.now(), Duration::from_millis(500));
    }

    #[test]
    fn test_snap_and_foreign_ids() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(critical(400), 0.0));
        scheduler.animate(id, 2.0, critical(400));
        scheduler.tick(Duration::from_millis(100));
        assert!(scheduler.snap(id, 0.0));
        assert_eq!(scheduler.value(id), Some(0.0));
        assert!(!scheduler.has_active_animations());

        let mut other = AnimationScheduler::new();
        assert!(!other.animate(id, 1.0, critical(400)));
        assert_eq!(other.value(id), None);
    }
}
