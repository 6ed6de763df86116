//! Onboarding screen animation and actions

mod coin;
mod float;

pub use coin::{CoinClip, CoinTracks, CoinTransform};
pub use float::FloatingBob;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[onboarding]` settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingSettings {
    pub float_amplitude: f32,
    /// One leg of the bob (top to bottom)
    pub float_period_ms: u64,
    /// Replaces the stock coin tracks when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin: Option<CoinTracks>,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            float_amplitude: 8.0,
            float_period_ms: 2000,
            coin: None,
        }
    }
}

impl OnboardingSettings {
    pub fn floating_bob(&self) -> FloatingBob {
        FloatingBob::new(self.float_amplitude, Duration::from_millis(self.float_period_ms))
    }
}

/// Everything the onboarding renderer needs for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OnboardingFrame {
    pub elapsed_ms: u64,
    pub coin: CoinTransform,
    pub float_offset: f32,
}

type ActionHandler = Box<dyn FnMut() + Send + 'static>;

/// Onboarding screen state: a looping clock plus the two button actions
pub struct Onboarding {
    coin: CoinClip,
    bob: FloatingBob,
    elapsed: Duration,
    on_get_started: Option<ActionHandler>,
}

impl std::fmt::Debug for Onboarding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Onboarding")
            .field("elapsed", &self.elapsed)
            .field("bob", &self.bob)
            .finish_non_exhaustive()
    }
}

impl Onboarding {
    pub fn new(coin: CoinClip, bob: FloatingBob) -> Self {
        Self {
            coin,
            bob,
            elapsed: Duration::ZERO,
            on_get_started: None,
        }
    }

    /// Forward "Get started" taps to `handler`
    pub fn on_get_started(&mut self, handler: impl FnMut() + Send + 'static) {
        self.on_get_started = Some(Box::new(handler));
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    pub fn frame(&self) -> OnboardingFrame {
        OnboardingFrame {
            elapsed_ms: self.elapsed.as_millis() as u64,
            coin: self.coin.sample(self.elapsed),
            float_offset: self.bob.offset(self.elapsed),
        }
    }

    pub fn get_started_tapped(&mut self) {
        tracing::info!("get started tapped");
        if let Some(handler) = self.on_get_started.as_mut() {
            handler();
        }
    }

    pub fn check_rates_tapped(&mut self) {
        // Rates screen is not wired up yet
        tracing::info!("check rates tapped");
    }
}
