//! Top-level screen routing
//!
//! The app opens on the launch screen. When the launch sequence reports
//! completion the root decides where to go next and cross-fades to it.
//! Leaving the launch screen tears its sequence down, so springs still
//! settling after completion stop writing progress.

use std::time::Duration;
use wise_animation::{CancelHandle, Easing};
use wise_core::StateMachine;

/// Screens the root can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Launch,
    Onboarding,
}

/// Routing requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootEvent {
    Route(Destination),
}

/// Length of the screen cross-fade
pub const CROSSFADE: Duration = Duration::from_millis(250);

/// Where the app goes once launch finishes. Always onboarding for now;
/// a returning user would route elsewhere.
pub fn decide_post_launch_destination() -> Destination {
    Destination::Onboarding
}

pub struct RootFlow {
    fsm: StateMachine<Destination, RootEvent>,
    /// Time since the last screen change, while the fade runs
    fade: Option<Duration>,
}

impl RootFlow {
    /// `launch` is the teardown handle of the sequence shown on the launch
    /// screen
    pub fn new(launch: CancelHandle) -> Self {
        let fsm = StateMachine::builder(Destination::Launch)
            .on(
                Destination::Launch,
                RootEvent::Route(Destination::Onboarding),
                Destination::Onboarding,
            )
            .on_exit(Destination::Launch, move || {
                tracing::debug!("leaving launch; tearing down its sequence");
                launch.cancel();
            })
            .on_enter(Destination::Onboarding, || {
                tracing::info!("entering onboarding");
            })
            .build();
        Self { fsm, fade: None }
    }

    pub fn destination(&self) -> Destination {
        self.fsm.current_state()
    }

    /// Launch finished: route to the decided destination.
    /// Returns `true` if the screen changed.
    pub fn on_launch_complete(&mut self) -> bool {
        let from = self.destination();
        let to = self
            .fsm
            .send(RootEvent::Route(decide_post_launch_destination()));
        if to == from {
            tracing::debug!(?from, "root: launch completion ignored");
            return false;
        }
        tracing::info!(?from, ?to, "root: routed");
        self.fade = Some(Duration::ZERO);
        true
    }

    /// Onboarding finished; there is no next screen yet
    pub fn on_onboarding_complete(&mut self) {
        tracing::info!(destination = ?self.destination(), "root: onboarding complete");
    }

    pub fn advance(&mut self, dt: Duration) {
        if let Some(elapsed) = self.fade.as_mut() {
            *elapsed += dt;
            if *elapsed >= CROSSFADE {
                self.fade = None;
            }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.fade.is_some()
    }

    /// Opacity of the incoming screen; the outgoing one uses `1 - opacity`
    pub fn crossfade_opacity(&self) -> f32 {
        match self.fade {
            Some(elapsed) => {
                let t = elapsed.as_secs_f32() / CROSSFADE.as_secs_f32();
                Easing::STANDARD_EASE_IN_OUT.apply(t)
            }
            None => 1.0,
        }
    }
}
