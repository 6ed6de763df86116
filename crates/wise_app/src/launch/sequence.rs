//! Launch sequence: stage sequencer + progress springs
//!
//! `LaunchSequence` is the single writer of the launch [`ProgressState`].
//! The host advances it once per frame; sequencer events are applied at
//! their exact timeline instants, so the result does not depend on how the
//! frames are sliced.

use super::geometry::{AnimationValues, BackgroundPill, LaunchGeometry, Size};
use super::progress::{ProgressField, ProgressState};
use super::stages::{launch_stages, LaunchSettings};
use smallvec::SmallVec;
use std::time::Duration;
use wise_animation::{
    AnimationScheduler, CancelHandle, Result, SequencerEvent, SequencerPhase, Spring,
    SpringConfig, SpringId, StageSequencer,
};

/// Notification fired once when a non-looping sequence finishes
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Events produced by one `advance` call
pub type LaunchEvents = SmallVec<[SequencerEvent<ProgressField>; 4]>;

pub struct LaunchSequence {
    sequencer: StageSequencer<ProgressField>,
    scheduler: AnimationScheduler,
    channels: [SpringId; 4],
    geometry: LaunchGeometry,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for LaunchSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchSequence")
            .field("phase", &self.sequencer.phase())
            .field("elapsed", &self.sequencer.elapsed())
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

impl LaunchSequence {
    /// Build an idle sequence with the stock launch stages
    pub fn new(settings: &LaunchSettings, geometry: LaunchGeometry) -> Result<Self> {
        let sequencer = StageSequencer::new(launch_stages(), settings.playback_mode())?;

        let mut scheduler = AnimationScheduler::new();
        let rest = SpringConfig::default();
        let channels = ProgressField::ALL.map(|_| scheduler.add_spring(Spring::new(rest, 0.0)));

        Ok(Self {
            sequencer,
            scheduler,
            channels,
            geometry,
            on_complete: None,
        })
    }

    /// Register the completion notification (replaces any previous one)
    pub fn on_complete(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Builder form of [`LaunchSequence::on_complete`]
    pub fn with_completion(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete(callback);
        self
    }

    /// Begin the choreography; later calls are ignored
    pub fn start(&mut self) -> bool {
        let started = self.sequencer.start();
        if started {
            tracing::info!(looping = self.sequencer.is_looping(), "launch sequence started");
        } else {
            tracing::debug!(phase = ?self.sequencer.phase(), "launch sequence already started; ignoring");
        }
        started
    }

    pub fn cancel(&mut self) {
        self.sequencer.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.sequencer.cancel_handle()
    }

    pub fn phase(&self) -> SequencerPhase {
        self.sequencer.phase()
    }

    pub fn is_completed(&self) -> bool {
        self.sequencer.is_completed()
    }

    /// Torn down; holds even when cancelled after completion
    pub fn is_cancelled(&self) -> bool {
        self.sequencer.is_cancelled()
    }

    pub fn is_looping(&self) -> bool {
        self.sequencer.is_looping()
    }

    /// Time since `start()`, including time after the last stage
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Finished debug loops
    pub fn cycles(&self) -> u64 {
        self.sequencer.cycles()
    }

    /// Whether every progress spring has come to rest
    pub fn is_settled(&self) -> bool {
        !self.scheduler.has_active_animations()
    }

    /// Advance the timeline by one frame
    pub fn advance(&mut self, dt: Duration) -> LaunchEvents {
        if !self.sequencer.is_started() || self.sequencer.is_cancelled() {
            return LaunchEvents::new();
        }

        let target = self.scheduler.now() + dt;
        let events = self.sequencer.advance(dt);

        // Teardown observed mid-call: leave the progress untouched
        if self.sequencer.is_cancelled() {
            return events;
        }

        for event in &events {
            self.scheduler.advance_to(event.at());
            self.apply(event);
        }
        // Springs keep settling after the sequencer has finished
        self.scheduler.advance_to(target);

        events
    }

    fn apply(&mut self, event: &SequencerEvent<ProgressField>) {
        match event {
            SequencerEvent::StageStarted {
                stage,
                targets,
                spring,
                ..
            } => {
                for &(field, value) in targets {
                    self.scheduler
                        .animate(self.channels[field.index()], value, *spring);
                }
                tracing::debug!(stage, "launch stage applied");
            }
            SequencerEvent::Reset { .. } => {
                for id in self.channels {
                    self.scheduler.snap(id, 0.0);
                }
                tracing::debug!(cycle = self.sequencer.cycles(), "launch progress reset");
            }
            SequencerEvent::Completed { at } => {
                tracing::info!(at_ms = at.as_millis() as u64, "launch sequence completed");
                if let Some(callback) = self.on_complete.take() {
                    callback();
                }
            }
        }
    }

    /// Current value of every progress scalar
    pub fn progress(&self) -> ProgressState {
        let mut state = ProgressState::ZERO;
        for field in ProgressField::ALL {
            if let Some(value) = self.scheduler.value(self.channels[field.index()]) {
                state.set(field, value);
            }
        }
        state
    }

    pub fn geometry(&self) -> &LaunchGeometry {
        &self.geometry
    }

    /// Mask geometry for the current progress
    pub fn animation_values(&self, viewport: Size) -> AnimationValues {
        self.geometry.animation_values(&self.progress(), viewport)
    }

    pub fn background_pill(&self, viewport: Size) -> BackgroundPill {
        self.geometry.background_pill(&self.progress(), viewport)
    }
}
