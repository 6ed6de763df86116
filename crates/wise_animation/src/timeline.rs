//! Staged timeline orchestration
//!
//! A [`StageSequencer`] walks an ordered list of [`Stage`]s. Each stage waits
//! for its pre-delay and then requests spring transitions for one or more
//! channels. Waits are measured on the sequencer's own clock, never on
//! transition settling, so a transition may still be easing when the next
//! stage's wait begins.
//!
//! ```text
//! Idle ──start()──▶ Running(0) ─▶ … ─▶ Running(n-1) ─▶ Finishing ─▶ Completed
//!                       ▲                                  │ (loop mode)
//!                       └────────────── Resetting ◀────────┘
//! ```
//!
//! The sequencer is advanced explicitly with [`StageSequencer::advance`] and
//! reports what happened as [`SequencerEvent`]s stamped with the exact
//! timeline instant at which they occurred, independent of frame size.

use crate::error::{AnimationError, Result};
use crate::spring::SpringConfig;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Channel assignments of a single stage
pub type StageTargets<K> = SmallVec<[(K, f32); 2]>;

/// One scheduled unit of a choreography
#[derive(Clone, Debug, PartialEq)]
pub struct Stage<K> {
    /// Wait before the transition is requested
    pub pre_delay: Duration,
    /// Channels retargeted together by this stage
    pub targets: StageTargets<K>,
    /// Spring response time
    pub response: Duration,
    /// Spring damping ratio (1.0 = critical)
    pub damping_ratio: f32,
}

impl<K: Copy> Stage<K> {
    /// A critically damped stage with a 0.5s response and no targets yet
    pub fn after(pre_delay: Duration) -> Self {
        Self {
            pre_delay,
            targets: SmallVec::new(),
            response: Duration::from_millis(500),
            damping_ratio: 1.0,
        }
    }

    /// Builder: retarget `channel` to `value`
    pub fn target(mut self, channel: K, value: f32) -> Self {
        self.targets.push((channel, value));
        self
    }

    /// Builder: set the spring timing
    pub fn spring(mut self, response: Duration, damping_ratio: f32) -> Self {
        self.response = response;
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn spring_config(&self) -> Result<SpringConfig> {
        SpringConfig::from_response(self.response, self.damping_ratio)
    }
}

/// What happens after the last stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Pause, report completion once, then stop for good
    Once { completion_pause: Duration },
    /// Pause, reset every channel to zero and start over; never completes
    Loop { loop_pause: Duration },
}

impl PlaybackMode {
    fn pause(&self) -> Duration {
        match *self {
            PlaybackMode::Once { completion_pause } => completion_pause,
            PlaybackMode::Loop { loop_pause } => loop_pause,
        }
    }
}

/// Sequencer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerPhase {
    Idle,
    /// Waiting out the pre-delay of `stage`
    Running { stage: usize },
    /// Pause after the last stage
    Finishing,
    /// Channels were just zeroed; the next cycle starts on the next advance
    Resetting,
    Completed,
    Cancelled,
}

impl SequencerPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SequencerPhase::Completed | SequencerPhase::Cancelled)
    }
}

/// Something the owner of the animated channels must apply
#[derive(Clone, Debug, PartialEq)]
pub enum SequencerEvent<K> {
    /// Snap every channel back to zero
    Reset { at: Duration },
    /// Start spring transitions toward the stage targets
    StageStarted {
        at: Duration,
        stage: usize,
        targets: StageTargets<K>,
        spring: SpringConfig,
    },
    /// The sequence finished; emitted at most once
    Completed { at: Duration },
}

impl<K> SequencerEvent<K> {
    /// Timeline instant (since `start()`) at which the event occurred
    pub fn at(&self) -> Duration {
        match self {
            SequencerEvent::Reset { at }
            | SequencerEvent::StageStarted { at, .. }
            | SequencerEvent::Completed { at } => *at,
        }
    }
}

/// Shared teardown flag for a running sequence
///
/// Cloned into whatever hosts the sequence (a view, a driver task). Once
/// cancelled, the sequencer emits nothing further.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives an ordered list of stages on an explicit clock
#[derive(Debug)]
pub struct StageSequencer<K> {
    stages: Vec<Stage<K>>,
    springs: Vec<SpringConfig>,
    mode: PlaybackMode,
    phase: SequencerPhase,
    started: bool,
    /// Time since `start()`
    clock: Duration,
    /// Time already spent in the current wait
    waited: Duration,
    cycles: u64,
    cancel: CancelHandle,
}

impl<K: Copy + std::fmt::Debug> StageSequencer<K> {
    /// Validate the stage table and build an idle sequencer
    pub fn new(stages: Vec<Stage<K>>, mode: PlaybackMode) -> Result<Self> {
        if stages.is_empty() {
            return Err(AnimationError::NoStages);
        }

        let mut springs = Vec::with_capacity(stages.len());
        for (index, stage) in stages.iter().enumerate() {
            if stage.targets.is_empty() {
                return Err(AnimationError::EmptyStage { index });
            }
            springs.push(stage.spring_config()?);
        }

        if let PlaybackMode::Loop { loop_pause } = mode {
            let cycle: Duration = stages.iter().map(|s| s.pre_delay).sum::<Duration>() + loop_pause;
            if cycle.is_zero() {
                return Err(AnimationError::ZeroLengthLoop);
            }
        }

        Ok(Self {
            stages,
            springs,
            mode,
            phase: SequencerPhase::Idle,
            started: false,
            clock: Duration::ZERO,
            waited: Duration::ZERO,
            cycles: 0,
            cancel: CancelHandle::new(),
        })
    }

    pub fn stages(&self) -> &[Stage<K>] {
        &self.stages
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_looping(&self) -> bool {
        matches!(self.mode, PlaybackMode::Loop { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SequencerPhase::Completed
    }

    /// Whether teardown was requested, whatever phase the sequencer was in
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time since `start()`
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Number of finished loop cycles (loop mode only)
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// A handle that cancels this sequencer from elsewhere
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Begin the sequence. Returns `false` (and does nothing) if it was
    /// already started, completed or cancelled.
    pub fn start(&mut self) -> bool {
        if self.started {
            tracing::debug!(phase = ?self.phase, "sequencer: duplicate start ignored");
            return false;
        }
        self.started = true;

        if self.cancel.is_cancelled() {
            self.phase = SequencerPhase::Cancelled;
            return false;
        }

        self.phase = SequencerPhase::Running { stage: 0 };
        self.clock = Duration::ZERO;
        self.waited = Duration::ZERO;
        tracing::debug!(stages = self.stages.len(), mode = ?self.mode, "sequencer: started");
        true
    }

    /// Tear down: no further events, no completion
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.observe_cancellation();
    }

    fn observe_cancellation(&mut self) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        if !self.phase.is_terminal() {
            tracing::debug!(phase = ?self.phase, "sequencer: cancelled");
            self.phase = SequencerPhase::Cancelled;
        }
        true
    }

    /// Time left in the current wait, or `None` when nothing is pending
    pub fn remaining_wait(&self) -> Option<Duration> {
        self.current_wait()
            .map(|wait| wait.saturating_sub(self.waited))
    }

    fn current_wait(&self) -> Option<Duration> {
        match self.phase {
            SequencerPhase::Running { stage } => Some(self.stages[stage].pre_delay),
            SequencerPhase::Finishing => Some(self.mode.pause()),
            SequencerPhase::Resetting => Some(Duration::ZERO),
            _ => None,
        }
    }

    /// Advance the sequencer clock by `dt`, returning every event that fell
    /// inside the step, in order.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[SequencerEvent<K>; 4]> {
        let mut events = SmallVec::new();

        if self.observe_cancellation() {
            return events;
        }

        let mut budget = dt;
        while let Some(remaining) = self.remaining_wait() {
            // A reset that lands exactly on the end of the step stays visible
            if self.phase == SequencerPhase::Resetting && budget.is_zero() {
                break;
            }
            if budget < remaining {
                self.waited += budget;
                self.clock += budget;
                break;
            }

            budget -= remaining;
            self.clock += remaining;
            self.waited = Duration::ZERO;
            let at = self.clock;

            match self.phase {
                SequencerPhase::Running { stage } => {
                    let targets = self.stages[stage].targets.clone();
                    tracing::debug!(stage, ?targets, at_ms = at.as_millis() as u64, "sequencer: stage");
                    events.push(SequencerEvent::StageStarted {
                        at,
                        stage,
                        targets,
                        spring: self.springs[stage],
                    });
                    self.phase = if stage + 1 < self.stages.len() {
                        SequencerPhase::Running { stage: stage + 1 }
                    } else {
                        SequencerPhase::Finishing
                    };
                }
                SequencerPhase::Finishing => match self.mode {
                    PlaybackMode::Once { .. } => {
                        tracing::debug!(at_ms = at.as_millis() as u64, "sequencer: completed");
                        events.push(SequencerEvent::Completed { at });
                        self.phase = SequencerPhase::Completed;
                    }
                    PlaybackMode::Loop { .. } => {
                        self.cycles += 1;
                        tracing::debug!(cycle = self.cycles, "sequencer: resetting");
                        events.push(SequencerEvent::Reset { at });
                        self.phase = SequencerPhase::Resetting;
                    }
                },
                SequencerPhase::Resetting => {
                    self.phase = SequencerPhase::Running { stage: 0 };
                }
                _ => break,
            }
        }

        events
    }
}
