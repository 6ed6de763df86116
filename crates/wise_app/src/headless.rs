//! Deterministic headless runs.
//!
//! Drives the launch sequence or the onboarding clip on a fixed logical
//! tick and records what a renderer would have drawn on every frame. Used
//! by the CLI and by integration tests; no wall clock is involved.

use crate::config::WiseConfig;
use crate::launch::{
    AnimationValues, ArrowOverlay, BackgroundPill, LaunchSequence, ProgressState, Size,
};
use crate::onboarding::{Onboarding, OnboardingFrame};
use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use wise_animation::{SequencerEvent, SequencerPhase};

/// Frames reserved up front; longer runs grow the buffer as they go
const FRAME_PREALLOC: usize = 4096;

/// Configuration for a headless frame run
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    pub viewport: Size,
    /// Number of frames to execute at most
    pub max_frames: u32,
    /// Logical milliseconds between frames
    pub tick_ms: u64,
}

impl HeadlessRunConfig {
    pub fn from_config(config: &WiseConfig) -> Self {
        Self {
            viewport: config.viewport,
            max_frames: config.headless.max_frames,
            tick_ms: config.headless.tick_ms,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            bail!("headless viewport must be non-empty");
        }
        if self.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }
}

/// Timeline marker recorded from a sequencer event
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchMark {
    Stage { at_ms: u64, stage: usize },
    Reset { at_ms: u64 },
    Completed { at_ms: u64 },
}

impl<K> From<&SequencerEvent<K>> for LaunchMark {
    fn from(event: &SequencerEvent<K>) -> Self {
        let at_ms = event.at().as_millis() as u64;
        match event {
            SequencerEvent::StageStarted { stage, .. } => LaunchMark::Stage {
                at_ms,
                stage: *stage,
            },
            SequencerEvent::Reset { .. } => LaunchMark::Reset { at_ms },
            SequencerEvent::Completed { .. } => LaunchMark::Completed { at_ms },
        }
    }
}

/// One rendered launch frame
#[derive(Debug, Clone, Serialize)]
pub struct LaunchFrame {
    pub frame: u32,
    pub elapsed_ms: u64,
    pub phase: &'static str,
    pub progress: ProgressState,
    pub mask: AnimationValues,
    pub pill: BackgroundPill,
    pub arrow: ArrowOverlay,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub debug: bool,
    pub tick_ms: u64,
    pub viewport: Size,
    pub marks: Vec<LaunchMark>,
    pub completed_at_ms: Option<u64>,
    pub frames: Vec<LaunchFrame>,
}

impl LaunchReport {
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

pub fn phase_label(phase: SequencerPhase) -> &'static str {
    match phase {
        SequencerPhase::Idle => "idle",
        SequencerPhase::Running { .. } => "running",
        SequencerPhase::Finishing => "finishing",
        SequencerPhase::Resetting => "resetting",
        SequencerPhase::Completed => "completed",
        SequencerPhase::Cancelled => "cancelled",
    }
}

/// Run the launch sequence for up to `run.max_frames` frames.
///
/// Frame 0 is the state right after `start()`. A non-looping run stops
/// early once it has completed and every spring is at rest.
pub fn run_launch(config: &WiseConfig, run: HeadlessRunConfig) -> Result<LaunchReport> {
    run.validate()?;

    let mut sequence = LaunchSequence::new(&config.launch, config.geometry)?;
    let geometry = *sequence.geometry();
    let tick = Duration::from_millis(run.tick_ms);

    let mut report = LaunchReport {
        debug: config.launch.debug,
        tick_ms: run.tick_ms,
        viewport: run.viewport,
        marks: Vec::new(),
        completed_at_ms: None,
        frames: Vec::with_capacity((run.max_frames as usize).min(FRAME_PREALLOC)),
    };

    sequence.start();
    for frame in 0..run.max_frames {
        if frame > 0 {
            for event in sequence.advance(tick).iter() {
                let mark = LaunchMark::from(event);
                if let LaunchMark::Completed { at_ms } = mark {
                    report.completed_at_ms = Some(at_ms);
                }
                report.marks.push(mark);
            }
        }

        let progress = sequence.progress();
        let mask = geometry.animation_values(&progress, run.viewport);
        report.frames.push(LaunchFrame {
            frame,
            elapsed_ms: sequence.elapsed().as_millis() as u64,
            phase: phase_label(sequence.phase()),
            progress,
            mask,
            pill: geometry.background_pill(&progress, run.viewport),
            arrow: geometry.arrow_overlay(&mask),
        });

        if sequence.is_completed() && sequence.is_settled() {
            tracing::debug!(frame, "headless launch settled");
            break;
        }
    }

    tracing::info!(
        frames = report.frames.len(),
        completed_at_ms = ?report.completed_at_ms,
        "headless launch run finished"
    );
    Ok(report)
}

/// Sample the onboarding screen for `duration` at `tick_ms` steps
pub fn run_onboarding(
    config: &WiseConfig,
    duration: Duration,
    tick_ms: u64,
) -> Result<Vec<OnboardingFrame>> {
    if tick_ms == 0 {
        bail!("headless tick_ms must be > 0");
    }

    let mut screen = Onboarding::new(config.coin_clip()?, config.onboarding.floating_bob());
    let tick = Duration::from_millis(tick_ms);
    let mut frames = Vec::new();
    loop {
        frames.push(screen.frame());
        if screen.elapsed() + tick > duration {
            break;
        }
        screen.advance(tick);
    }
    Ok(frames)
}
