//! Realtime host for a [`LaunchSequence`]
//!
//! The driver task owns the sequence outright and publishes a progress
//! snapshot after every frame on a `watch` channel, so renderers only ever
//! read.

use super::progress::ProgressState;
use super::sequence::LaunchSequence;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use wise_animation::CancelHandle;

/// How a driven sequence ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveOutcome {
    Completed,
    Cancelled,
}

pub struct LaunchDriver {
    sequence: LaunchSequence,
    frame_interval: Duration,
    progress_tx: watch::Sender<ProgressState>,
}

impl LaunchDriver {
    pub fn new(
        sequence: LaunchSequence,
        frame_interval: Duration,
    ) -> (Self, watch::Receiver<ProgressState>) {
        let (progress_tx, progress_rx) = watch::channel(sequence.progress());
        let driver = Self {
            sequence,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            progress_tx,
        };
        (driver, progress_rx)
    }

    /// Handle that stops the driver at its next frame
    pub fn cancel_handle(&self) -> CancelHandle {
        self.sequence.cancel_handle()
    }

    /// Run until the sequence completes or is cancelled.
    ///
    /// A looping sequence only ends through cancellation. Dropping the
    /// future tears the sequence down without firing completion.
    pub async fn run(mut self) -> DriveOutcome {
        let cancel = self.sequence.cancel_handle();
        self.sequence.start();

        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();

        loop {
            interval.tick().await;
            if cancel.is_cancelled() {
                self.sequence.cancel();
                tracing::info!(elapsed_ms = self.sequence.elapsed().as_millis() as u64, "launch driver cancelled");
                return DriveOutcome::Cancelled;
            }

            let now = Instant::now();
            self.sequence.advance(now - last);
            last = now;
            self.progress_tx.send_replace(self.sequence.progress());

            if self.sequence.is_completed() {
                return DriveOutcome::Completed;
            }
        }
    }
}
