//! Realtime driver tests on tokio's paused clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use wise_app::{DriveOutcome, LaunchDriver, LaunchGeometry, LaunchSequence, LaunchSettings};

fn counted_sequence(debug: bool) -> (LaunchSequence, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let settings = LaunchSettings {
        debug,
        ..LaunchSettings::default()
    };
    let sequence = LaunchSequence::new(&settings, LaunchGeometry::default())
        .unwrap()
        .with_completion(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    (sequence, fired)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wise_app=debug,wise_animation=debug")
        .with_test_writer()
        .try_init();
}

#[tokio::test(start_paused = true)]
async fn test_driver_completes_after_final_pause() {
    init_tracing();
    let (sequence, fired) = counted_sequence(false);
    let (driver, progress) = LaunchDriver::new(sequence, Duration::from_millis(16));

    let started = Instant::now();
    let outcome = driver.run().await;
    let elapsed = started.elapsed();

    assert_eq!(outcome, DriveOutcome::Completed);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(elapsed >= Duration::from_millis(1_950));
    assert!(elapsed < Duration::from_millis(1_950 + 32));

    let last = *progress.borrow();
    assert!(last.background > 1.0);
    assert!(last.texture_full_screen > 0.5);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_without_completion() {
    let (sequence, fired) = counted_sequence(false);
    let (driver, progress) = LaunchDriver::new(sequence, Duration::from_millis(16));
    let cancel = driver.cancel_handle();

    let task = tokio::spawn(driver.run());
    tokio::time::sleep(Duration::from_millis(800)).await;
    cancel.cancel();

    assert_eq!(task.await.unwrap(), DriveOutcome::Cancelled);
    let frozen = *progress.borrow();
    assert!(frozen.background > 0.0);
    assert_eq!(frozen.texture_width, 0.0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(*progress.borrow(), frozen);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_aborted_task_never_completes() {
    let (sequence, fired) = counted_sequence(false);
    let (driver, _progress) = LaunchDriver::new(sequence, Duration::from_millis(16));

    let task = tokio::spawn(driver.run());
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_debug_loop_runs_until_cancelled() {
    let (sequence, fired) = counted_sequence(true);
    let (driver, progress) = LaunchDriver::new(sequence, Duration::from_millis(16));
    let cancel = driver.cancel_handle();

    let task = tokio::spawn(driver.run());

    // Three full cycles
    tokio::time::sleep(Duration::from_millis(3 * 3_450 + 100)).await;
    assert!(!task.is_finished());
    assert!(progress.has_changed().unwrap());

    cancel.cancel();
    assert_eq!(task.await.unwrap(), DriveOutcome::Cancelled);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
