//! Wise CLI
//!
//! Run the launch and onboarding animations headless or in real time, and
//! validate `wise.toml`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wise_app::{
    run_launch, run_onboarding, DriveOutcome, HeadlessRunConfig, LaunchDriver, LaunchFrame,
    LaunchMark, LaunchSequence, Onboarding, OnboardingFrame, RootFlow, WiseConfig,
};

#[derive(Parser)]
#[command(name = "wise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wise launch and onboarding animation runner", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to ./wise.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the launch sequence headless and print every frame
    Launch {
        /// Loop forever with a reset between cycles
        #[arg(long)]
        debug: bool,

        /// Frame budget
        #[arg(long)]
        frames: Option<u32>,

        /// Logical milliseconds per frame
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sample the onboarding coin loop
    Coin {
        /// Seconds to sample
        #[arg(long, default_value = "4.1")]
        seconds: f64,

        /// Logical milliseconds per frame
        #[arg(long, default_value = "100")]
        tick_ms: u64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Play launch in real time, then hand off to onboarding
    Run {
        /// Loop the launch sequence until the timeout
        #[arg(long)]
        debug: bool,

        /// Give up after this many milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,

        /// How long to play onboarding after the hand-off
        #[arg(long, default_value = "2000")]
        onboarding_ms: u64,
    },

    /// Validate the configuration and print the effective values
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = WiseConfig::load_or_default(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Commands::Launch {
            debug,
            frames,
            tick_ms,
            json,
        } => cmd_launch(config, debug, frames, tick_ms, json),
        Commands::Coin {
            seconds,
            tick_ms,
            json,
        } => cmd_coin(&config, seconds, tick_ms, json),
        Commands::Run {
            debug,
            timeout_ms,
            onboarding_ms,
        } => cmd_run(config, debug, timeout_ms, onboarding_ms),
        Commands::Check => cmd_check(&config),
    }
}

fn cmd_launch(
    mut config: WiseConfig,
    debug: bool,
    frames: Option<u32>,
    tick_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    config.launch.debug |= debug;
    let mut run = HeadlessRunConfig::from_config(&config);
    if let Some(frames) = frames {
        run.max_frames = frames;
    }
    if let Some(tick_ms) = tick_ms {
        run.tick_ms = tick_ms;
    }

    let report = run_launch(&config, run)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        return report.write_to_writer(&mut out);
    }

    for frame in &report.frames {
        writeln!(out, "{}", format_launch_frame(frame))?;
    }
    writeln!(out)?;
    for mark in &report.marks {
        match mark {
            LaunchMark::Stage { at_ms, stage } => writeln!(out, "{at_ms:>6} ms  stage {stage}")?,
            LaunchMark::Reset { at_ms } => writeln!(out, "{at_ms:>6} ms  reset")?,
            LaunchMark::Completed { at_ms } => writeln!(out, "{at_ms:>6} ms  completed")?,
        }
    }
    Ok(())
}

fn format_launch_frame(frame: &LaunchFrame) -> String {
    let p = &frame.progress;
    format!(
        "#{:<4} {:>6} ms  {:<9}  bg={:.3} vert={:.3} width={:.3} full={:.3}  mask w={:.1} r={:.1} y={:.1}  arrow={:.2}",
        frame.frame,
        frame.elapsed_ms,
        frame.phase,
        p.background,
        p.texture_vertical,
        p.texture_width,
        p.texture_full_screen,
        frame.mask.current_width,
        frame.mask.current_corner_radius,
        frame.mask.vertical_offset,
        frame.arrow.scale,
    )
}

fn format_onboarding_frame(frame: &OnboardingFrame) -> String {
    format!(
        "{:>6} ms  coin x={:>8.2} y={:>8.2} rot={:>7.1}  float={:>6.2}",
        frame.elapsed_ms, frame.coin.x, frame.coin.y, frame.coin.rotation_deg, frame.float_offset,
    )
}

fn cmd_coin(config: &WiseConfig, seconds: f64, tick_ms: u64, json: bool) -> Result<()> {
    if !(seconds.is_finite() && seconds >= 0.0) {
        anyhow::bail!("--seconds must be a non-negative number, got {seconds}");
    }
    let Ok(duration) = Duration::try_from_secs_f64(seconds) else {
        anyhow::bail!("--seconds is out of range, got {seconds}");
    };
    let frames = run_onboarding(config, duration, tick_ms)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &frames)?;
        writeln!(out)?;
    } else {
        for frame in &frames {
            writeln!(out, "{}", format_onboarding_frame(frame))?;
        }
    }
    Ok(())
}

fn cmd_run(mut config: WiseConfig, debug: bool, timeout_ms: u64, onboarding_ms: u64) -> Result<()> {
    config.launch.debug |= debug;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    runtime.block_on(run_realtime(config, timeout_ms, onboarding_ms))
}

async fn run_realtime(config: WiseConfig, timeout_ms: u64, onboarding_ms: u64) -> Result<()> {
    let tick = Duration::from_millis(config.headless.tick_ms);
    let sequence = LaunchSequence::new(&config.launch, config.geometry)?
        .with_completion(|| info!("launch complete"));
    let (driver, mut progress) = LaunchDriver::new(sequence, tick);
    let cancel = driver.cancel_handle();
    let geometry = config.geometry;
    let viewport = config.viewport;

    let mut task = tokio::spawn(driver.run());
    let deadline = tokio::time::sleep(Duration::from_millis(timeout_ms));
    tokio::pin!(deadline);
    let mut timed_out = false;

    let outcome = loop {
        tokio::select! {
            joined = &mut task => break joined.context("launch driver panicked")?,
            changed = progress.changed() => {
                if changed.is_err() {
                    continue;
                }
                let p = *progress.borrow_and_update();
                let mask = geometry.animation_values(&p, viewport);
                tracing::debug!(
                    background = p.background,
                    vertical = p.texture_vertical,
                    width = mask.current_width,
                    radius = mask.current_corner_radius,
                    "frame"
                );
            }
            _ = &mut deadline, if !timed_out => {
                timed_out = true;
                warn!(timeout_ms, "timed out; cancelling launch");
                cancel.cancel();
            }
        }
    };

    if outcome == DriveOutcome::Cancelled {
        info!("launch cancelled; staying on the launch screen");
        return Ok(());
    }

    let mut root = RootFlow::new(cancel);
    root.on_launch_complete();
    info!(destination = ?root.destination(), "routed");

    let mut onboarding = Onboarding::new(config.coin_clip()?, config.onboarding.floating_bob());
    onboarding.on_get_started(|| info!("get started"));
    let mut interval = tokio::time::interval(tick);
    let end = Duration::from_millis(onboarding_ms);
    let stdout = std::io::stdout();
    while onboarding.elapsed() < end {
        interval.tick().await;
        root.advance(tick);
        onboarding.advance(tick);
        let frame = onboarding.frame();
        if frame.elapsed_ms % 100 < config.headless.tick_ms {
            writeln!(
                stdout.lock(),
                "{}  fade={:.2}",
                format_onboarding_frame(&frame),
                root.crossfade_opacity()
            )?;
        }
    }
    root.on_onboarding_complete();
    Ok(())
}

fn cmd_check(config: &WiseConfig) -> Result<()> {
    let clip = config.coin_clip()?;
    info!(
        coin_period_ms = clip.period().as_millis() as u64,
        "configuration is valid"
    );
    let text = config.to_toml_string()?;
    print!("{text}");
    Ok(())
}
