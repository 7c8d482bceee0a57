//! etabar CLI - progress and ETA demo driver.

use anyhow::Result;
use clap::{Parser, Subcommand};
use etabar_core::{format_eta, OutOfBoundsFormat, ProgressConfig};
use etabar_progress::ProgressTracker;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "etabar")]
#[command(about = "Progress tracking with estimated time remaining", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a task and print its progress after every step
    Run {
        /// Total units of work
        #[arg(long)]
        total: Option<u64>,
        /// Smoothing factor in [0, 1]
        #[arg(long)]
        smoothing: Option<f64>,
        /// Starting value
        #[arg(long)]
        starting_at: Option<u64>,
        /// Out of bounds format (raw, unknown, friendly)
        #[arg(long)]
        out_of_bounds: Option<String>,
        /// JSON configuration object; flags override its values
        #[arg(long)]
        config: Option<String>,
        /// Delay between increments in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u64,
        /// Number of increments (defaults to the remaining span)
        #[arg(long)]
        steps: Option<u64>,
        /// Print JSON snapshots instead of status lines
        #[arg(long)]
        json: bool,
    },
    /// Print the ETA label for a remaining time
    Format {
        /// Remaining seconds
        seconds: u64,
        /// Out of bounds format (raw, unknown, friendly)
        #[arg(long)]
        out_of_bounds: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            total,
            smoothing,
            starting_at,
            out_of_bounds,
            config,
            delay_ms,
            steps,
            json,
        } => {
            let mut config = match config {
                Some(json) => ProgressConfig::from_json(&json)?,
                None => ProgressConfig::default(),
            };
            if let Some(total) = total {
                config.total = Some(total);
            }
            if let Some(smoothing) = smoothing {
                config.smoothing = smoothing;
            }
            if let Some(starting_at) = starting_at {
                config.starting_at = starting_at;
            }
            if let Some(token) = out_of_bounds.as_deref() {
                config.out_of_bounds_format = token.parse()?;
            }
            config.validate()?;

            let steps = step_count(steps, &config);

            let mut tracker = ProgressTracker::new(config)?;
            info!("Running {} steps, {}ms apart", steps, delay_ms);
            tracker.start();

            for _ in 0..steps {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                tracker.increment()?;

                if json {
                    println!("{}", serde_json::to_string(&tracker.snapshot())?);
                } else {
                    println!(
                        "{:>3}% | {} |{}",
                        tracker.counter().percentage_completed(),
                        tracker.elapsed_label(),
                        tracker.eta(),
                    );
                }
            }

            tracker.finish();
            info!("Finished in {}", tracker.elapsed_label());
        }
        Commands::Format { seconds, out_of_bounds } => {
            let format = OutOfBoundsFormat::from_token(out_of_bounds.as_deref())?;
            println!("{}", format_eta(Some(seconds), format));
        }
    }

    Ok(())
}

/// Number of increments to run: the requested count, capped at the span when
/// the total is known, or the whole span by default.
fn step_count(requested: Option<u64>, config: &ProgressConfig) -> u64 {
    let span = config
        .total
        .map(|total| total.saturating_sub(config.starting_at));
    match (requested, span) {
        (Some(steps), Some(span)) => steps.min(span),
        (Some(steps), None) => steps,
        (None, Some(span)) => span,
        (None, None) => 100,
    }
}
