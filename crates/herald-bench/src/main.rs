//! Publish-throughput profiler for the Herald event bus.
//!
//! Binary name: `herald-profile`
//!
//! Builds a bus with a grid of events and listeners, hammers it with
//! publishes, and reports wall time plus mean per-publish latency as JSON.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use herald_core::pubsub::{Bus, Handler};
use herald_types::payload::Payload;

#[derive(Parser)]
#[command(name = "herald-profile", about = "Profile Herald publish throughput")]
struct Cli {
    /// Number of publish calls to measure.
    #[arg(long, default_value_t = 20_000)]
    iterations: usize,

    /// Number of distinct event names.
    #[arg(long, default_value_t = 50)]
    events: usize,

    /// Subscribers registered per event.
    #[arg(long, default_value_t = 20)]
    listeners: usize,

    /// Also write the metrics JSON to this path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Metrics {
    iterations: usize,
    events_count: usize,
    listeners_per_event: usize,
    total_wall_time_ms: f64,
    avg_us_per_publish: f64,
}

async fn run_scenario(
    iterations: usize,
    events_count: usize,
    listeners_per_event: usize,
) -> anyhow::Result<Metrics> {
    let bus = Bus::new();
    let events: Vec<String> = (0..events_count).map(|i| format!("event-{i}")).collect();

    for event in &events {
        for _ in 0..listeners_per_event {
            bus.subscribe(event, Handler::sync(|_| Ok(())));
        }
    }
    debug!(
        events = events_count,
        listeners = listeners_per_event,
        "registered listener grid"
    );

    bus.publish("warmup", Payload::empty()).await?;

    let start = Instant::now();
    for i in 0..iterations {
        let event = &events[i % events.len()];
        // Periodically mix in a once async subscriber so the measured path
        // covers both sync fan-out and awaited completion with auto-removal.
        if i % 500 == 0 {
            bus.once(event, Handler::new(|_| async { Ok(()) }));
        }
        bus.publish(event, Payload::single(json!(i))).await?;
    }
    let elapsed = start.elapsed();

    let total_wall_time_ms = elapsed.as_secs_f64() * 1_000.0;
    Ok(Metrics {
        iterations,
        events_count,
        listeners_per_event,
        total_wall_time_ms,
        avg_us_per_publish: total_wall_time_ms / iterations as f64 * 1_000.0,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,herald_core=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let metrics = run_scenario(cli.iterations, cli.events, cli.listeners).await?;
    let rendered = serde_json::to_string_pretty(&metrics)?;

    if let Some(path) = &cli.out {
        std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write metrics to {}", path.display()))?;
    }
    println!("{rendered}");

    Ok(())
}
