//! Geoflight demo
//!
//! Places one entity through the two-click placement flow and drives it with a
//! synthetic clock, printing entity snapshots as it goes.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use geoflight::api::{CsvFormatter, JsonFormatter, TextFormatter};
use geoflight::{ClickOutcome, ConfigurationManager, GeoPoint, RecordingSink, Simulation};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "geoflight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Great-circle motion simulator", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start point as "lat,lon"
    #[arg(long, default_value = "37.5665,126.9780", allow_hyphen_values = true)]
    from: GeoPoint,

    /// End point as "lat,lon"
    #[arg(long, default_value = "40.7128,-74.0060", allow_hyphen_values = true)]
    to: GeoPoint,

    /// Mark the entity hostile
    #[arg(long)]
    hostile: bool,

    /// Simulated seconds to run
    #[arg(short, long, default_value = "600")]
    seconds: f64,

    /// Tick step in milliseconds (defaults to the configured tick interval)
    #[arg(long)]
    step_ms: Option<u64>,

    /// Print a snapshot every N ticks
    #[arg(long, default_value = "625")]
    report_every: u64,

    /// Snapshot output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// After the run, print every sink event as one JSON object per line
    #[arg(long)]
    trace: bool,

    /// Include per-tick position updates in the trace
    #[arg(long, requires = "trace")]
    trace_positions: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let manager = match &cli.config {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigurationManager::new(),
    };
    let config = manager.into_config();

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let step = Duration::from_millis(cli.step_ms.unwrap_or(config.timing.tick_interval_ms).max(1));
    let total_ticks = (cli.seconds.max(0.0) / step.as_secs_f64()).ceil() as u64;
    let report_every = cli.report_every.max(1);

    let sink = if cli.trace_positions {
        RecordingSink::new()
    } else {
        RecordingSink::without_position_updates()
    };
    let mut sim = Simulation::new(config, sink)?;
    sim.start();

    sim.enter_placement_mode();
    sim.point_clicked(cli.from, cli.hostile)?;
    let id = match sim.point_clicked(cli.to, cli.hostile)? {
        ClickOutcome::Spawned(id) => id,
        other => anyhow::bail!("placement did not complete: {:?}", other),
    };
    sim.exit_placement_mode();

    info!(%id, ticks = total_ticks, step_ms = step.as_millis() as u64, "running");

    if let OutputFormat::Csv = cli.format {
        println!("{}", CsvFormatter::new().header());
    }

    let mut now = Instant::now();
    for tick in 0..=total_ticks {
        let report = sim.tick(now);
        now += step;

        let last = tick == total_ticks;
        if tick % report_every == 0 || last || !report.arrived.is_empty() {
            emit(cli.format, &sim)?;
        }
        if !sim.scheduler().any_in_flight() {
            info!(tick, "all entities arrived");
            break;
        }
    }

    for snapshot in sim.snapshots() {
        info!(
            id = %snapshot.id,
            progress = snapshot.progress,
            arrived = snapshot.arrived,
            "final state"
        );
    }

    if cli.trace {
        let sink = sim.into_sink();
        info!(events = sink.events().len(), "sink trace");
        println!("{}", sink.to_json_lines()?);
    }
    Ok(())
}

fn emit(format: OutputFormat, sim: &Simulation<RecordingSink>) -> Result<()> {
    let snapshots = sim.snapshots();
    match format {
        OutputFormat::Text => {
            let formatter = TextFormatter::compact();
            for snapshot in &snapshots {
                println!("{}", formatter.format_text(snapshot));
            }
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new().format_all(&snapshots)?),
        OutputFormat::Csv => {
            let formatter = CsvFormatter::new();
            for snapshot in &snapshots {
                println!("{}", formatter.format_csv(snapshot));
            }
        }
    }
    Ok(())
}
