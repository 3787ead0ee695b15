//! courier-planner - plans cauldron collection routes from the live network API.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use courier_planner::config::Config;
use courier_planner::drain::{daily_drains, DrainOptions};
use courier_planner::model::NetworkSnapshot;
use courier_planner::planner::compute_assignment;
use courier_planner::reconcile::reconcile;
use courier_planner::refresh::{RefreshState, Refresher};
use courier_planner::source::HttpSource;
use courier_planner::traits::SnapshotSource;

#[derive(Parser)]
#[command(name = "courier-planner", about = "Deadline-aware courier routing for cauldron collection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute one assignment and print it as JSON
    Plan {
        /// Read a snapshot JSON file instead of fetching from the API
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Override the route duration budget
        #[arg(long)]
        max_route_minutes: Option<f64>,
    },
    /// Recompute periodically and log each published result
    Watch {
        /// Override the polling interval
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Compare transport tickets with detected drains
    Reconcile {
        /// Window start (unix seconds)
        #[arg(long)]
        start: i64,
        /// Window end (unix seconds)
        #[arg(long)]
        end: i64,
        /// Liters of difference still counted as a match
        #[arg(long, default_value_t = 5.0)]
        tolerance: f64,
        #[arg(long, default_value_t = 3.0)]
        std_multiplier: f64,
        #[arg(long, default_value_t = 5)]
        min_duration: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,courier_planner=debug".into()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("invalid configuration")?;

    match cli.command {
        Command::Plan {
            snapshot,
            max_route_minutes,
        } => {
            if let Some(minutes) = max_route_minutes {
                config.solve.max_route_minutes = minutes;
            }
            let snapshot = match snapshot {
                Some(path) => read_snapshot(&path)?,
                None => HttpSource::new(config.source.clone())?.fetch_snapshot()?,
            };
            let result = compute_assignment(&snapshot, &config.solve);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Watch { interval_secs } => {
            let interval = interval_secs
                .map(Duration::from_secs)
                .unwrap_or(config.poll_interval);
            let source = HttpSource::new(config.source.clone())?;
            let refresher = Refresher::new(source, config.solve.clone());
            info!(?interval, "watching");
            refresher.run(interval, None, |state| match state {
                RefreshState::Ready { generation, result } => info!(
                    generation,
                    routes = result.routes.len(),
                    overdue = result.overdue.len(),
                    unroutable = result.unroutable.len(),
                    "routes published"
                ),
                RefreshState::Failed { generation, error } => {
                    warn!(generation, %error, "refresh failed")
                }
                RefreshState::Pending => {}
            });
        }
        Command::Reconcile {
            start,
            end,
            tolerance,
            std_multiplier,
            min_duration,
        } => {
            let source = HttpSource::new(config.source.clone())?;
            let (levels, tickets) = rayon::join(
                || source.fetch_levels(start, end),
                || source.fetch_tickets(),
            );
            let options = DrainOptions {
                std_multiplier,
                min_duration,
            };
            let drains = daily_drains(&levels?, &options);
            let report = reconcile(&tickets?, &drains, tolerance);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<NetworkSnapshot> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let parsed: NetworkSnapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    let snapshot = NetworkSnapshot::new(parsed.points, parsed.depot, parsed.edges, parsed.levels);
    snapshot.validate()?;
    Ok(snapshot)
}
