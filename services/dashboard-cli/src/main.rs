//! Weather dashboard command-line service.
//!
//! Works on a saved dashboard state file:
//! - `refresh`: fetch current weather and time series for stale polygons
//! - `colors`: recolor polygons for a timeline position from cached series
//! - `add-polygon`: add a polygon from 3 to 12 points
//! - `timeline`: show or move the timeline selection

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_common::{parse_timestamp, LatLng, TimelineMode};
use dashboard_state::DashboardStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::TimelineChange;
use config::DashboardConfig;

#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Color map polygons by weather at any point on the timeline")]
struct Args {
    /// Dashboard state file
    #[arg(long, env = "DASHBOARD_STATE", default_value = "dashboard.json")]
    state: PathBuf,

    /// YAML configuration file (defaults apply when omitted)
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch weather for polygons whose data is stale
    Refresh {
        /// Refresh even when the cached weather is fresh
        #[arg(long)]
        force: bool,

        /// Skip the past/forecast time series
        #[arg(long)]
        no_series: bool,
    },

    /// Recolor polygons for a point in time
    Colors {
        /// Time to color for (default: timeline selection, else now)
        #[arg(long, value_parser = parse_time)]
        at: Option<DateTime<Utc>>,
    },

    /// Add a polygon
    AddPolygon {
        name: String,

        /// Vertex as `lat,lng`; repeat 3 to 12 times
        #[arg(long = "point", value_parser = parse_point, num_args = 1, required = true)]
        points: Vec<LatLng>,

        #[arg(long, default_value = "temperature")]
        data_source: String,
    },

    /// Show or change the timeline selection
    Timeline {
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Select a time (snapped down to the hour)
        #[arg(long, value_parser = parse_time)]
        select: Option<DateTime<Utc>>,

        /// Select by hours from the start of the timeline
        #[arg(long)]
        hour: Option<i64>,

        #[arg(long, value_parser = parse_time)]
        start: Option<DateTime<Utc>>,

        #[arg(long, value_parser = parse_time)]
        end: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Range,
}

impl From<ModeArg> for TimelineMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => TimelineMode::Single,
            ModeArg::Range => TimelineMode::Range,
        }
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).map_err(|e| e.to_string())
}

fn parse_point(s: &str) -> Result<LatLng, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got `{s}`"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude `{lat}`"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude `{lng}`"))?;

    let point = LatLng::new(lat, lng);
    if !point.is_valid() {
        return Err(format!("coordinate out of range: {point}"));
    }
    Ok(point)
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout is reserved for command output
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = DashboardConfig::load(args.config.as_deref())?;

    let mut store = DashboardStore::load(&args.state)
        .await
        .with_context(|| format!("Failed to load dashboard state: {}", args.state.display()))?;
    if store.migrate_data_sources() {
        info!("Dashboard state migrated");
    }

    match args.command {
        Command::Refresh { force, no_series } => {
            commands::refresh(&mut store, &config, force, !no_series).await?;
        }
        Command::Colors { at } => {
            commands::colors(&mut store, &config, at)?;
        }
        Command::AddPolygon {
            name,
            points,
            data_source,
        } => {
            commands::add_polygon(&mut store, name, points, &data_source)?;
        }
        Command::Timeline {
            mode,
            select,
            hour,
            start,
            end,
        } => {
            let change = TimelineChange {
                mode: mode.map(Into::into),
                select,
                hour,
                start,
                end,
            };
            commands::timeline(&mut store, &config, change, Utc::now())?;
        }
    }

    store
        .save(&args.state)
        .await
        .with_context(|| format!("Failed to save dashboard state: {}", args.state.display()))?;

    Ok(())
}
