//! load-engine CLI
//!
//! Computes heatmap and risk board payloads from the configured SQLite
//! database and prints them as JSON.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use training_load_lib::config::EngineConfig;
use training_load_lib::db::{self, AppState};
use training_load_lib::{commands, logging, store, EngineResult, WindowConfig};

#[derive(Parser)]
#[command(name = "load-engine")]
#[command(version)]
#[command(about = "Training load and readiness risk engine", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Per-muscle acute/chronic loads and zones for one athlete
  Muscles {
    athlete_id: String,

    /// Acute window in days (chronic defaults to 4x this)
    #[arg(long)]
    window_days: Option<u32>,

    /// Override the chronic window in days
    #[arg(long, requires = "window_days")]
    chronic_days: Option<u32>,

    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    as_of: Option<String>,

    /// Diagram region ids to reconcile, comma separated
    #[arg(long, value_delimiter = ',')]
    regions: Vec<String>,
  },

  /// Risk board rows for a set of athletes
  Board {
    #[arg(required = true)]
    athlete_ids: Vec<String>,

    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    as_of: Option<String>,
  },

  /// Run database migrations and exit
  Migrate,
}

fn resolve_as_of(raw: Option<&str>) -> EngineResult<DateTime<Utc>> {
  raw.map_or_else(|| Ok(Utc::now()), store::parse_timestamp)
}

fn resolve_window(
  base: &WindowConfig,
  window_days: Option<u32>,
  chronic_days: Option<u32>,
) -> EngineResult<WindowConfig> {
  let window = match (window_days, chronic_days) {
    (Some(acute), Some(chronic)) => WindowConfig::new(acute, chronic)?,
    (Some(acute), None) => WindowConfig::from_acute_days(acute)?,
    _ => *base,
  };
  Ok(window.with_ratio_mode(base.ratio_mode()))
}

async fn run(cli: Cli) -> EngineResult<()> {
  let config = EngineConfig::load()?;
  let pool = db::initialize_db(&config.database_url, config.max_connections).await?;
  let state = AppState { db: pool, config };

  match cli.command {
    Commands::Muscles {
      athlete_id,
      window_days,
      chronic_days,
      as_of,
      regions,
    } => {
      let window = resolve_window(&state.config.window, window_days, chronic_days)?;
      let as_of = resolve_as_of(as_of.as_deref())?;
      let report =
        commands::compute_muscle_loads(&state.db, &athlete_id, &window, as_of, &regions).await?;
      if !report.reconciliation.unmatched.is_empty() {
        tracing::warn!(
          unmatched = ?report.reconciliation.unmatched,
          "some diagram regions have no load data"
        );
      }
      print_json(&report);
    }
    Commands::Board { athlete_ids, as_of } => {
      let as_of = resolve_as_of(as_of.as_deref())?;
      let rows = commands::compute_risk_board(
        &state.db,
        &athlete_ids,
        &state.config.window,
        &state.config.weights,
        as_of,
      )
      .await?;
      print_json(&rows);
    }
    Commands::Migrate => {
      tracing::info!("migrations applied");
    }
  }

  state.db.close().await;
  Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
  match serde_json::to_string_pretty(value) {
    Ok(json) => println!("{}", json),
    Err(e) => tracing::error!("failed to serialize output: {}", e),
  }
}

#[tokio::main]
async fn main() {
  logging::init();
  let cli = Cli::parse();

  if let Err(e) = run(cli).await {
    tracing::error!("{}", e);
    std::process::exit(1);
  }
}
