//! Risk board handler

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::engine::{self, AthleteSnapshot};
use crate::error::EngineResult;
use crate::readiness::ReadinessWeights;
use crate::risk::RiskBoardRow;
use crate::store;
use crate::window::WindowConfig;

/// Gather what storage knows about one athlete as of `as_of`. Athletes with
/// no stored data come back as an empty snapshot named by their id.
pub async fn load_snapshot(
  pool: &SqlitePool,
  athlete_id: &str,
  window: &WindowConfig,
  as_of: DateTime<Utc>,
) -> EngineResult<AthleteSnapshot> {
  let name = store::load_athlete(pool, athlete_id)
    .await?
    .map(|a| a.name)
    .unwrap_or_else(|| athlete_id.to_string());

  let samples = store::load_samples(pool, athlete_id, window.chronic_start(as_of), as_of)
    .await?
    .into_iter()
    .filter(|s| s.muscle.is_none())
    .collect();

  let today = as_of.date_naive();
  let yesterday = (as_of - Duration::days(1)).date_naive();

  Ok(AthleteSnapshot {
    athlete_id: athlete_id.to_string(),
    name,
    samples,
    readiness: store::load_readiness_inputs(pool, athlete_id, today).await?,
    activity_metric: store::load_activity_metric(pool, athlete_id, yesterday).await?,
  })
}

/// One row per requested athlete, in board order
pub async fn compute_risk_board(
  pool: &SqlitePool,
  athlete_ids: &[String],
  window: &WindowConfig,
  weights: &ReadinessWeights,
  as_of: DateTime<Utc>,
) -> EngineResult<Vec<RiskBoardRow>> {
  weights.validate()?;

  let mut snapshots = Vec::with_capacity(athlete_ids.len());
  for athlete_id in athlete_ids {
    snapshots.push(load_snapshot(pool, athlete_id, window, as_of).await?);
  }

  engine::compute_risk_board(&snapshots, window, weights, as_of)
}
