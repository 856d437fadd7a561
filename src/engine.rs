//! Load engine entry points
//!
//! Pure functions over caller-supplied samples and inputs: window sums ->
//! ACWR -> zone for each muscle, and readiness + whole-body ACWR -> flag for
//! each athlete. No shared state, so independent athletes can be computed on
//! any number of threads. Identical inputs always give identical output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acwr::Acwr;
use crate::error::EngineResult;
use crate::models::LoadSample;
use crate::readiness::{self, ReadinessInputs, ReadinessScore, ReadinessWeights};
use crate::risk::{self, RiskBoardRow};
use crate::window::{self, WindowConfig, WindowSums};
use crate::zones::{AlertIntensity, LoadZone, ZoneDisplay};

/// ---------------------------------------------------------------------------
/// Per-Muscle Loads
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleLoadResult {
  pub muscle_key: String,
  pub acute: f64,
  pub chronic: f64,
  pub acwr: Acwr,
  /// None when the ACWR is undefined
  pub zone: Option<LoadZone>,
  pub intensity: AlertIntensity,
  pub base_color: String,
  /// Zone color, or the alert color for medium/high intensity
  pub color: String,
}

impl MuscleLoadResult {
  /// Raw-sum ratio, as with the default window config
  pub fn from_sums(muscle_key: &str, acute: f64, chronic: f64) -> Self {
    Self::new(muscle_key, acute, chronic, Acwr::compute(acute, chronic))
  }

  pub fn new(muscle_key: &str, acute: f64, chronic: f64, acwr: Acwr) -> Self {
    let display = ZoneDisplay::classify(acwr);
    Self {
      muscle_key: muscle_key.to_string(),
      acute,
      chronic,
      acwr,
      zone: display.zone,
      intensity: display.intensity,
      base_color: display.base_color.to_string(),
      color: display.display_color.to_string(),
    }
  }
}

/// Results for one athlete, one per muscle seen in the supplied samples,
/// ordered by canonical muscle key. Samples for other athletes are ignored.
pub fn compute_muscle_loads(
  athlete_id: &str,
  samples: &[LoadSample],
  config: &WindowConfig,
  as_of: DateTime<Utc>,
) -> EngineResult<Vec<MuscleLoadResult>> {
  let own: Vec<LoadSample> = samples
    .iter()
    .filter(|s| s.athlete_id == athlete_id)
    .cloned()
    .collect();
  window::validate_samples(&own)?;

  let results: Vec<MuscleLoadResult> = window::aggregate_by_muscle(&own, as_of, config)
    .into_iter()
    .map(|(key, sums)| MuscleLoadResult::new(&key, sums.acute, sums.chronic, sums.acwr(config)))
    .collect();

  tracing::debug!(
    athlete_id,
    muscles = results.len(),
    acute_days = config.acute_days(),
    chronic_days = config.chronic_days(),
    "computed muscle loads"
  );

  Ok(results)
}

/// ---------------------------------------------------------------------------
/// Risk Board
/// ---------------------------------------------------------------------------

/// Everything known about one athlete for a board computation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteSnapshot {
  pub athlete_id: String,
  pub name: String,
  /// Whole-body samples are the ones without a muscle
  pub samples: Vec<LoadSample>,
  pub readiness: Option<ReadinessInputs>,
  pub activity_metric: Option<f64>,
}

impl AthleteSnapshot {
  /// An athlete the store knows nothing about
  pub fn empty(athlete_id: &str) -> Self {
    Self {
      athlete_id: athlete_id.to_string(),
      name: athlete_id.to_string(),
      ..Self::default()
    }
  }
}

pub fn whole_body_acwr(
  athlete_id: &str,
  samples: &[LoadSample],
  config: &WindowConfig,
  as_of: DateTime<Utc>,
) -> EngineResult<(WindowSums, Acwr)> {
  let own: Vec<LoadSample> = samples
    .iter()
    .filter(|s| s.athlete_id == athlete_id)
    .cloned()
    .collect();
  // Muscle-tagged samples do not count toward whole-body load but are still
  // held to the same load rules
  window::validate_samples(&own)?;

  let sums = window::aggregate_whole_body(&own, as_of, config);
  Ok((sums, sums.acwr(config)))
}

pub fn readiness_for(
  inputs: Option<&ReadinessInputs>,
  weights: &ReadinessWeights,
) -> Option<ReadinessScore> {
  inputs.and_then(|i| readiness::score(i, weights))
}

pub fn risk_row(
  snapshot: &AthleteSnapshot,
  config: &WindowConfig,
  weights: &ReadinessWeights,
  as_of: DateTime<Utc>,
) -> EngineResult<RiskBoardRow> {
  let (_, acwr) = whole_body_acwr(&snapshot.athlete_id, &snapshot.samples, config, as_of)?;
  let zone = ZoneDisplay::classify(acwr).zone;
  let readiness = readiness_for(snapshot.readiness.as_ref(), weights).map(|s| s.value);

  Ok(RiskBoardRow {
    athlete_id: snapshot.athlete_id.clone(),
    name: snapshot.name.clone(),
    readiness,
    acwr,
    yesterday_activity_metric: snapshot.activity_metric,
    flag: risk::combine(readiness, zone),
    acwr_badge: zone.map(risk::zone_badge),
    readiness_badge: risk::readiness_badge(readiness),
  })
}

/// One row per snapshot, in board order
pub fn compute_risk_board(
  snapshots: &[AthleteSnapshot],
  config: &WindowConfig,
  weights: &ReadinessWeights,
  as_of: DateTime<Utc>,
) -> EngineResult<Vec<RiskBoardRow>> {
  weights.validate()?;

  let mut rows = snapshots
    .iter()
    .map(|s| risk_row(s, config, weights, as_of))
    .collect::<EngineResult<Vec<_>>>()?;
  risk::sort_board(&mut rows);

  tracing::debug!(athletes = rows.len(), "computed risk board");
  Ok(rows)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
