//! Per-muscle load handler backing the anatomical heatmap

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::engine::{self, MuscleLoadResult};
use crate::error::EngineResult;
use crate::muscles::{self, Reconciliation};
use crate::store;
use crate::window::WindowConfig;

#[derive(Debug, Clone, Serialize)]
pub struct MuscleLoadReport {
  pub athlete_id: String,
  pub as_of: DateTime<Utc>,
  pub window: WindowConfig,
  pub results: Vec<MuscleLoadResult>,
  pub reconciliation: Reconciliation,
}

/// Load the athlete's samples for the chronic window ending at `as_of`,
/// compute per-muscle zones, refresh the cache and match the results against
/// the diagram's region ids.
pub async fn compute_muscle_loads(
  pool: &SqlitePool,
  athlete_id: &str,
  window: &WindowConfig,
  as_of: DateTime<Utc>,
  regions: &[String],
) -> EngineResult<MuscleLoadReport> {
  let samples = store::load_samples(pool, athlete_id, window.chronic_start(as_of), as_of).await?;
  let results = engine::compute_muscle_loads(athlete_id, &samples, window, as_of)?;

  store::cache_muscle_loads(pool, athlete_id, as_of, window, &results).await?;

  let reconciliation = muscles::reconcile(&results, regions);

  Ok(MuscleLoadReport {
    athlete_id: athlete_id.to_string(),
    as_of,
    window: *window,
    results,
    reconciliation,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::acwr::Acwr;
  use crate::models::LoadSample;
  use crate::test_utils::{as_of, days_before, setup_test_db, teardown_test_db};
  use crate::zones::LoadZone;

  #[tokio::test]
  async fn test_report_matches_diagram_regions() {
    let pool = setup_test_db().await;
    for sample in [
      LoadSample::for_muscle("a1", "rectus_femoris", days_before(2), 900.0),
      LoadSample::for_muscle("a1", "rectus_femoris", days_before(15), 300.0),
      LoadSample::for_muscle("a1", "biceps", days_before(3), 40.0),
    ] {
      store::insert_sample(&pool, &sample).await.unwrap();
    }

    let regions = vec!["Rectus-Femoris".to_string(), "Deltoid".to_string()];
    let report = compute_muscle_loads(&pool, "a1", &WindowConfig::default(), as_of(), &regions)
      .await
      .unwrap();

    assert_eq!(report.results.len(), 2);
    let rf = report.reconciliation.lookup("Rectus-Femoris").unwrap();
    assert_eq!(rf.acwr, Acwr::Ratio(0.75));
    assert_eq!(rf.zone, Some(LoadZone::Low));
    assert_eq!(report.reconciliation.unmatched, vec!["Deltoid".to_string()]);
    assert_eq!(report.reconciliation.unrendered, vec!["biceps".to_string()]);

    let cached = store::load_cached_muscle_loads(&pool, "a1", as_of(), &WindowConfig::default())
      .await
      .unwrap();
    assert_eq!(cached, report.results);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_later_samples_do_not_change_history() {
    let pool = setup_test_db().await;
    store::insert_sample(&pool, &LoadSample::for_muscle("a1", "calf", days_before(1), 50.0))
      .await
      .unwrap();

    let window = WindowConfig::default();
    let before = compute_muscle_loads(&pool, "a1", &window, as_of(), &[]).await.unwrap();

    store::insert_sample(
      &pool,
      &LoadSample::for_muscle("a1", "calf", as_of() + chrono::Duration::days(1), 500.0),
    )
    .await
    .unwrap();
    let after = compute_muscle_loads(&pool, "a1", &window, as_of(), &[]).await.unwrap();

    assert_eq!(before.results, after.results);
    assert_eq!(
      serde_json::to_string(&before.results).unwrap(),
      serde_json::to_string(&after.results).unwrap()
    );

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sample_just_after_as_of_is_excluded() {
    let pool = setup_test_db().await;
    let as_of = as_of() + chrono::Duration::milliseconds(200);
    store::insert_sample(
      &pool,
      &LoadSample::for_muscle("a1", "calf", as_of + chrono::Duration::milliseconds(500), 50.0),
    )
    .await
    .unwrap();

    let window = WindowConfig::default();
    let report = compute_muscle_loads(&pool, "a1", &window, as_of, &[]).await.unwrap();
    assert!(report.results.is_empty());

    let later = as_of + chrono::Duration::milliseconds(600);
    let report = compute_muscle_loads(&pool, "a1", &window, later, &[]).await.unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].acute, 50.0);

    // Two instants in the same second keep separate cache rows
    let cached = store::load_cached_muscle_loads(&pool, "a1", as_of, &window).await.unwrap();
    assert!(cached.is_empty());

    teardown_test_db(pool).await;
  }
}
