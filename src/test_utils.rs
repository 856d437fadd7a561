//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - A fixed reference instant so window math is reproducible

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::engine::AthleteSnapshot;
use crate::models::LoadSample;
use crate::readiness::ReadinessInputs;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  crate::db::run_migrations(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed 27 days of history for one athlete: 50 whole-body and 20 quadriceps
/// load per day, on days 1 through 27 before `as_of()`
pub async fn seed_test_samples(pool: &SqlitePool, athlete_id: &str) -> Vec<i64> {
  let mut ids = Vec::new();

  for day in 1..=27 {
    for sample in [
      LoadSample::whole_body(athlete_id, days_before(day), 50.0),
      LoadSample::for_muscle(athlete_id, "quadriceps", days_before(day), 20.0),
    ] {
      let id = crate::store::insert_sample(pool, &sample)
        .await
        .expect("Failed to insert test sample");
      ids.push(id);
    }
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed reference instant for all window tests
pub fn as_of() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn days_before(days: i64) -> DateTime<Utc> {
  as_of() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Inputs whose oriented value is `level` for every component, so the
/// resulting score is `level`
pub fn mock_readiness_inputs(level: f64) -> ReadinessInputs {
  ReadinessInputs {
    hrv: Some(level),
    sleep_score: Some(level),
    prior_load: Some(100.0 - level),
    resting_hr: Some(100.0 - level),
    wellness_score: Some(level),
  }
}

/// Whole-body history: `acute_daily` on each of days 0-6, `chronic_daily` on
/// days 8-27. Day 7 is left empty so it does not matter which window the
/// boundary lands in.
pub fn mock_snapshot(athlete_id: &str, acute_daily: f64, chronic_daily: f64) -> AthleteSnapshot {
  let mut samples = Vec::new();
  for day in 0..=6 {
    samples.push(LoadSample::whole_body(athlete_id, days_before(day), acute_daily));
  }
  for day in 8..=27 {
    samples.push(LoadSample::whole_body(athlete_id, days_before(day), chronic_daily));
  }

  AthleteSnapshot {
    samples,
    ..AthleteSnapshot::empty(athlete_id)
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::readiness::{score, ReadinessWeights};

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('athletes', 'load_samples', 'readiness_inputs', 'daily_activity', 'muscle_load_cache')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 5, "Expected 5 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_samples_returns_correct_count() {
    let pool = setup_test_db().await;

    let ids = seed_test_samples(&pool, "a1").await;
    assert_eq!(ids.len(), 54);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM load_samples")
      .fetch_one(&pool)
      .await
      .expect("Failed to count samples");
    assert_eq!(count, 54);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_readiness_scores_at_level() {
    let result = score(&mock_readiness_inputs(72.0), &ReadinessWeights::default()).unwrap();
    assert_approx_eq!(result.value, 72.0, 1e-9);
  }

  #[test]
  fn test_mock_snapshot_shape() {
    let snapshot = mock_snapshot("a1", 100.0, 10.0);
    assert_eq!(snapshot.samples.len(), 27);
    assert_eq!(snapshot.name, "a1");
    assert!(snapshot.samples.iter().all(|s| s.muscle.is_none()));
  }
}
