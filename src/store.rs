//! SQLite adapter that feeds the engine
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with nanosecond
//! precision (`2025-06-15T12:00:00.000000000Z`) so string comparison in SQL
//! is chronological and nothing after `as_of` can round into a window.
//! Days are stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::acwr::Acwr;
use crate::engine::MuscleLoadResult;
use crate::error::{EngineError, EngineResult};
use crate::models::{Athlete, LoadSample};
use crate::readiness::ReadinessInputs;
use crate::window::{self, WindowConfig};

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(raw: &str) -> EngineResult<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| EngineError::Timestamp(format!("{}: {}", raw, e)))
}

fn format_day(day: NaiveDate) -> String {
  day.format("%Y-%m-%d").to_string()
}

/// ---------------------------------------------------------------------------
/// Athletes
/// ---------------------------------------------------------------------------

pub async fn upsert_athlete(pool: &SqlitePool, athlete: &Athlete) -> EngineResult<()> {
  sqlx::query(
    r#"
    INSERT INTO athletes (id, name) VALUES (?1, ?2)
    ON CONFLICT(id) DO UPDATE SET name = excluded.name
    "#,
  )
  .bind(&athlete.id)
  .bind(&athlete.name)
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn load_athlete(pool: &SqlitePool, athlete_id: &str) -> EngineResult<Option<Athlete>> {
  let athlete = sqlx::query_as::<_, Athlete>("SELECT id, name FROM athletes WHERE id = ?1")
    .bind(athlete_id)
    .fetch_optional(pool)
    .await?;

  Ok(athlete)
}

/// ---------------------------------------------------------------------------
/// Load Samples
/// ---------------------------------------------------------------------------

/// Append one sample. Negative or non-finite loads are rejected before the
/// write so bad upstream data never reaches the table.
pub async fn insert_sample(pool: &SqlitePool, sample: &LoadSample) -> EngineResult<i64> {
  window::validate_samples(std::slice::from_ref(sample))?;

  let result = sqlx::query(
    r#"
    INSERT INTO load_samples (athlete_id, muscle, recorded_at, load)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )
  .bind(&sample.athlete_id)
  .bind(&sample.muscle)
  .bind(format_timestamp(sample.recorded_at))
  .bind(sample.load)
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}

/// Samples recorded in `[since, as_of]`, oldest first. Anything recorded
/// after `as_of` is left out so historical queries are reproducible.
pub async fn load_samples(
  pool: &SqlitePool,
  athlete_id: &str,
  since: DateTime<Utc>,
  as_of: DateTime<Utc>,
) -> EngineResult<Vec<LoadSample>> {
  let rows: Vec<(String, Option<String>, String, f64)> = sqlx::query_as(
    r#"
    SELECT athlete_id, muscle, recorded_at, load
    FROM load_samples
    WHERE athlete_id = ?1 AND recorded_at >= ?2 AND recorded_at <= ?3
    ORDER BY recorded_at, id
    "#,
  )
  .bind(athlete_id)
  .bind(format_timestamp(since))
  .bind(format_timestamp(as_of))
  .fetch_all(pool)
  .await?;

  rows
    .into_iter()
    .map(|(athlete_id, muscle, recorded_at, load)| {
      Ok(LoadSample {
        athlete_id,
        muscle,
        recorded_at: parse_timestamp(&recorded_at)?,
        load,
      })
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Readiness and Activity
/// ---------------------------------------------------------------------------

pub async fn upsert_readiness_inputs(
  pool: &SqlitePool,
  athlete_id: &str,
  day: NaiveDate,
  inputs: &ReadinessInputs,
) -> EngineResult<()> {
  sqlx::query(
    r#"
    INSERT INTO readiness_inputs (
      athlete_id, day, hrv, sleep_score, prior_load, resting_hr, wellness_score
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(athlete_id, day) DO UPDATE SET
      hrv = excluded.hrv,
      sleep_score = excluded.sleep_score,
      prior_load = excluded.prior_load,
      resting_hr = excluded.resting_hr,
      wellness_score = excluded.wellness_score
    "#,
  )
  .bind(athlete_id)
  .bind(format_day(day))
  .bind(inputs.hrv)
  .bind(inputs.sleep_score)
  .bind(inputs.prior_load)
  .bind(inputs.resting_hr)
  .bind(inputs.wellness_score)
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn load_readiness_inputs(
  pool: &SqlitePool,
  athlete_id: &str,
  day: NaiveDate,
) -> EngineResult<Option<ReadinessInputs>> {
  let row: Option<(Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>)> =
    sqlx::query_as(
      r#"
      SELECT hrv, sleep_score, prior_load, resting_hr, wellness_score
      FROM readiness_inputs
      WHERE athlete_id = ?1 AND day = ?2
      "#,
    )
    .bind(athlete_id)
    .bind(format_day(day))
    .fetch_optional(pool)
    .await?;

  Ok(row.map(|(hrv, sleep_score, prior_load, resting_hr, wellness_score)| ReadinessInputs {
    hrv,
    sleep_score,
    prior_load,
    resting_hr,
    wellness_score,
  }))
}

pub async fn upsert_activity_metric(
  pool: &SqlitePool,
  athlete_id: &str,
  day: NaiveDate,
  metric: f64,
) -> EngineResult<()> {
  sqlx::query(
    r#"
    INSERT INTO daily_activity (athlete_id, day, metric) VALUES (?1, ?2, ?3)
    ON CONFLICT(athlete_id, day) DO UPDATE SET metric = excluded.metric
    "#,
  )
  .bind(athlete_id)
  .bind(format_day(day))
  .bind(metric)
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn load_activity_metric(
  pool: &SqlitePool,
  athlete_id: &str,
  day: NaiveDate,
) -> EngineResult<Option<f64>> {
  let metric: Option<f64> =
    sqlx::query_scalar("SELECT metric FROM daily_activity WHERE athlete_id = ?1 AND day = ?2")
      .bind(athlete_id)
      .bind(format_day(day))
      .fetch_optional(pool)
      .await?;

  Ok(metric)
}

/// ---------------------------------------------------------------------------
/// Result Cache
/// ---------------------------------------------------------------------------

/// Replace cached rows for this athlete/as_of/window with `results`
pub async fn cache_muscle_loads(
  pool: &SqlitePool,
  athlete_id: &str,
  as_of: DateTime<Utc>,
  config: &WindowConfig,
  results: &[MuscleLoadResult],
) -> EngineResult<()> {
  let as_of_str = format_timestamp(as_of);
  let computed_at = format_timestamp(Utc::now());
  let mut tx = pool.begin().await?;

  sqlx::query(
    r#"
    DELETE FROM muscle_load_cache
    WHERE athlete_id = ?1 AND as_of = ?2
      AND acute_days = ?3 AND chronic_days = ?4 AND ratio_mode = ?5
    "#,
  )
  .bind(athlete_id)
  .bind(&as_of_str)
  .bind(config.acute_days())
  .bind(config.chronic_days())
  .bind(config.ratio_mode().as_str())
  .execute(&mut *tx)
  .await?;

  for r in results {
    sqlx::query(
      r#"
      INSERT INTO muscle_load_cache (
        athlete_id, muscle_key, as_of, acute_days, chronic_days, ratio_mode,
        acute, chronic, acwr, computed_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
      "#,
    )
    .bind(athlete_id)
    .bind(&r.muscle_key)
    .bind(&as_of_str)
    .bind(config.acute_days())
    .bind(config.chronic_days())
    .bind(config.ratio_mode().as_str())
    .bind(r.acute)
    .bind(r.chronic)
    .bind(r.acwr.ratio())
    .bind(&computed_at)
    .execute(&mut *tx)
    .await?;
  }

  tx.commit().await?;

  tracing::info!(athlete_id, rows = results.len(), as_of = %as_of_str, "cached muscle loads");
  Ok(())
}

/// Cached results, ordered by muscle key. Zone and colors are derived from
/// the stored ratio; only the numbers are persisted.
pub async fn load_cached_muscle_loads(
  pool: &SqlitePool,
  athlete_id: &str,
  as_of: DateTime<Utc>,
  config: &WindowConfig,
) -> EngineResult<Vec<MuscleLoadResult>> {
  let rows: Vec<(String, f64, f64, Option<f64>)> = sqlx::query_as(
    r#"
    SELECT muscle_key, acute, chronic, acwr
    FROM muscle_load_cache
    WHERE athlete_id = ?1 AND as_of = ?2
      AND acute_days = ?3 AND chronic_days = ?4 AND ratio_mode = ?5
    ORDER BY muscle_key
    "#,
  )
  .bind(athlete_id)
  .bind(format_timestamp(as_of))
  .bind(config.acute_days())
  .bind(config.chronic_days())
  .bind(config.ratio_mode().as_str())
  .fetch_all(pool)
  .await?;

  Ok(
    rows
      .into_iter()
      .map(|(key, acute, chronic, acwr)| {
        let acwr = acwr.map_or(Acwr::Undefined, Acwr::Ratio);
        MuscleLoadResult::new(&key, acute, chronic, acwr)
      })
      .collect(),
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
