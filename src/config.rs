//! Environment configuration
//!
//! Reads `LOAD_ENGINE_*` variables (after loading `.env` if present):
//! - `LOAD_ENGINE_DATABASE_URL` (required)
//! - `LOAD_ENGINE_ACUTE_DAYS` (default 7)
//! - `LOAD_ENGINE_CHRONIC_DAYS` (default 4 x acute)
//! - `LOAD_ENGINE_RATIO_MODE` (`sums` or `daily_average`, default `sums`)
//! - `LOAD_ENGINE_MAX_CONNECTIONS` (default 5)

use std::env;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::readiness::ReadinessWeights;
use crate::window::{RatioMode, WindowConfig, DEFAULT_ACUTE_DAYS};

pub const ENV_DATABASE_URL: &str = "LOAD_ENGINE_DATABASE_URL";
pub const ENV_ACUTE_DAYS: &str = "LOAD_ENGINE_ACUTE_DAYS";
pub const ENV_CHRONIC_DAYS: &str = "LOAD_ENGINE_CHRONIC_DAYS";
pub const ENV_RATIO_MODE: &str = "LOAD_ENGINE_RATIO_MODE";
pub const ENV_MAX_CONNECTIONS: &str = "LOAD_ENGINE_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct EngineConfig {
  pub database_url: String,
  pub window: WindowConfig,
  pub weights: ReadinessWeights,
  pub max_connections: u32,
}

impl EngineConfig {
  /// Load `.env` (if any) and read the process environment
  pub fn load() -> EngineResult<Self> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> EngineResult<Self> {
    let database_url = env::var(ENV_DATABASE_URL)
      .map_err(|_| EngineError::MissingConfig(ENV_DATABASE_URL.into()))?;

    let acute_days = parse_var(ENV_ACUTE_DAYS)?.unwrap_or(DEFAULT_ACUTE_DAYS);
    let window = match parse_var::<u32>(ENV_CHRONIC_DAYS)? {
      Some(chronic_days) => WindowConfig::new(acute_days, chronic_days)?,
      None => WindowConfig::from_acute_days(acute_days)?,
    };
    let ratio_mode = parse_var::<RatioMode>(ENV_RATIO_MODE)?.unwrap_or_default();

    let max_connections = parse_var(ENV_MAX_CONNECTIONS)?.unwrap_or(DEFAULT_MAX_CONNECTIONS);
    if max_connections == 0 {
      return Err(EngineError::InvalidConfig(format!(
        "{} must be at least 1",
        ENV_MAX_CONNECTIONS
      )));
    }

    Ok(Self {
      database_url,
      window: window.with_ratio_mode(ratio_mode),
      weights: ReadinessWeights::default(),
      max_connections,
    })
  }
}

/// `Ok(None)` when unset, `InvalidConfig` when set but unparseable
fn parse_var<T>(name: &str) -> EngineResult<Option<T>>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|e| EngineError::InvalidConfig(format!("{}={:?}: {}", name, raw, e))),
    Err(_) => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const DB: &str = "sqlite::memory:";

  #[test]
  #[serial]
  fn test_defaults_from_env() {
    temp_env::with_vars(
      [
        (ENV_DATABASE_URL, Some(DB)),
        (ENV_ACUTE_DAYS, None),
        (ENV_CHRONIC_DAYS, None),
        (ENV_RATIO_MODE, None),
        (ENV_MAX_CONNECTIONS, None),
      ],
      || {
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.database_url, DB);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.max_connections, 5);
      },
    );
  }

  #[test]
  #[serial]
  fn test_chronic_derived_from_acute() {
    temp_env::with_vars(
      [
        (ENV_DATABASE_URL, Some(DB)),
        (ENV_ACUTE_DAYS, Some("5")),
        (ENV_CHRONIC_DAYS, None),
        (ENV_RATIO_MODE, Some("daily_average")),
        (ENV_MAX_CONNECTIONS, None),
      ],
      || {
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.window.acute_days(), 5);
        assert_eq!(config.window.chronic_days(), 20);
        assert_eq!(config.window.ratio_mode(), RatioMode::DailyAverage);
      },
    );
  }

  #[test]
  #[serial]
  fn test_missing_database_url() {
    temp_env::with_var_unset(ENV_DATABASE_URL, || {
      assert_eq!(
        EngineConfig::from_env().unwrap_err(),
        EngineError::MissingConfig(ENV_DATABASE_URL.into())
      );
    });
  }

  #[test]
  #[serial]
  fn test_invalid_window_is_hard_failure() {
    temp_env::with_vars(
      [
        (ENV_DATABASE_URL, Some(DB)),
        (ENV_ACUTE_DAYS, Some("14")),
        (ENV_CHRONIC_DAYS, Some("7")),
        (ENV_RATIO_MODE, None),
        (ENV_MAX_CONNECTIONS, None),
      ],
      || {
        let err = EngineConfig::from_env().unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow(_)));
      },
    );
  }

  #[test]
  #[serial]
  fn test_unparseable_values() {
    temp_env::with_vars(
      [
        (ENV_DATABASE_URL, Some(DB)),
        (ENV_ACUTE_DAYS, Some("seven")),
        (ENV_CHRONIC_DAYS, None),
        (ENV_RATIO_MODE, None),
        (ENV_MAX_CONNECTIONS, None),
      ],
      || {
        let err = EngineConfig::from_env().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
      },
    );

    temp_env::with_vars(
      [
        (ENV_DATABASE_URL, Some(DB)),
        (ENV_ACUTE_DAYS, None),
        (ENV_CHRONIC_DAYS, None),
        (ENV_RATIO_MODE, None),
        (ENV_MAX_CONNECTIONS, Some("0")),
      ],
      || {
        let err = EngineConfig::from_env().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
      },
    );
  }
}
