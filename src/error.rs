//! Error types for the load engine
//!
//! Only boundary and configuration problems are errors. Insufficient history
//! and unmatched diagram identifiers are ordinary values (see `acwr::Acwr`,
//! `readiness::score` and `muscles::Reconciliation`).

use serde::{Deserialize, Serialize};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EngineError {
  #[error("Invalid window config: {0}")]
  InvalidWindow(String),

  #[error("Invalid readiness weights: {0}")]
  InvalidWeights(String),

  #[error("Negative load {value} for {entity}")]
  NegativeLoad { entity: String, value: f64 },

  #[error("Non-finite load for {0}")]
  NonFiniteLoad(String),

  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Database error: {0}")]
  Database(String),

  #[error("Invalid timestamp: {0}")]
  Timestamp(String),
}

impl From<sqlx::Error> for EngineError {
  fn from(e: sqlx::Error) -> Self {
    EngineError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    EngineError::Database(format!("migration failed: {}", e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_negative_load_message_names_entity() {
    let err = EngineError::NegativeLoad {
      entity: "a1/quadriceps".to_string(),
      value: -3.0,
    };
    assert_eq!(err.to_string(), "Negative load -3 for a1/quadriceps");
  }

  #[test]
  fn test_error_serializes_with_type_tag() {
    let err = EngineError::InvalidWindow("acute_days must be > 0".to_string());
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "InvalidWindow");
    assert_eq!(json["message"], "acute_days must be > 0");
  }
}
