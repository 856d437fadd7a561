//! Training load and readiness risk engine.
//!
//! Turns raw load samples and daily physiological inputs into per-muscle
//! ACWR zones for the anatomical heatmap and red/amber/green rows for the
//! athlete risk board. The engine modules are pure; `store`, `db` and
//! `commands` connect them to SQLite.

pub mod acwr;
pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod muscles;
pub mod readiness;
pub mod risk;
pub mod store;
pub mod window;
pub mod zones;

#[cfg(test)]
mod test_utils;

pub use acwr::Acwr;
pub use engine::{compute_muscle_loads, compute_risk_board, AthleteSnapshot, MuscleLoadResult};
pub use error::{EngineError, EngineResult};
pub use models::LoadSample;
pub use readiness::{ReadinessInputs, ReadinessScore, ReadinessWeights};
pub use risk::{RiskBoardRow, RiskFlag};
pub use window::{RatioMode, WindowConfig};
pub use zones::{AlertIntensity, LoadZone, ZoneDisplay};
