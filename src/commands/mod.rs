//! Request/response handlers for the dashboard collaborators.
//!
//! Each handler reads what it needs from the store, calls the pure engine
//! and returns serializable results. Rendering and transport live elsewhere.

pub mod board;
pub mod muscles;

pub use board::compute_risk_board;
pub use muscles::{compute_muscle_loads, MuscleLoadReport};
