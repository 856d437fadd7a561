//! Composite readiness score
//!
//! Five daily inputs, each already normalized by the caller to 0-100, are
//! combined with fixed weights. Prior load and resting HR are inverted (a
//! high value lowers readiness). Unknown inputs are not imputed: their weight
//! is redistributed proportionally across the known inputs. With no known
//! inputs the score itself is unknown (`None`).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const READY_THRESHOLD: f64 = 80.0;
pub const CAUTION_THRESHOLD: f64 = 60.0;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// ---------------------------------------------------------------------------
/// Inputs and Weights
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessInput {
  Hrv,
  Sleep,
  PriorLoad,
  RestingHr,
  Wellness,
}

impl ReadinessInput {
  pub const ALL: [ReadinessInput; 5] = [
    ReadinessInput::Hrv,
    ReadinessInput::Sleep,
    ReadinessInput::PriorLoad,
    ReadinessInput::RestingHr,
    ReadinessInput::Wellness,
  ];

  /// Higher raw value means lower readiness
  pub fn is_inverted(&self) -> bool {
    matches!(self, ReadinessInput::PriorLoad | ReadinessInput::RestingHr)
  }
}

/// One athlete-day of inputs, each on a 0-100 scale or unknown
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadinessInputs {
  pub hrv: Option<f64>,
  pub sleep_score: Option<f64>,
  pub prior_load: Option<f64>,
  pub resting_hr: Option<f64>,
  pub wellness_score: Option<f64>,
}

impl ReadinessInputs {
  pub fn get(&self, input: ReadinessInput) -> Option<f64> {
    let value = match input {
      ReadinessInput::Hrv => self.hrv,
      ReadinessInput::Sleep => self.sleep_score,
      ReadinessInput::PriorLoad => self.prior_load,
      ReadinessInput::RestingHr => self.resting_hr,
      ReadinessInput::Wellness => self.wellness_score,
    };
    // NaN counts as unknown rather than poisoning the sum
    value.filter(|v| v.is_finite())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessWeights {
  hrv: f64,
  sleep: f64,
  prior_load: f64,
  resting_hr: f64,
  wellness: f64,
}

impl Default for ReadinessWeights {
  fn default() -> Self {
    Self {
      hrv: 0.30,
      sleep: 0.20,
      prior_load: 0.20,
      resting_hr: 0.15,
      wellness: 0.15,
    }
  }
}

impl ReadinessWeights {
  /// Weights must be finite, non-negative and sum to 1.0
  pub fn new(
    hrv: f64,
    sleep: f64,
    prior_load: f64,
    resting_hr: f64,
    wellness: f64,
  ) -> EngineResult<Self> {
    let weights = Self {
      hrv,
      sleep,
      prior_load,
      resting_hr,
      wellness,
    };
    weights.validate()?;
    Ok(weights)
  }

  pub fn validate(&self) -> EngineResult<()> {
    let all = ReadinessInput::ALL.map(|i| self.get(i));
    if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
      return Err(EngineError::InvalidWeights(
        "weights must be finite and non-negative".into(),
      ));
    }
    let total: f64 = all.iter().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
      return Err(EngineError::InvalidWeights(format!(
        "weights sum to {}, expected 1.0",
        total
      )));
    }
    Ok(())
  }

  pub fn get(&self, input: ReadinessInput) -> f64 {
    match input {
      ReadinessInput::Hrv => self.hrv,
      ReadinessInput::Sleep => self.sleep,
      ReadinessInput::PriorLoad => self.prior_load,
      ReadinessInput::RestingHr => self.resting_hr,
      ReadinessInput::Wellness => self.wellness,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Score
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessComponent {
  pub input: ReadinessInput,
  /// Value as supplied, clamped to 0-100
  pub raw: f64,
  /// Value with inverted inputs flipped so that higher is always better
  pub oriented: f64,
  /// Weight after redistribution over the known inputs
  pub weight: f64,
  pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
  pub value: f64,
  pub components: Vec<ReadinessComponent>,
}

/// Score one athlete-day. Returns `None` when every input is unknown.
pub fn score(inputs: &ReadinessInputs, weights: &ReadinessWeights) -> Option<ReadinessScore> {
  let known: Vec<(ReadinessInput, f64)> = ReadinessInput::ALL
    .iter()
    .filter_map(|&i| inputs.get(i).map(|v| (i, v.clamp(0.0, 100.0))))
    .collect();

  let known_weight: f64 = known.iter().map(|(i, _)| weights.get(*i)).sum();
  if known.is_empty() || known_weight <= 0.0 {
    return None;
  }

  let components: Vec<ReadinessComponent> = known
    .into_iter()
    .map(|(input, raw)| {
      let oriented = if input.is_inverted() { 100.0 - raw } else { raw };
      let weight = weights.get(input) / known_weight;
      ReadinessComponent {
        input,
        raw,
        oriented,
        weight,
        contribution: oriented * weight,
      }
    })
    .collect();

  let value = components
    .iter()
    .map(|c| c.contribution)
    .sum::<f64>()
    .clamp(0.0, 100.0);

  Some(ReadinessScore { value, components })
}
