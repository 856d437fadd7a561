//! Rolling acute/chronic window sums
//!
//! A window of N days covers `[as_of - N days, as_of]`, inclusive at both
//! ends. Samples recorded after `as_of` are ignored so results stay
//! reproducible when newer samples arrive.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::acwr::Acwr;
use crate::error::{EngineError, EngineResult};
use crate::models::LoadSample;
use crate::muscles::canonical_key;

pub const DEFAULT_ACUTE_DAYS: u32 = 7;
pub const DEFAULT_CHRONIC_DAYS: u32 = 28;

/// Ratio between chronic and acute windows in the product configuration
pub const CHRONIC_MULTIPLIER: u32 = 4;

/// ---------------------------------------------------------------------------
/// Window Config
/// ---------------------------------------------------------------------------

/// How the two window sums are turned into a ratio.
///
/// `Sums` divides the raw sums (the dashboard contract; since the acute
/// window sits inside the chronic one the ratio never exceeds 1.0).
/// `DailyAverage` divides per-day averages, which is what makes spikes above
/// 1.3 reachable from aggregated samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioMode {
  #[default]
  Sums,
  DailyAverage,
}

impl RatioMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      RatioMode::Sums => "sums",
      RatioMode::DailyAverage => "daily_average",
    }
  }
}

impl std::str::FromStr for RatioMode {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "sums" => Ok(Self::Sums),
      "daily_average" => Ok(Self::DailyAverage),
      _ => Err(format!("Unknown ratio mode: {}", s)),
    }
  }
}

/// Only constructible through the validating constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowConfig {
  acute_days: u32,
  chronic_days: u32,
  ratio_mode: RatioMode,
}

impl Default for WindowConfig {
  fn default() -> Self {
    Self {
      acute_days: DEFAULT_ACUTE_DAYS,
      chronic_days: DEFAULT_CHRONIC_DAYS,
      ratio_mode: RatioMode::Sums,
    }
  }
}

impl WindowConfig {
  /// Validated constructor: both windows > 0 and acute < chronic
  pub fn new(acute_days: u32, chronic_days: u32) -> EngineResult<Self> {
    if acute_days == 0 {
      return Err(EngineError::InvalidWindow("acute_days must be > 0".into()));
    }
    if chronic_days == 0 {
      return Err(EngineError::InvalidWindow("chronic_days must be > 0".into()));
    }
    if acute_days >= chronic_days {
      return Err(EngineError::InvalidWindow(format!(
        "acute_days ({}) must be less than chronic_days ({})",
        acute_days, chronic_days
      )));
    }
    Ok(Self {
      acute_days,
      chronic_days,
      ratio_mode: RatioMode::Sums,
    })
  }

  pub fn with_ratio_mode(mut self, ratio_mode: RatioMode) -> Self {
    self.ratio_mode = ratio_mode;
    self
  }

  pub fn ratio_mode(&self) -> RatioMode {
    self.ratio_mode
  }

  /// Derive chronic = 4 x acute, as the dashboards do
  pub fn from_acute_days(acute_days: u32) -> EngineResult<Self> {
    let chronic_days = acute_days.checked_mul(CHRONIC_MULTIPLIER).ok_or_else(|| {
      EngineError::InvalidWindow(format!("acute_days ({}) is too large", acute_days))
    })?;
    Self::new(acute_days, chronic_days)
  }

  pub fn acute_days(&self) -> u32 {
    self.acute_days
  }

  pub fn chronic_days(&self) -> u32 {
    self.chronic_days
  }

  pub fn acute_start(&self, as_of: DateTime<Utc>) -> DateTime<Utc> {
    as_of - Duration::days(i64::from(self.acute_days))
  }

  pub fn chronic_start(&self, as_of: DateTime<Utc>) -> DateTime<Utc> {
    as_of - Duration::days(i64::from(self.chronic_days))
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSums {
  pub acute: f64,
  pub chronic: f64,
}

impl WindowSums {
  pub fn acwr(&self, config: &WindowConfig) -> Acwr {
    match config.ratio_mode {
      RatioMode::Sums => Acwr::compute(self.acute, self.chronic),
      RatioMode::DailyAverage => Acwr::compute(
        self.acute / f64::from(config.acute_days),
        self.chronic / f64::from(config.chronic_days),
      ),
    }
  }
}

/// Reject negative or non-finite loads before any arithmetic happens
pub fn validate_samples(samples: &[LoadSample]) -> EngineResult<()> {
  for s in samples {
    if !s.load.is_finite() {
      return Err(EngineError::NonFiniteLoad(s.entity()));
    }
    if s.load < 0.0 {
      return Err(EngineError::NegativeLoad {
        entity: s.entity(),
        value: s.load,
      });
    }
  }
  Ok(())
}

/// Acute and chronic sums for one entity's samples. Order does not matter
/// and duplicate timestamps are summed.
pub fn aggregate<'a, I>(samples: I, as_of: DateTime<Utc>, config: &WindowConfig) -> WindowSums
where
  I: IntoIterator<Item = &'a LoadSample>,
{
  let acute_start = config.acute_start(as_of);
  let chronic_start = config.chronic_start(as_of);
  let mut sums = WindowSums::default();

  for s in samples {
    if s.recorded_at > as_of || s.recorded_at < chronic_start {
      continue;
    }
    sums.chronic += s.load;
    if s.recorded_at >= acute_start {
      sums.acute += s.load;
    }
  }

  sums
}

/// Whole-body sums: only samples without a muscle
pub fn aggregate_whole_body(
  samples: &[LoadSample],
  as_of: DateTime<Utc>,
  config: &WindowConfig,
) -> WindowSums {
  aggregate(samples.iter().filter(|s| s.muscle.is_none()), as_of, config)
}

/// Per-muscle sums keyed by canonical muscle key, in key order.
///
/// Muscles whose samples all fall outside the chronic window still appear
/// with zero sums so callers see them as "insufficient history".
pub fn aggregate_by_muscle(
  samples: &[LoadSample],
  as_of: DateTime<Utc>,
  config: &WindowConfig,
) -> BTreeMap<String, WindowSums> {
  let mut grouped: BTreeMap<String, Vec<&LoadSample>> = BTreeMap::new();
  for s in samples {
    if let Some(muscle) = &s.muscle {
      grouped.entry(canonical_key(muscle)).or_default().push(s);
    }
  }

  grouped
    .into_iter()
    .map(|(key, group)| (key, aggregate(group, as_of, config)))
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
