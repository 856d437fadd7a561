//! Acute:chronic workload ratio

use serde::{Deserialize, Serialize};

/// ACWR, or `Undefined` when there is no chronic load to compare against.
///
/// `Undefined` means insufficient history. It is never a risk signal in
/// either direction and must not be coerced to 0 or 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Acwr {
  Ratio(f64),
  Undefined,
}

impl Acwr {
  /// Not clamped; out-of-range ratios are the zone classifier's concern.
  /// A ratio that is not finite (sums overflowed to infinity) is logged and
  /// reported as `Undefined`.
  pub fn compute(acute: f64, chronic: f64) -> Self {
    if chronic == 0.0 {
      return Acwr::Undefined;
    }
    let ratio = acute / chronic;
    if ratio.is_finite() {
      Acwr::Ratio(ratio)
    } else {
      tracing::warn!(acute, chronic, "non-finite ACWR, reporting as undefined");
      Acwr::Undefined
    }
  }

  pub fn ratio(&self) -> Option<f64> {
    match self {
      Acwr::Ratio(r) => Some(*r),
      Acwr::Undefined => None,
    }
  }

  pub fn is_defined(&self) -> bool {
    matches!(self, Acwr::Ratio(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_zero_chronic_is_undefined() {
    assert_eq!(Acwr::compute(0.0, 0.0), Acwr::Undefined);
    assert_eq!(Acwr::compute(250.0, 0.0), Acwr::Undefined);
    assert_eq!(Acwr::compute(250.0, 0.0).ratio(), None);
  }

  #[test]
  fn test_non_finite_ratio_is_undefined() {
    assert_eq!(Acwr::compute(f64::INFINITY, f64::INFINITY), Acwr::Undefined);
    assert_eq!(Acwr::compute(f64::INFINITY, 10.0), Acwr::Undefined);
    assert_eq!(Acwr::compute(f64::NAN, 10.0), Acwr::Undefined);
    assert_eq!(Acwr::compute(1e308, 1e-10), Acwr::Undefined);
  }

  #[test]
  fn test_ratio_is_not_clamped() {
    assert_eq!(Acwr::compute(900.0, 1200.0), Acwr::Ratio(0.75));
    assert_eq!(Acwr::compute(0.0, 1200.0), Acwr::Ratio(0.0));
    assert_eq!(Acwr::compute(600.0, 200.0).ratio(), Some(3.0));
  }

  #[test]
  fn test_serialized_shape() {
    let defined = serde_json::to_value(Acwr::Ratio(1.25)).unwrap();
    assert_eq!(defined, serde_json::json!({"status": "ratio", "value": 1.25}));

    let undefined = serde_json::to_value(Acwr::Undefined).unwrap();
    assert_eq!(undefined, serde_json::json!({"status": "undefined"}));
  }
}
