//! ACWR zone classification and display colors
//!
//! The zone (Low/Normal/High) and the alert intensity are independent
//! scales. Intensity only drives visual emphasis; when it is medium or high
//! it overrides the display color, never the zone itself.

use serde::{Deserialize, Serialize};

use crate::acwr::Acwr;

pub const LOW_UPPER: f64 = 0.8;
pub const NORMAL_UPPER: f64 = 1.3;

pub const INTENSITY_LOW_ABOVE: f64 = 1.1;
pub const INTENSITY_MEDIUM_ABOVE: f64 = 1.3;
pub const INTENSITY_HIGH_ABOVE: f64 = 1.5;

pub const COLOR_LOW: &str = "#22c55e";
pub const COLOR_NORMAL: &str = "#fec15f";
pub const COLOR_HIGH: &str = "#ef4444";
pub const COLOR_NEUTRAL: &str = "#d1d5db";
pub const COLOR_ALERT_HIGH: &str = "#DC2626";
pub const COLOR_ALERT_MEDIUM: &str = "#EA580C";

/// ---------------------------------------------------------------------------
/// Load Zone
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadZone {
  Low,    // acwr <= 0.8
  Normal, // 0.8 < acwr <= 1.3
  High,   // acwr > 1.3
}

impl LoadZone {
  /// Negative ratios cannot come from non-negative loads. If one shows up it
  /// is logged and treated as Low.
  pub fn from_ratio(acwr: f64) -> Self {
    if acwr < 0.0 {
      tracing::warn!(acwr, "negative ACWR, classifying as low");
      return LoadZone::Low;
    }
    if acwr <= LOW_UPPER {
      LoadZone::Low
    } else if acwr <= NORMAL_UPPER {
      LoadZone::Normal
    } else {
      LoadZone::High
    }
  }

  pub fn color(&self) -> &'static str {
    match self {
      LoadZone::Low => COLOR_LOW,
      LoadZone::Normal => COLOR_NORMAL,
      LoadZone::High => COLOR_HIGH,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      LoadZone::Low => "low",
      LoadZone::Normal => "normal",
      LoadZone::High => "high",
    }
  }
}

impl std::fmt::Display for LoadZone {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Alert Intensity
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertIntensity {
  None,
  Low,
  Medium,
  High,
}

impl AlertIntensity {
  pub fn from_ratio(acwr: f64) -> Self {
    if acwr > INTENSITY_HIGH_ABOVE {
      AlertIntensity::High
    } else if acwr > INTENSITY_MEDIUM_ABOVE {
      AlertIntensity::Medium
    } else if acwr > INTENSITY_LOW_ABOVE {
      AlertIntensity::Low
    } else {
      AlertIntensity::None
    }
  }

  /// Stronger color that replaces the zone color for medium/high alerts
  pub fn override_color(&self) -> Option<&'static str> {
    match self {
      AlertIntensity::High => Some(COLOR_ALERT_HIGH),
      AlertIntensity::Medium => Some(COLOR_ALERT_MEDIUM),
      AlertIntensity::Low | AlertIntensity::None => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Zone Display
/// ---------------------------------------------------------------------------

/// Everything a heatmap region needs to render one ACWR value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDisplay {
  /// None when the ACWR is undefined
  pub zone: Option<LoadZone>,
  pub base_color: &'static str,
  pub intensity: AlertIntensity,
  pub display_color: &'static str,
}

impl ZoneDisplay {
  pub fn classify(acwr: Acwr) -> Self {
    match acwr {
      Acwr::Undefined => Self {
        zone: None,
        base_color: COLOR_NEUTRAL,
        intensity: AlertIntensity::None,
        display_color: COLOR_NEUTRAL,
      },
      Acwr::Ratio(ratio) => {
        let zone = LoadZone::from_ratio(ratio);
        let intensity = AlertIntensity::from_ratio(ratio);
        Self {
          zone: Some(zone),
          base_color: zone.color(),
          intensity,
          display_color: intensity.override_color().unwrap_or(zone.color()),
        }
      }
    }
  }

  /// Regions pulse for medium and high alerts
  pub fn pulses(&self) -> bool {
    self.intensity >= AlertIntensity::Medium
  }
}
