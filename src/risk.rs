//! Risk board flags
//!
//! The board flag blends readiness with the whole-body ACWR zone. It uses its
//! own red/amber/green vocabulary; the per-muscle Low/Normal/High zones map
//! onto it only through `ZONE_BADGE_TABLE`, never by sharing a type.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::acwr::Acwr;
use crate::readiness::{CAUTION_THRESHOLD, READY_THRESHOLD};
use crate::zones::LoadZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
  Red,
  Amber,
  Green,
}

impl RiskFlag {
  /// Sort weight: red=3, amber=2, green=1
  pub fn severity(&self) -> u8 {
    match self {
      RiskFlag::Red => 3,
      RiskFlag::Amber => 2,
      RiskFlag::Green => 1,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RiskFlag::Red => "red",
      RiskFlag::Amber => "amber",
      RiskFlag::Green => "green",
    }
  }
}

impl std::fmt::Display for RiskFlag {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ACWR-only badge for each zone. Not used by `combine`.
pub const ZONE_BADGE_TABLE: [(LoadZone, RiskFlag); 3] = [
  (LoadZone::Low, RiskFlag::Green),
  (LoadZone::Normal, RiskFlag::Amber),
  (LoadZone::High, RiskFlag::Red),
];

pub fn zone_badge(zone: LoadZone) -> RiskFlag {
  ZONE_BADGE_TABLE
    .iter()
    .find(|(z, _)| *z == zone)
    .map(|(_, flag)| *flag)
    .unwrap_or(RiskFlag::Amber)
}

/// ---------------------------------------------------------------------------
/// Flag Combination
/// ---------------------------------------------------------------------------

/// First matching rule wins:
/// 1. ACWR zone High -> red
/// 2. readiness unknown or < 60 -> amber
/// 3. readiness >= 80 with zone Normal or Low -> green
/// 4. otherwise amber
///
/// An undefined ACWR (`zone == None`) never reaches green.
pub fn combine(readiness: Option<f64>, zone: Option<LoadZone>) -> RiskFlag {
  if zone == Some(LoadZone::High) {
    return RiskFlag::Red;
  }

  let readiness = match readiness {
    Some(r) if r >= CAUTION_THRESHOLD => r,
    _ => return RiskFlag::Amber,
  };

  match zone {
    Some(LoadZone::Low | LoadZone::Normal) if readiness >= READY_THRESHOLD => RiskFlag::Green,
    _ => RiskFlag::Amber,
  }
}

/// Standalone readiness indicator: >=80 green, 60-79 amber, <60 red
pub fn readiness_badge(readiness: Option<f64>) -> Option<RiskFlag> {
  readiness.map(|r| {
    if r >= READY_THRESHOLD {
      RiskFlag::Green
    } else if r >= CAUTION_THRESHOLD {
      RiskFlag::Amber
    } else {
      RiskFlag::Red
    }
  })
}

/// ---------------------------------------------------------------------------
/// Board Rows
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBoardRow {
  pub athlete_id: String,
  pub name: String,
  /// None when readiness is unknown
  pub readiness: Option<f64>,
  pub acwr: Acwr,
  pub yesterday_activity_metric: Option<f64>,
  pub flag: RiskFlag,
  /// ACWR-only badge from `ZONE_BADGE_TABLE`; None when ACWR is undefined
  pub acwr_badge: Option<RiskFlag>,
  pub readiness_badge: Option<RiskFlag>,
}

/// Severity descending, then readiness ascending. Unknown readiness sorts
/// before any score within a severity.
pub fn board_order(a: &RiskBoardRow, b: &RiskBoardRow) -> Ordering {
  b.flag
    .severity()
    .cmp(&a.flag.severity())
    .then_with(|| match (a.readiness, b.readiness) {
      (None, None) => Ordering::Equal,
      (None, Some(_)) => Ordering::Less,
      (Some(_), None) => Ordering::Greater,
      (Some(x), Some(y)) => x.total_cmp(&y),
    })
}

/// Stable sort: rows tied on both keys keep their input order
pub fn sort_board(rows: &mut [RiskBoardRow]) {
  rows.sort_by(board_order);
}
