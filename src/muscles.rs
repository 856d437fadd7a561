//! Muscle identifier reconciliation
//!
//! Diagram regions arrive with names like `Rectus-Femoris` while stored
//! samples use `rectus_femoris`. Both sides go through `canonical_key` before
//! matching. Diagram ids without a result are reported, not dropped.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::engine::MuscleLoadResult;

/// Lower-case and replace hyphens with underscores. Nothing else changes.
pub fn canonical_key(id: &str) -> String {
  id.to_lowercase().replace('-', "_")
}

pub fn same_muscle(a: &str, b: &str) -> bool {
  canonical_key(a) == canonical_key(b)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
  /// Canonical key -> result, for every diagram region that matched
  pub matched: BTreeMap<String, MuscleLoadResult>,
  /// Diagram ids (as supplied, first occurrence order) with no result
  pub unmatched: Vec<String>,
  /// Result keys that no diagram region asked for
  pub unrendered: Vec<String>,
}

impl Reconciliation {
  pub fn lookup(&self, diagram_id: &str) -> Option<&MuscleLoadResult> {
    self.matched.get(&canonical_key(diagram_id))
  }
}

pub fn reconcile<S: AsRef<str>>(results: &[MuscleLoadResult], diagram_ids: &[S]) -> Reconciliation {
  let by_key: BTreeMap<String, &MuscleLoadResult> = results
    .iter()
    .map(|r| (canonical_key(&r.muscle_key), r))
    .collect();

  let mut matched = BTreeMap::new();
  let mut unmatched = Vec::new();
  let mut seen = BTreeSet::new();

  for id in diagram_ids {
    let id = id.as_ref();
    let key = canonical_key(id);
    if !seen.insert(key.clone()) {
      continue;
    }
    match by_key.get(&key) {
      Some(result) => {
        matched.insert(key, (*result).clone());
      }
      None => unmatched.push(id.to_string()),
    }
  }

  let unrendered: Vec<String> = by_key
    .keys()
    .filter(|k| !matched.contains_key(*k))
    .cloned()
    .collect();

  if !unmatched.is_empty() {
    tracing::debug!(?unmatched, "diagram regions without load results");
  }

  Reconciliation {
    matched,
    unmatched,
    unrendered,
  }
}
