use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded training load, produced when a session is completed.
///
/// `muscle == None` is a whole-body sample; otherwise the sample belongs to
/// the athlete+muscle entity. Samples are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
  pub athlete_id: String,
  pub muscle: Option<String>,
  pub recorded_at: DateTime<Utc>,
  pub load: f64,
}

impl LoadSample {
  pub fn whole_body(athlete_id: &str, recorded_at: DateTime<Utc>, load: f64) -> Self {
    Self {
      athlete_id: athlete_id.to_string(),
      muscle: None,
      recorded_at,
      load,
    }
  }

  pub fn for_muscle(
    athlete_id: &str,
    muscle: &str,
    recorded_at: DateTime<Utc>,
    load: f64,
  ) -> Self {
    Self {
      athlete_id: athlete_id.to_string(),
      muscle: Some(muscle.to_string()),
      recorded_at,
      load,
    }
  }

  /// Entity label used in diagnostics: `athlete` or `athlete/muscle`
  pub fn entity(&self) -> String {
    match &self.muscle {
      Some(m) => format!("{}/{}", self.athlete_id, m),
      None => self.athlete_id.clone(),
    }
  }
}
