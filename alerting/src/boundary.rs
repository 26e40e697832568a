use chrono::{DateTime, Utc};
use preorder_core::AlertBoundary;
use tracing::debug;

/// The set of enabled alert checkpoints. Defaults to 7, 3 and 1 days out;
/// tests and deployments can narrow or reorder the set without code changes.
#[derive(Debug, Clone)]
pub struct AlertSchedule {
    boundaries: Vec<AlertBoundary>,
}

impl Default for AlertSchedule {
    fn default() -> Self {
        Self {
            boundaries: vec![
                AlertBoundary::SevenDays,
                AlertBoundary::ThreeDays,
                AlertBoundary::OneDay,
            ],
        }
    }
}

impl AlertSchedule {
    pub fn new(boundaries: Vec<AlertBoundary>) -> Self {
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &[AlertBoundary] {
        &self.boundaries
    }

    /// Classify the remaining time to `end_time` against the enabled
    /// checkpoints. Exact whole-hour match only: a deadline 167 or 169 hours
    /// out never alerts, and a past deadline never alerts retroactively.
    ///
    /// "Hours" means absolute elapsed UTC hours, floored toward negative
    /// infinity. Wall-clock shifts (DST) in a subscriber's display zone
    /// cannot move a boundary.
    pub fn classify(&self, end_time: DateTime<Utc>, now: DateTime<Utc>) -> Option<AlertBoundary> {
        let delta_hours = (end_time - now).num_seconds().div_euclid(3600);
        debug!(%end_time, %now, delta_hours, "classified deadline delta");

        self.boundaries
            .iter()
            .copied()
            .find(|boundary| boundary.hours() == delta_hours)
    }
}
