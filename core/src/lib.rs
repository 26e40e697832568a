use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A preorder sale window. Only `end_time` drives alerting; `start_time` is
/// carried through untouched for downstream consumers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PreorderWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One tracked product as returned by the catalog provider.
/// An item without a preorder window is valid and simply never alerts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub preorder_period: Option<PreorderWindow>,
}

/// A subscribed channel and the timezone its timestamps render in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSubscription {
    pub channel_id: u64,
    pub timezone: Tz,
}

/// The fixed remaining-time checkpoints at which an alert fires.
/// Classification yields `Option<AlertBoundary>`; `None` means no boundary
/// matched and nothing is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertBoundary {
    SevenDays,
    ThreeDays,
    OneDay,
}

impl AlertBoundary {
    pub const fn days(self) -> i64 {
        match self {
            AlertBoundary::SevenDays => 7,
            AlertBoundary::ThreeDays => 3,
            AlertBoundary::OneDay => 1,
        }
    }

    pub const fn hours(self) -> i64 {
        self.days() * 24
    }

    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(AlertBoundary::SevenDays),
            3 => Some(AlertBoundary::ThreeDays),
            1 => Some(AlertBoundary::OneDay),
            _ => None,
        }
    }
}

/// A rendering-ready alert for one channel: the header line plus one body
/// per item page. Built fresh per channel so the timestamps localize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAlert {
    pub header: String,
    pub bodies: Vec<String>,
}

/// Outcome taxonomy for the delivery collaborator. `ChannelNotFound` is a
/// per-channel skip; the rest are surfaced but never abort the run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("channel {0} not found")]
    ChannelNotFound(u64),
    #[error("delivery rejected: HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("delivery transport failure: {0}")]
    Transport(String),
}

pub mod constants {
    /// Default maximum items per outgoing message body.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Default alert checkpoints, in days before the deadline.
    pub const DEFAULT_BOUNDARY_DAYS: &[i64] = &[7, 3, 1];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_hours_are_whole_days() {
        assert_eq!(AlertBoundary::SevenDays.hours(), 168);
        assert_eq!(AlertBoundary::ThreeDays.hours(), 72);
        assert_eq!(AlertBoundary::OneDay.hours(), 24);
    }

    #[test]
    fn boundary_from_days_rejects_unknown_checkpoints() {
        assert_eq!(AlertBoundary::from_days(7), Some(AlertBoundary::SevenDays));
        assert_eq!(AlertBoundary::from_days(3), Some(AlertBoundary::ThreeDays));
        assert_eq!(AlertBoundary::from_days(1), Some(AlertBoundary::OneDay));
        assert_eq!(AlertBoundary::from_days(2), None);
        assert_eq!(AlertBoundary::from_days(0), None);
        assert_eq!(AlertBoundary::from_days(-1), None);
    }
}
