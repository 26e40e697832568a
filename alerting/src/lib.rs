pub mod boundary;
pub mod grouping;
pub mod pagination;
pub mod ports;
pub mod render;


use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use preorder_core::{ChannelSubscription, DeliveryError, ItemDetails};
use tracing::{error, info, warn};

use crate::boundary::AlertSchedule;
use crate::ports::DeliveryPort;

/// Per-run dispatch totals, logged at the end of a pass and asserted in tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub messages_sent: usize,
    pub channels_skipped: usize,
    pub delivery_errors: usize,
}

/// The deadline alert batching engine. Holds no state between runs; every
/// pass is a single linear sweep over immutable inputs.
pub struct AlertEngine {
    delivery: Arc<dyn DeliveryPort>,
    schedule: AlertSchedule,
    page_size: usize,
}

impl AlertEngine {
    pub fn new(delivery: Arc<dyn DeliveryPort>, schedule: AlertSchedule, page_size: usize) -> Self {
        Self {
            delivery,
            schedule,
            page_size,
        }
    }

    /// Drive one alerting pass: for every subscription, classify each
    /// deadline group against `now`, paginate, render with the channel's
    /// timezone, and hand the batch to delivery.
    ///
    /// `now` must be a single snapshot captured before dispatch begins so
    /// every channel alerts on a consistent view of time. `groups` is
    /// read-only for the duration. Failures local to one channel are logged
    /// and never abort the remaining subscriptions.
    pub async fn dispatch(
        &self,
        subscriptions: &[ChannelSubscription],
        groups: &HashMap<DateTime<Utc>, Vec<ItemDetails>>,
        now: DateTime<Utc>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for subscription in subscriptions {
            self.dispatch_channel(subscription, groups, now, &mut report)
                .await;
        }

        info!(
            messages_sent = report.messages_sent,
            channels_skipped = report.channels_skipped,
            delivery_errors = report.delivery_errors,
            "dispatch pass complete"
        );
        report
    }

    async fn dispatch_channel(
        &self,
        subscription: &ChannelSubscription,
        groups: &HashMap<DateTime<Utc>, Vec<ItemDetails>>,
        now: DateTime<Utc>,
        report: &mut DispatchReport,
    ) {
        for (end_time, items) in groups {
            if items.is_empty() {
                continue;
            }
            let boundary = match self.schedule.classify(*end_time, now) {
                Some(boundary) => boundary,
                None => continue,
            };

            let pages = pagination::paginate(items, self.page_size);
            let alert = render::render(boundary, *end_time, subscription.timezone, &pages);

            match self
                .delivery
                .deliver(subscription.channel_id, &alert.header, &alert.bodies)
                .await
            {
                Ok(()) => {
                    info!(
                        channel_id = subscription.channel_id,
                        %end_time,
                        days = boundary.days(),
                        items = items.len(),
                        pages = alert.bodies.len(),
                        "alert delivered"
                    );
                    report.messages_sent += 1;
                }
                Err(DeliveryError::ChannelNotFound(id)) => {
                    warn!(channel_id = id, "channel not found, skipping subscription");
                    report.channels_skipped += 1;
                    return;
                }
                Err(e) => {
                    error!(
                        channel_id = subscription.channel_id,
                        %end_time,
                        "delivery failed: {e}"
                    );
                    report.delivery_errors += 1;
                }
            }
        }
    }
}
