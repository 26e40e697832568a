use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use preorder_core::{AlertBoundary, ItemDetails, RenderedAlert};

/// Format a timestamp in the subscriber's zone, e.g.
/// `2026-09-06 09:00:00 JST+0900`.
pub fn local_time_str(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S %Z%z")
        .to_string()
}

/// Render one deadline group for one channel. The header always carries the
/// true total across all pages; each body covers exactly one page.
/// Pure data-in, data-out; the dispatch loop hands the result to delivery.
pub fn render(
    boundary: AlertBoundary,
    end_time: DateTime<Utc>,
    tz: Tz,
    pages: &[&[ItemDetails]],
) -> RenderedAlert {
    let total: usize = pages.iter().map(|page| page.len()).sum();
    let header = format!(
        "### 🚨🚨🚨 {} item(s) close for preorder in {} day(s) 🚨🚨🚨",
        total,
        boundary.days()
    );

    let end_time_str = local_time_str(end_time, tz);
    let bodies = pages
        .iter()
        .map(|page| {
            let mut body = format!("Items ending at {end_time_str}");
            for item in *page {
                body.push('\n');
                body.push_str(&format!("[{}]({})", item.title, item.link));
            }
            body
        })
        .collect();

    RenderedAlert { header, bodies }
}
