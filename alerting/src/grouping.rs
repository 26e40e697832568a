use std::collections::HashMap;

use chrono::{DateTime, Utc};
use preorder_core::ItemDetails;

/// Partition items by exact preorder end time. Items without a window are
/// skipped, not an error. Within a group, items keep their first-encountered
/// input order; iteration order over the groups themselves is unspecified.
pub fn group_by_end_time(items: &[ItemDetails]) -> HashMap<DateTime<Utc>, Vec<ItemDetails>> {
    let mut groups: HashMap<DateTime<Utc>, Vec<ItemDetails>> = HashMap::new();

    for item in items {
        let end_time = match &item.preorder_period {
            Some(window) => window.end_time,
            None => continue,
        };
        groups.entry(end_time).or_default().push(item.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use preorder_core::PreorderWindow;

    fn item(title: &str, end_time: Option<DateTime<Utc>>) -> ItemDetails {
        ItemDetails {
            title: title.to_string(),
            link: format!("https://store.example/{title}"),
            preorder_period: end_time.map(|end| PreorderWindow {
                start_time: end - Duration::days(30),
                end_time: end,
            }),
        }
    }

    #[test]
    fn partitions_solely_by_end_time() {
        let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 2, 8, 10, 0, 0).unwrap();
        let items = vec![
            item("a", Some(t1)),
            item("b", Some(t2)),
            item("c", Some(t1)),
        ];

        let groups = group_by_end_time(&items);

        assert_eq!(groups.len(), 2);
        let titles: Vec<_> = groups[&t1].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert_eq!(groups[&t2].len(), 1);
    }

    #[test]
    fn every_windowed_item_lands_in_exactly_one_group() {
        let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        let t2 = t1 + Duration::hours(1);
        let items = vec![
            item("a", Some(t1)),
            item("b", Some(t2)),
            item("c", Some(t1)),
            item("d", Some(t2)),
        ];

        let groups = group_by_end_time(&items);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, items.len());
    }

    #[test]
    fn windowless_items_appear_in_no_group() {
        let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        let items = vec![item("a", None), item("b", Some(t1)), item("c", None)];

        let groups = group_by_end_time(&items);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&t1].len(), 1);
        assert_eq!(groups[&t1][0].title, "b");
    }

    #[test]
    fn timestamp_equality_is_exact_not_date_only() {
        let morning = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2026, 2, 1, 21, 0, 0).unwrap();
        let items = vec![item("a", Some(morning)), item("b", Some(evening))];

        let groups = group_by_end_time(&items);

        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_end_time(&[]).is_empty());
    }
}
