//! Per-field running sums over the current page.
//!
//! Only numeric field values take part. Each value is added to `total` and,
//! independently, to `this_week` / `this_month` / `today` when the event's
//! timestamp falls into that window.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone};
use contracts::domain::a002_event::aggregate::EventRecord;
use contracts::shared::time_window::{TimeWindowTab, TimeWindows, WindowMembership};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateBucket {
    pub total: f64,
    pub this_week: f64,
    pub this_month: f64,
    pub today: f64,
}

impl AggregateBucket {
    fn add(&mut self, value: f64, membership: WindowMembership) {
        self.total += value;
        if membership.in_current_week {
            self.this_week += value;
        }
        if membership.in_current_month {
            self.this_month += value;
        }
        if membership.is_today {
            self.today += value;
        }
    }

    /// Sum shown on the card for the active tab.
    pub fn for_tab(&self, tab: TimeWindowTab) -> f64 {
        match tab {
            TimeWindowTab::Today => self.today,
            TimeWindowTab::Week => self.this_week,
            TimeWindowTab::Month => self.this_month,
        }
    }
}

/// Buckets keyed by field name, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTable {
    entries: Vec<(String, AggregateBucket)>,
}

impl AggregateTable {
    pub fn get(&self, key: &str) -> Option<&AggregateBucket> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateBucket)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds the page into per-field buckets. Recomputed from scratch on every call.
pub fn aggregate<Tz: TimeZone>(events: &[EventRecord], now: &DateTime<Tz>) -> AggregateTable {
    let windows = TimeWindows::new(now);
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, AggregateBucket)> = Vec::new();

    for event in events {
        let membership = windows.membership(&event.created_at);
        for (key, value) in event.numeric_fields() {
            let slot = match index.get(key) {
                Some(&i) => i,
                None => {
                    entries.push((key.to_string(), AggregateBucket::default()));
                    index.insert(key.to_string(), entries.len() - 1);
                    entries.len() - 1
                }
            };
            entries[slot].1.add(value, membership);
        }
    }

    AggregateTable { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use contracts::domain::a002_event::aggregate::EventFields;
    use serde_json::{json, Value};

    fn record_at(value: Value, created_at: DateTime<Utc>) -> EventRecord {
        let fields: EventFields = match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        let mut record = EventRecord::new(fields);
        record.created_at = created_at;
        record
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_all_today_sums_skip_bad_values() {
        let now = utc("2024-05-15T12:00:00Z");
        let events = vec![
            record_at(json!({"amount": 10}), now - Duration::hours(1)),
            record_at(json!({"amount": 20}), now - Duration::hours(2)),
            record_at(json!({"amount": "bad"}), now - Duration::hours(3)),
        ];
        let table = aggregate(&events, &now);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("amount"),
            Some(&AggregateBucket {
                total: 30.0,
                this_week: 30.0,
                this_month: 30.0,
                today: 30.0,
            })
        );
    }

    #[test]
    fn test_empty_page_gives_empty_table() {
        let table = aggregate(&[], &utc("2024-05-15T12:00:00Z"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_windows_are_counted_independently() {
        // Saturday June 1st
        let now = utc("2024-06-01T10:00:00Z");
        let events = vec![
            record_at(json!({"amount": 1}), now),
            // Friday, previous month, same week
            record_at(json!({"amount": 2}), utc("2024-05-31T09:00:00Z")),
            // previous week and month
            record_at(json!({"amount": 4}), utc("2024-05-20T09:00:00Z")),
        ];
        let bucket = *aggregate(&events, &now).get("amount").unwrap();
        assert_eq!(bucket.total, 7.0);
        assert_eq!(bucket.this_week, 3.0);
        assert_eq!(bucket.this_month, 1.0);
        assert_eq!(bucket.today, 1.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let now = utc("2024-05-15T12:00:00Z");
        let events = vec![
            record_at(json!({"a": 1.5, "b": 2}), now),
            record_at(json!({"b": 3, "c": true}), now - Duration::days(20)),
        ];
        assert_eq!(aggregate(&events, &now), aggregate(&events, &now));
    }

    #[test]
    fn test_first_seen_key_order() {
        let now = utc("2024-05-15T12:00:00Z");
        let events = vec![
            record_at(json!({"zeta": 1, "label": "x"}), now),
            record_at(json!({"alpha": 1, "zeta": 2}), now),
        ];
        let table = aggregate(&events, &now);
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_tab_selects_matching_sum() {
        let bucket = AggregateBucket {
            total: 100.0,
            this_week: 3.0,
            this_month: 7.0,
            today: 1.0,
        };
        assert_eq!(bucket.for_tab(TimeWindowTab::Today), 1.0);
        assert_eq!(bucket.for_tab(TimeWindowTab::Week), 3.0);
        assert_eq!(bucket.for_tab(TimeWindowTab::Month), 7.0);
    }
}
