//! Column set of the event table.
//!
//! Events carry a schema-less field map, so the columns are derived from the
//! page itself: a fixed category column, a fixed timestamp column, one column
//! per key of the first record's fields (in key order) and a fixed delivery
//! status column.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use contracts::domain::a002_event::aggregate::EventRecord;
use serde_json::Value;

use crate::shared::date_utils::format_local_datetime;
use crate::shared::list_utils::capitalize_first_letter;

pub const CATEGORY_COLUMN: &str = "category";
pub const TIMESTAMP_COLUMN: &str = "createdAt";
pub const DELIVERY_STATUS_COLUMN: &str = "deliveryStatus";

/// Prefix of dynamic column keys; keeps a field named "category" apart from the fixed column.
const FIELD_PREFIX: &str = "field:";

pub const EMPTY_CELL: &str = "-";
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Category,
    Timestamp,
    Field(String),
    DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl ColumnDescriptor {
    fn category() -> Self {
        Self {
            key: CATEGORY_COLUMN.to_string(),
            label: "Category".to_string(),
            kind: ColumnKind::Category,
            sortable: false,
        }
    }

    fn timestamp() -> Self {
        Self {
            key: TIMESTAMP_COLUMN.to_string(),
            label: "Date".to_string(),
            kind: ColumnKind::Timestamp,
            sortable: true,
        }
    }

    fn field(name: &str) -> Self {
        Self {
            key: format!("{}{}", FIELD_PREFIX, name),
            label: capitalize_first_letter(name),
            kind: ColumnKind::Field(name.to_string()),
            sortable: true,
        }
    }

    fn delivery_status() -> Self {
        Self {
            key: DELIVERY_STATUS_COLUMN.to_string(),
            label: "Delivery Status".to_string(),
            kind: ColumnKind::DeliveryStatus,
            sortable: false,
        }
    }

    /// Текст ячейки; тот же текст используется фильтром
    pub fn cell_text(&self, record: &EventRecord, category_name: &str) -> String {
        self.cell_text_with(record, category_name, format_local_datetime)
    }

    pub fn cell_text_with(
        &self,
        record: &EventRecord,
        category_name: &str,
        format_ts: impl Fn(&DateTime<Utc>) -> String,
    ) -> String {
        match &self.kind {
            ColumnKind::Category => category_label(category_name),
            ColumnKind::Timestamp => format_ts(&record.created_at),
            ColumnKind::Field(name) => field_text(record.field(name)),
            ColumnKind::DeliveryStatus => record.delivery_status.as_str().to_string(),
        }
    }

    /// Orders two records by this column. Numbers compare numerically,
    /// strings case-insensitively, empty cells sort last.
    pub fn compare(&self, a: &EventRecord, b: &EventRecord) -> Ordering {
        match &self.kind {
            ColumnKind::Category => Ordering::Equal,
            ColumnKind::Timestamp => a.created_at.cmp(&b.created_at),
            ColumnKind::Field(name) => compare_values(a.field(name), b.field(name)),
            ColumnKind::DeliveryStatus => a.delivery_status.as_str().cmp(b.delivery_status.as_str()),
        }
    }
}

/// Columns for the given page. An empty page yields the fixed columns only.
pub fn resolve_columns(events: &[EventRecord]) -> Vec<ColumnDescriptor> {
    let dynamic = events
        .first()
        .map(|first| first.fields.keys().map(|k| ColumnDescriptor::field(k)).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut columns = Vec::with_capacity(dynamic.len() + 3);
    columns.push(ColumnDescriptor::category());
    columns.push(ColumnDescriptor::timestamp());
    columns.extend(dynamic);
    columns.push(ColumnDescriptor::delivery_status());
    columns
}

pub fn category_label(name: &str) -> String {
    if name.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        name.to_string()
    }
}

/// null, false, 0 and "" render as "-", like a missing key.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None => EMPTY_CELL.to_string(),
        Some(v) if is_falsy(v) => EMPTY_CELL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            // числа перед строками
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => field_text(Some(a))
                .to_lowercase()
                .cmp(&field_text(Some(b)).to_lowercase()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_event::aggregate::{DeliveryStatus, EventFields};
    use serde_json::json;

    fn record(value: Value) -> EventRecord {
        let fields: EventFields = match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        EventRecord::new(fields)
    }

    fn keys(columns: &[ColumnDescriptor]) -> Vec<&str> {
        columns.iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_empty_page_has_fixed_columns_only() {
        let columns = resolve_columns(&[]);
        assert_eq!(
            keys(&columns),
            vec![CATEGORY_COLUMN, TIMESTAMP_COLUMN, DELIVERY_STATUS_COLUMN]
        );
    }

    #[test]
    fn test_dynamic_columns_follow_first_record() {
        let events = vec![
            record(json!({"plan": "PRO", "amount": 49, "email": "a@b.c"})),
            record(json!({"other": 1})),
        ];
        let columns = resolve_columns(&events);
        assert_eq!(
            keys(&columns),
            vec![
                "category",
                "createdAt",
                "field:plan",
                "field:amount",
                "field:email",
                "deliveryStatus"
            ]
        );
        assert_eq!(columns[2].label, "Plan");
        assert!(columns[2].sortable);
        assert!(!columns[0].sortable);
    }

    #[test]
    fn test_columns_are_stable_for_fixed_page() {
        let events = vec![record(json!({"b": 1, "a": 2}))];
        assert_eq!(resolve_columns(&events), resolve_columns(&events));
    }

    #[test]
    fn test_field_named_like_fixed_column() {
        let events = vec![record(json!({"category": "x"}))];
        let columns = resolve_columns(&events);
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[2].kind, ColumnKind::Field("category".into()));
        assert_ne!(columns[2].key, columns[0].key);
    }

    #[test]
    fn test_falsy_and_missing_cells_render_dash() {
        let events = vec![record(json!({
            "zero": 0,
            "off": false,
            "empty": "",
            "none": null,
            "amount": 12.5,
            "on": true,
            "plan": "PRO"
        }))];
        let columns = resolve_columns(&events);
        let row = &events[0];
        let text = |key: &str| {
            let col = columns
                .iter()
                .find(|c| c.key == format!("field:{}", key))
                .unwrap();
            col.cell_text_with(row, "sale", |_| String::new())
        };
        assert_eq!(text("zero"), "-");
        assert_eq!(text("off"), "-");
        assert_eq!(text("empty"), "-");
        assert_eq!(text("none"), "-");
        assert_eq!(text("amount"), "12.5");
        assert_eq!(text("on"), "true");
        assert_eq!(text("plan"), "PRO");

        // key absent in a later row
        let other = record(json!({"x": 1}));
        let col = ColumnDescriptor::field("plan");
        assert_eq!(col.cell_text_with(&other, "sale", |_| String::new()), "-");
    }

    #[test]
    fn test_category_and_status_cells() {
        let mut row = record(json!({}));
        row.delivery_status = DeliveryStatus::Failed;
        let columns = resolve_columns(&[row.clone()]);
        let fmt = |_: &DateTime<Utc>| "ts".to_string();
        assert_eq!(columns[0].cell_text_with(&row, "", fmt), "Uncategorized");
        assert_eq!(columns[0].cell_text_with(&row, "sale", fmt), "sale");
        assert_eq!(columns[1].cell_text_with(&row, "sale", fmt), "ts");
        assert_eq!(columns[2].cell_text_with(&row, "sale", fmt), "FAILED");
    }

    #[test]
    fn test_compare_numbers_and_missing() {
        let col = ColumnDescriptor::field("amount");
        let small = record(json!({"amount": 9}));
        let big = record(json!({"amount": 10}));
        let missing = record(json!({}));
        assert_eq!(col.compare(&small, &big), Ordering::Less);
        assert_eq!(col.compare(&missing, &small), Ordering::Greater);

        let text_col = ColumnDescriptor::field("plan");
        let a = record(json!({"plan": "basic"}));
        let b = record(json!({"plan": "PRO"}));
        assert_eq!(text_col.compare(&a, &b), Ordering::Less);
    }
}
