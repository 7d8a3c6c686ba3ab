use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::time_window::TimeWindowTab;

crate::uuid_aggregate_id!(EventId);

/// Free-form payload of an event. Key order is preserved as received.
pub type EventFields = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(DeliveryStatus::Pending),
            "DELIVERED" => Some(DeliveryStatus::Delivered),
            "FAILED" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }
}

/// Событие категории (агрегат a002)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    pub created_at: DateTime<Utc>,
    pub fields: EventFields,
    pub delivery_status: DeliveryStatus,
}

impl EventRecord {
    pub fn new(fields: EventFields) -> Self {
        Self {
            id: EventId::new_v4(),
            created_at: Utc::now(),
            fields,
            delivery_status: DeliveryStatus::Pending,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Numeric fields only; strings that look like numbers are not coerced.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.fields
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|n| (key.as_str(), n)))
    }
}

/// One server page of events plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub events: Vec<EventRecord>,
    pub events_count: u64,
}

/// Query of `GET /api/category/:name/events`. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPageRequest {
    pub page: u64,
    pub limit: u64,
    pub time_range: TimeWindowTab,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestEventRequest {
    pub category: String,
    pub fields: Value,
}

impl IngestEventRequest {
    /// Payload must be a JSON object; anything else is rejected.
    pub fn into_fields(self) -> Result<(String, EventFields), String> {
        match self.fields {
            Value::Object(map) => Ok((self.category, map)),
            other => Err(format!("fields must be a JSON object, got {}", json_kind(&other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestEventResponse {
    pub id: EventId,
    pub created_at: DateTime<Utc>,
    pub delivery_status: DeliveryStatus,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
