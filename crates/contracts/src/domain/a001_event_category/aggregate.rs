use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(EventCategoryId);

/// Категория событий (агрегат a001)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCategory {
    pub id: EventCategoryId,

    /// Unique name, also the path segment of the category page
    pub name: String,

    pub emoji: Option<String>,

    /// Hex colour used by the dashboard badge, e.g. "#ffd166"
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl EventCategory {
    pub fn new(name: String, emoji: Option<String>, color: Option<String>) -> Self {
        Self {
            id: EventCategoryId::new_v4(),
            name,
            emoji,
            color,
            created_at: Utc::now(),
        }
    }

    /// Заголовок страницы категории: "🛒 sale events"
    pub fn title(&self) -> String {
        match self.emoji.as_deref() {
            Some(emoji) if !emoji.is_empty() => format!("{} {} events", emoji, self.name),
            _ => format!("{} events", self.name),
        }
    }
}

/// Категория вместе с количеством событий (ответ `GET /api/category/:name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    #[serde(flatten)]
    pub category: EventCategory,
    pub events_count: u64,
    pub has_events: bool,
}

impl CategoryDetails {
    pub fn new(category: EventCategory, events_count: u64) -> Self {
        Self {
            category,
            events_count,
            has_events: events_count > 0,
        }
    }
}

/// Existence flag: has any event ever been recorded for the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistenceFlag {
    pub has_events: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name must not be empty".into());
        }
        if self.name.contains('/') {
            return Err("Category name must not contain '/'".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_and_without_emoji() {
        let mut category = EventCategory::new("sale".into(), Some("🛒".into()), None);
        assert_eq!(category.title(), "🛒 sale events");
        category.emoji = None;
        assert_eq!(category.title(), "sale events");
    }

    #[test]
    fn test_details_wire_format() {
        let category = EventCategory::new("signup".into(), None, Some("#ffd166".into()));
        let details = CategoryDetails::new(category, 3);
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "signup");
        assert_eq!(json["eventsCount"], 3);
        assert_eq!(json["hasEvents"], true);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let request = CreateCategoryRequest {
            name: "   ".into(),
            emoji: None,
            color: None,
        };
        assert!(request.validate().is_err());
    }
}
