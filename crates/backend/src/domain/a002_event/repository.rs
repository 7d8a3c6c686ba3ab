use chrono::{DateTime, Utc};
use contracts::domain::a001_event_category::aggregate::EventCategoryId;
use contracts::domain::a002_event::aggregate::{
    DeliveryStatus, EventFields, EventId, EventRecord,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::{format_timestamp, get_connection, parse_timestamp};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub created_at: String,
    /// JSON-объект полей события
    pub fields: String,
    pub delivery_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for EventRecord {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let fields: EventFields = serde_json::from_str(&m.fields)?;
        let delivery_status = DeliveryStatus::parse(&m.delivery_status).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown delivery status '{}' for event {}",
                m.delivery_status,
                m.id
            );
            DeliveryStatus::Pending
        });
        Ok(EventRecord {
            id: EventId(Uuid::parse_str(&m.id)?),
            created_at: parse_timestamp(&m.created_at)?,
            fields,
            delivery_status,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn in_window(category_id: &EventCategoryId, since: &DateTime<Utc>) -> Select<Entity> {
    Entity::find()
        .filter(Column::CategoryId.eq(category_id.value().to_string()))
        .filter(Column::CreatedAt.gte(format_timestamp(since)))
}

pub async fn insert(category_id: &EventCategoryId, record: &EventRecord) -> anyhow::Result<Uuid> {
    let active = ActiveModel {
        id: Set(record.id.value().to_string()),
        category_id: Set(category_id.value().to_string()),
        created_at: Set(format_timestamp(&record.created_at)),
        fields: Set(serde_json::to_string(&record.fields)?),
        delivery_status: Set(record.delivery_status.as_str().to_string()),
    };
    active.insert(conn()).await?;
    Ok(record.id.value())
}

/// Количество событий категории за всё время
pub async fn count_all(category_id: &EventCategoryId) -> anyhow::Result<u64> {
    let total = Entity::find()
        .filter(Column::CategoryId.eq(category_id.value().to_string()))
        .count(conn())
        .await?;
    Ok(total)
}

pub async fn exists(category_id: &EventCategoryId) -> anyhow::Result<bool> {
    let first = Entity::find()
        .filter(Column::CategoryId.eq(category_id.value().to_string()))
        .limit(1)
        .one(conn())
        .await?;
    Ok(first.is_some())
}

/// Пагинированный список событий категории, начиная с `since`, новые первыми.
/// Возвращает страницу и общее количество в окне.
pub async fn list_paginated(
    category_id: &EventCategoryId,
    since: &DateTime<Utc>,
    limit: u64,
    offset: u64,
) -> anyhow::Result<(Vec<EventRecord>, u64)> {
    // Подсчет общего количества
    let total = in_window(category_id, since).count(conn()).await?;

    let items = in_window(category_id, since)
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(EventRecord::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok((items, total))
}
