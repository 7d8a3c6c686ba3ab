use contracts::domain::a001_event_category::aggregate::{EventCategory, EventCategoryId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::{format_timestamp, get_connection, parse_timestamp};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_event_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub emoji: Option<String>,
    pub color: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for EventCategory {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(EventCategory {
            id: EventCategoryId(Uuid::parse_str(&m.id)?),
            name: m.name,
            emoji: m.emoji,
            color: m.color,
            created_at: parse_timestamp(&m.created_at)?,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Все категории по имени
pub async fn list_all() -> anyhow::Result<Vec<EventCategory>> {
    Entity::find()
        .order_by_asc(Column::Name)
        .all(conn())
        .await?
        .into_iter()
        .map(EventCategory::try_from)
        .collect()
}

pub async fn get_by_name(name: &str) -> anyhow::Result<Option<EventCategory>> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(conn())
        .await?
        .map(EventCategory::try_from)
        .transpose()
}

pub async fn insert(category: &EventCategory) -> anyhow::Result<Uuid> {
    let active = ActiveModel {
        id: Set(category.id.value().to_string()),
        name: Set(category.name.clone()),
        emoji: Set(category.emoji.clone()),
        color: Set(category.color.clone()),
        created_at: Set(format_timestamp(&category.created_at)),
    };
    active.insert(conn()).await?;
    Ok(category.id.value())
}
