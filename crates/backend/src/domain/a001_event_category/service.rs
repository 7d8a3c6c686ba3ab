use super::repository;
use crate::domain::a002_event;
use crate::shared::error::EventsError;
use contracts::domain::a001_event_category::aggregate::{
    CategoryDetails, CreateCategoryRequest, EventCategory, ExistenceFlag,
};

/// Список категорий для дашборда, с количеством событий
pub async fn list_all() -> anyhow::Result<Vec<CategoryDetails>> {
    let categories = repository::list_all().await?;
    let mut result = Vec::with_capacity(categories.len());
    for category in categories {
        let count = a002_event::repository::count_all(&category.id).await?;
        result.push(CategoryDetails::new(category, count));
    }
    Ok(result)
}

pub async fn get_details(name: &str) -> anyhow::Result<CategoryDetails> {
    let category = find(name).await?;
    let count = a002_event::repository::count_all(&category.id).await?;
    Ok(CategoryDetails::new(category, count))
}

/// Has any event ever been recorded, regardless of time window
pub async fn has_events(name: &str) -> anyhow::Result<ExistenceFlag> {
    let category = find(name).await?;
    let has_events = a002_event::repository::exists(&category.id).await?;
    Ok(ExistenceFlag { has_events })
}

pub async fn create(request: CreateCategoryRequest) -> anyhow::Result<EventCategory> {
    request.validate().map_err(EventsError::InvalidInput)?;

    let name = request.name.trim().to_string();
    if repository::get_by_name(&name).await?.is_some() {
        return Err(EventsError::DuplicateCategory(name).into());
    }

    let category = EventCategory::new(name, request.emoji, request.color);
    repository::insert(&category).await?;
    tracing::info!("Category created: {} ({})", category.name, category.id);
    Ok(category)
}

/// Категория по имени или CategoryNotFound
pub async fn find(name: &str) -> anyhow::Result<EventCategory> {
    repository::get_by_name(name)
        .await?
        .ok_or_else(|| EventsError::CategoryNotFound(name.to_string()).into())
}
