use super::repository;
use crate::domain::a001_event_category;
use crate::shared::config;
use crate::shared::error::EventsError;
use chrono::{DateTime, Local, TimeZone};
use contracts::domain::a002_event::aggregate::{
    EventRecord, IngestEventRequest, IngestEventResponse, PageResult,
};
use contracts::shared::page_params::PageParams;
use contracts::shared::time_window::{TimeWindowTab, TimeWindows};

/// Запись события в категорию. Поля должны быть JSON-объектом.
pub async fn ingest(request: IngestEventRequest) -> anyhow::Result<IngestEventResponse> {
    let (category_name, fields) = request.into_fields().map_err(EventsError::InvalidInput)?;
    let category = a001_event_category::service::find(&category_name).await?;

    let record = EventRecord::new(fields);
    repository::insert(&category.id, &record).await?;
    tracing::debug!("Event {} recorded in '{}'", record.id, category.name);

    Ok(IngestEventResponse {
        id: record.id,
        created_at: record.created_at,
        delivery_status: record.delivery_status,
    })
}

/// Страница событий категории в окне `tab`, считая от текущего момента сервера
pub async fn get_page(
    category_name: &str,
    params: PageParams,
    tab: TimeWindowTab,
) -> anyhow::Result<PageResult> {
    get_page_at(category_name, params, tab, &Local::now()).await
}

/// Same as [`get_page`] with the window anchored at `now`
pub async fn get_page_at<Tz: TimeZone>(
    category_name: &str,
    params: PageParams,
    tab: TimeWindowTab,
    now: &DateTime<Tz>,
) -> anyhow::Result<PageResult> {
    let category = a001_event_category::service::find(category_name).await?;
    let since = tab.range_start(&TimeWindows::new(now));

    let (events, events_count) =
        repository::list_paginated(&category.id, &since, params.limit, params.offset()).await?;

    Ok(PageResult {
        events,
        events_count,
    })
}

/// Разбор `page`/`limit` с лимитами из конфигурации
pub fn page_params(page: Option<&str>, limit: Option<&str>) -> PageParams {
    let events = config::events_config();
    PageParams::parse_with(page, limit, events.default_page_size, events.max_page_size)
}
