use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_event::aggregate::{
    IngestEventRequest, IngestEventResponse, PageResult,
};
use contracts::shared::time_window::TimeWindowTab;
use serde::Deserialize;

use crate::domain::a002_event;
use crate::shared::error::error_status;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub time_range: Option<String>,
}

impl ListQuery {
    /// Без timeRange берём "today"; неизвестное значение - ошибка.
    fn tab(&self) -> Result<TimeWindowTab, StatusCode> {
        match self.time_range.as_deref() {
            None => Ok(TimeWindowTab::default()),
            Some(raw) => TimeWindowTab::parse(raw).ok_or_else(|| {
                tracing::warn!("Invalid timeRange: {}", raw);
                StatusCode::BAD_REQUEST
            }),
        }
    }
}

/// GET /api/category/:name/events?page=&limit=&timeRange=
pub async fn list_paginated(
    Path(name): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResult>, StatusCode> {
    let tab = query.tab()?;
    let params = a002_event::service::page_params(query.page.as_deref(), query.limit.as_deref());

    a002_event::service::get_page(&name, params, tab)
        .await
        .map(Json)
        .map_err(|e| error_status(&format!("Failed to list events of '{}'", name), &e))
}

/// POST /api/events
pub async fn ingest(
    Json(request): Json<IngestEventRequest>,
) -> Result<(StatusCode, Json<IngestEventResponse>), StatusCode> {
    match a002_event::service::ingest(request).await {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(e) => Err(error_status("Failed to ingest event", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(time_range: Option<&str>) -> ListQuery {
        ListQuery {
            page: None,
            limit: None,
            time_range: time_range.map(String::from),
        }
    }

    #[test]
    fn test_missing_time_range_is_today() {
        assert_eq!(query(None).tab(), Ok(TimeWindowTab::Today));
    }

    #[test]
    fn test_time_range_values() {
        assert_eq!(query(Some("week")).tab(), Ok(TimeWindowTab::Week));
        assert_eq!(query(Some("month")).tab(), Ok(TimeWindowTab::Month));
        assert_eq!(query(Some("year")).tab(), Err(StatusCode::BAD_REQUEST));
    }
}
