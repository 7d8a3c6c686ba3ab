use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_event_category::aggregate::{
    CategoryDetails, CreateCategoryRequest, EventCategory, ExistenceFlag,
};

use crate::domain::a001_event_category;
use crate::shared::error::error_status;

/// GET /api/category
pub async fn list_all() -> Result<Json<Vec<CategoryDetails>>, StatusCode> {
    a001_event_category::service::list_all()
        .await
        .map(Json)
        .map_err(|e| error_status("Failed to list categories", &e))
}

/// GET /api/category/:name
pub async fn get_by_name(Path(name): Path<String>) -> Result<Json<CategoryDetails>, StatusCode> {
    a001_event_category::service::get_details(&name)
        .await
        .map(Json)
        .map_err(|e| error_status(&format!("Failed to get category '{}'", name), &e))
}

/// GET /api/category/:name/has-events
pub async fn has_events(Path(name): Path<String>) -> Result<Json<ExistenceFlag>, StatusCode> {
    a001_event_category::service::has_events(&name)
        .await
        .map(Json)
        .map_err(|e| error_status(&format!("Failed to check events of '{}'", name), &e))
}

/// POST /api/category
pub async fn create(
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<EventCategory>), StatusCode> {
    match a001_event_category::service::create(request).await {
        Ok(category) => Ok((StatusCode::CREATED, Json(category))),
        Err(e) => Err(error_status("Failed to create category", &e)),
    }
}
