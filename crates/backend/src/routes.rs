use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // CATEGORIES (a001)
        // ========================================
        .route(
            "/api/category",
            get(handlers::a001_event_category::list_all)
                .post(handlers::a001_event_category::create),
        )
        .route(
            "/api/category/:name",
            get(handlers::a001_event_category::get_by_name),
        )
        .route(
            "/api/category/:name/has-events",
            get(handlers::a001_event_category::has_events),
        )
        // ========================================
        // EVENTS (a002)
        // ========================================
        .route(
            "/api/category/:name/events",
            get(handlers::a002_event::list_paginated),
        )
        .route("/api/events", post(handlers::a002_event::ingest))
}
