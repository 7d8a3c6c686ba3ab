use axum::http::StatusCode;
use thiserror::Error;

/// Domain errors of the event service. Anything else is a 500.
#[derive(Debug, Error)]
pub enum EventsError {
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EventsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EventsError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            EventsError::DuplicateCategory(_) => StatusCode::CONFLICT,
            EventsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Maps a service error to a response status, logging unexpected failures.
pub fn error_status(context: &str, err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<EventsError>() {
        Some(e) => {
            tracing::warn!("{}: {}", context, e);
            e.status_code()
        }
        None => {
            tracing::error!("{}: {:#}", context, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
