//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and making requests.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/category/sale/has-events");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Failure of a single request. Always retryable by re-issuing the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

/// GET `url` and decode the JSON body.
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let response = Request::get(url)
        .header("Cache-Control", "no-cache, no-store, must-revalidate")
        .header("Pragma", "no-cache")
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(502).to_string(), "Server error: 502");
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            FetchError::Encode("unsupported value".into()).to_string(),
            "Failed to encode request: unsupported value"
        );
    }
}
