use contracts::domain::a001_event_category::aggregate::{CategoryDetails, ExistenceFlag};

use crate::shared::api_utils::{api_url, get_json, FetchError};

fn category_path(name: &str) -> String {
    format!("/api/category/{}", urlencoding::encode(name))
}

/// Категория и число событий; задаёт начальное значение флага hasEvents
pub async fn fetch_category(name: &str) -> Result<CategoryDetails, FetchError> {
    get_json(&api_url(&category_path(name))).await
}

/// Has any event ever been recorded for the category
pub async fn fetch_existence(name: &str) -> Result<ExistenceFlag, FetchError> {
    get_json(&api_url(&format!("{}/has-events", category_path(name)))).await
}

pub async fn list_categories() -> Result<Vec<CategoryDetails>, FetchError> {
    get_json(&api_url("/api/category")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_path_is_encoded() {
        assert_eq!(category_path("sale"), "/api/category/sale");
        assert_eq!(category_path("a b"), "/api/category/a%20b");
    }
}
