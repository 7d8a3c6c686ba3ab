use contracts::domain::a002_event::aggregate::PageResult;

use super::ui::list::fetch::PageQuery;
use crate::shared::api_utils::{api_url, get_json, FetchError};

/// `GET /api/category/:name/events?page=&limit=&timeRange=`
pub async fn fetch_event_page(query: &PageQuery) -> Result<PageResult, FetchError> {
    let path = event_page_path(query)?;
    get_json::<PageResult>(&api_url(&path)).await
}

fn event_page_path(query: &PageQuery) -> Result<String, FetchError> {
    let qs = serde_qs::to_string(&query.to_request()).map_err(|e| FetchError::Encode(e.to_string()))?;
    Ok(format!(
        "/api/category/{}/events?{}",
        urlencoding::encode(&query.category),
        qs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::time_window::TimeWindowTab;

    #[test]
    fn test_event_page_path() {
        let query = PageQuery {
            category: "new signup".into(),
            page_index: 1,
            page_size: 30,
            tab: TimeWindowTab::Week,
        };
        assert_eq!(
            event_page_path(&query).unwrap(),
            "/api/category/new%20signup/events?page=2&limit=30&timeRange=week"
        );
    }
}
