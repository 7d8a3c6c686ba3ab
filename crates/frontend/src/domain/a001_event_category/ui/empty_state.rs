use leptos::prelude::*;

use crate::shared::icons::icon;

/// Shown instead of the tabs and table while the category has no events.
#[component]
pub fn EmptyCategoryState(#[prop(into)] category_name: String) -> impl IntoView {
    let example = ingest_example(&category_name);

    view! {
        <div class="empty-state">
            <div class="empty-state__icon">{icon("inbox")}</div>
            <h3 class="empty-state__title">"No events yet"</h3>
            <p class="empty-state__text">
                "Send the first " <strong>{category_name}</strong>
                " event and this page will pick it up automatically."
            </p>
            <pre class="empty-state__code">{example}</pre>
        </div>
    }
}

fn ingest_example(category_name: &str) -> String {
    let body = serde_json::json!({
        "category": category_name,
        "fields": { "amount": 49, "plan": "PRO" }
    });
    format!(
        "curl -X POST http://localhost:3000/api/events \\\n  -H 'Content-Type: application/json' \\\n  -d '{}'",
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_example_names_category() {
        let example = ingest_example("sale");
        assert!(example.contains(r#""category":"sale""#));
        assert!(example.contains("/api/events"));
    }
}
