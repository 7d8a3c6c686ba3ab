use crate::shared::icons::icon;
use leptos::prelude::*;

pub const PAGE_SIZE_OPTIONS: [u64; 4] = [10, 30, 50, 100];

/// "Page 2 of 5 (47 events)"
pub fn pagination_summary(page_index: u64, page_count: u64, total_count: u64) -> String {
    format!(
        "Page {} of {} ({} events)",
        page_index + 1,
        page_count.max(1),
        total_count
    )
}

/// Previous/Next controls for a server-paginated table.
///
/// Both buttons are disabled while a fetch is in flight.
#[component]
pub fn PaginationControls(
    /// Current page (0-indexed)
    #[prop(into)]
    current_page: Signal<u64>,

    #[prop(into)]
    total_pages: Signal<u64>,

    #[prop(into)]
    total_count: Signal<u64>,

    #[prop(into)]
    page_size: Signal<u64>,

    #[prop(into)]
    can_previous: Signal<bool>,

    #[prop(into)]
    can_next: Signal<bool>,

    on_previous: Callback<()>,

    on_next: Callback<()>,

    on_page_size_change: Callback<u64>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_previous.run(())
                disabled=move || !can_previous.get()
                title="Previous page"
            >
                {icon("chevron-left")}
                " Previous"
            </button>
            <span class="pagination-info">
                {move || pagination_summary(current_page.get(), total_pages.get(), total_count.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_next.run(())
                disabled=move || !can_next.get()
                title="Next page"
            >
                "Next "
                {icon("chevron-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(val) = event_target_value(&ev).parse::<u64>() {
                        on_page_size_change.run(val);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {PAGE_SIZE_OPTIONS
                    .iter()
                    .map(|&size| {
                        view! {
                            <option value=size.to_string() selected=move || page_size.get() == size>
                                {format!("{} / page", size)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_one_based() {
        assert_eq!(pagination_summary(1, 5, 47), "Page 2 of 5 (47 events)");
    }

    #[test]
    fn test_summary_with_no_pages() {
        assert_eq!(pagination_summary(0, 0, 0), "Page 1 of 1 (0 events)");
    }
}
