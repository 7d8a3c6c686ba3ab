//! PageFrame — standard root wrapper for every routed page.
//!
//! Usage:
//! ```rust,ignore
//! view! {
//!     <PageFrame page_id="a002_event--list" category=PAGE_CAT_LIST>
//!         <div class="page__header">...</div>
//!         <div class="page__content">...</div>
//!     </PageFrame>
//! }
//! ```

use super::page_standard::*;
use leptos::prelude::*;

/// Root wrapper that sets `id` and `data-page-category` on the page element.
#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`, e.g. `"a002_event--list"`.
    page_id: &'static str,
    /// One of the PAGE_CAT_* constants from `page_standard`.
    category: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id));

    let class = match category {
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        _ => "page",
    };

    view! {
        <div id=page_id class=class data-page-category=category>
            {children()}
        </div>
    }
}
