pub mod header;

use leptos::prelude::*;

/// Application shell: top header and the routed page below it.
///
/// ```text
/// +------------------------------------------+
/// |              Header                       |
/// +------------------------------------------+
/// |              Content                      |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <header::Header />
            <main class="app-main">
                {children()}
            </main>
        </div>
    }
}
