use leptos::prelude::*;
use leptos_router::components::A;

use crate::shared::icons::icon;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header data-zone="header" class="header">
            <div class="header__content">
                <A href="/dashboard">
                    <span class="header__title">{icon("bar-chart")} " Event Analytics"</span>
                </A>
            </div>
        </header>
    }
}
