use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::domain::a001_event_category::ui::list::CategoryList;
use crate::domain::a001_event_category::ui::page::CategoryPage;
use crate::layout::Shell;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page page--not-found">
            <h2>"Page not found"</h2>
        </div>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Shell>
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/dashboard" /> } />
                    <Route path=path!("/dashboard") view=CategoryList />
                    <Route path=path!("/dashboard/category/:name") view=CategoryPage />
                </Routes>
            </Shell>
        </Router>
    }
}
