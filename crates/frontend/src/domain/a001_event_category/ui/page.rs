use contracts::domain::a001_event_category::aggregate::CategoryDetails;
use contracts::shared::page_params::PageParams;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_params_map, use_query_map};
use thaw::*;

use crate::domain::a001_event_category::api::fetch_category;
use crate::domain::a002_event::ui::list::EventAnalyticsView;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

/// `/dashboard/category/:name?page=&limit=`
#[component]
pub fn CategoryPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();

    let name = Memo::new(move |_| params.with(|p| p.get("name").unwrap_or_default()));

    // page/limit читаются один раз при открытии страницы
    let page_params = query.with_untracked(|q| {
        PageParams::parse(q.get("page").as_deref(), q.get("limit").as_deref())
    });

    let (details, set_details) = signal::<Option<CategoryDetails>>(None);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load_details = move |name: String| {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            set_details.set(None);

            match fetch_category(&name).await {
                Ok(data) => {
                    log!("Loaded category '{}' ({} events)", name, data.events_count);
                    set_details.set(Some(data));
                }
                Err(e) => {
                    log!("Failed to load category '{}': {}", name, e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        let name = name.get();
        if !name.is_empty() {
            load_details(name);
        }
    });

    view! {
        <PageFrame page_id="a002_event--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <A href="/dashboard">
                    <span class="page__back">{icon("chevron-left")} " Dashboard"</span>
                </A>
                <h2 class="page__title">
                    {move || match details.get() {
                        Some(d) => d.category.title(),
                        None => format!("{} events", name.get()),
                    }}
                </h2>
            </div>

            <div class="page__content">
                {move || {
                    if loading.get() {
                        return view! {
                            <div class="page__loading"><Spinner /></div>
                        }
                        .into_any();
                    }
                    if let Some(err) = error.get() {
                        return view! {
                            <MessageBar intent=MessageBarIntent::Error>
                                <div class="message-bar__text">{err}</div>
                                <Button
                                    size=ButtonSize::Small
                                    on_click=move |_| load_details(name.get_untracked())
                                >
                                    {icon("refresh")}
                                    " Retry"
                                </Button>
                            </MessageBar>
                        }
                        .into_any();
                    }
                    match details.get() {
                        Some(d) => view! {
                            <EventAnalyticsView
                                category_name=d.category.name.clone()
                                initial_has_events=d.has_events
                                params=page_params
                            />
                        }
                        .into_any(),
                        None => view! { <></> }.into_any(),
                    }
                }}
            </div>
        </PageFrame>
    }
}
