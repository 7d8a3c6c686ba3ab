use contracts::domain::a001_event_category::aggregate::CategoryDetails;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use thaw::*;

use crate::domain::a001_event_category::api::list_categories;
use crate::shared::date_utils::format_local_date;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

pub fn category_href(name: &str) -> String {
    format!("/dashboard/category/{}", urlencoding::encode(name))
}

/// Dashboard: all categories with their event counts.
#[component]
pub fn CategoryList() -> impl IntoView {
    let (items, set_items) = signal::<Vec<CategoryDetails>>(Vec::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load_categories = move || {
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match list_categories().await {
                Ok(data) => {
                    log!("Loaded {} categories", data.len());
                    set_items.set(data);
                }
                Err(e) => {
                    log!("Failed to load categories: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // Загрузка при монтировании
    load_categories();

    view! {
        <PageFrame page_id="a001_event_category--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <h2 class="page__title">{icon("bar-chart")} " Event categories"</h2>
                <Button
                    size=ButtonSize::Small
                    on_click=move |_| load_categories()
                    disabled=move || loading.get()
                >
                    {icon("refresh")}
                    " Refresh"
                </Button>
            </div>

            {move || error.get().map(|err| view! {
                <MessageBar intent=MessageBarIntent::Error>
                    <div class="message-bar__text">{err}</div>
                </MessageBar>
            })}

            <div class="page__content">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=200.0>"Category"</TableHeaderCell>
                            <TableHeaderCell min_width=120.0>"Events"</TableHeaderCell>
                            <TableHeaderCell min_width=120.0>"Created"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            let data = items.get();
                            if data.is_empty() && !loading.get() {
                                return view! {
                                    <TableRow>
                                        <TableCell attr:colspan="3">
                                            <TableCellLayout>
                                                <span class="text-muted">"No categories yet"</span>
                                            </TableCellLayout>
                                        </TableCell>
                                    </TableRow>
                                }
                                .into_any();
                            }
                            data.into_iter()
                                .map(|item| {
                                    let href = category_href(&item.category.name);
                                    let label = match item.category.emoji.as_deref() {
                                        Some(emoji) if !emoji.is_empty() => format!("{} {}", emoji, item.category.name),
                                        _ => item.category.name.clone(),
                                    };
                                    let color = item.category.color.clone().unwrap_or_default();
                                    let events_count = item.events_count;
                                    let created = format_local_date(&item.category.created_at);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class="category-dot" style=format!("background: {};", color)></span>
                                                    <A href=href>{label}</A>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{events_count}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{created}</TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}
