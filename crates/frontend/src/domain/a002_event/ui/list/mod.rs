pub mod aggregation;
pub mod columns;
pub mod fetch;
pub mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use contracts::domain::a002_event::aggregate::EventRecord;
use contracts::shared::page_params::PageParams;
use contracts::shared::time_window::TimeWindowTab;
use gloo_timers::future::TimeoutFuture;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use self::aggregation::aggregate;
use self::columns::{resolve_columns, ColumnDescriptor, ColumnKind};
use self::fetch::{CommitOutcome, Dispatch, FetchOrchestrator, EXISTENCE_POLL_INTERVAL_MS};
use self::state::create_state;
use crate::domain::a001_event_category::api::fetch_existence;
use crate::domain::a001_event_category::ui::empty_state::EmptyCategoryState;
use crate::domain::a002_event::api::fetch_event_page;
use crate::shared::api_utils::FetchError;
use crate::shared::components::table::SortableHeaderCell;
use crate::shared::components::ui::DeliveryStatusBadge;
use crate::shared::components::{PaginationControls, StatCard, ValueFormat};
use crate::shared::icons::icon;
use crate::shared::list_utils::capitalize_first_letter;

pub const SKELETON_ROWS: usize = 5;

/// What the table body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Skeleton,
    NoResults,
    Rows,
    /// No data for the current identity and nothing in flight (e.g. the request failed)
    Blank,
}

pub fn body_state(is_fetching: bool, has_data_for_current: bool, visible_rows: usize) -> BodyState {
    if is_fetching && !has_data_for_current {
        BodyState::Skeleton
    } else if !has_data_for_current {
        BodyState::Blank
    } else if visible_rows == 0 {
        BodyState::NoResults
    } else {
        BodyState::Rows
    }
}

async fn refresh_existence(
    name: String,
    has_events: RwSignal<bool>,
    existence_error: RwSignal<Option<FetchError>>,
) {
    match fetch_existence(&name).await {
        Ok(flag) => {
            let _ = existence_error.try_set(None);
            let _ = has_events.try_set(flag.has_events);
        }
        Err(e) => {
            log!("Failed to check events of '{}': {}", name, e);
            let _ = existence_error.try_set(Some(e));
        }
    }
}

/// Events table with time-window aggregates for one category.
///
/// `initial_has_events` comes from the category lookup and is re-validated
/// by a poll while the view is mounted. The paginated query is not issued
/// until the category has events.
#[component]
pub fn EventAnalyticsView(
    #[prop(into)] category_name: String,
    initial_has_events: bool,
    params: PageParams,
) -> impl IntoView {
    let state = create_state(params);
    let orchestrator = RwSignal::new(FetchOrchestrator::new(initial_has_events));
    let has_events = RwSignal::new(initial_has_events);
    let existence_error = RwSignal::new(None::<FetchError>);
    let category = StoredValue::new(category_name.clone());

    let query = Memo::new(move |_| state.with(|s| s.page_query(&category.get_value())));

    let sync_events_count = move || {
        let count = orchestrator
            .try_with_untracked(|o| o.displayed_page().map(|p| p.events_count))
            .flatten();
        if let Some(count) = count {
            state.try_update(|s| s.set_events_count(count));
        }
    };

    let run_dispatch = move |dispatch: Dispatch| match dispatch {
        Dispatch::Issue(query) => {
            log!("Fetching events: {:?}", query);
            spawn_local(async move {
                let result = fetch_event_page(&query).await;
                if let Err(e) = &result {
                    log!("Failed to fetch events for {:?}: {}", query, e);
                }
                let outcome = orchestrator.try_update(|o| o.commit(query.clone(), result));
                match outcome {
                    Some(CommitOutcome::Displayed) => sync_events_count(),
                    Some(CommitOutcome::Stale) => log::debug!("Discarded stale page {:?}", query),
                    _ => {}
                }
            });
        }
        Dispatch::CacheHit => sync_events_count(),
        Dispatch::Disabled | Dispatch::Pending | Dispatch::Failed => {}
    };

    // Identity or existence change => at most one new request
    Effect::new(move |_| {
        let query = query.get();
        let has = has_events.get();
        let dispatch = orchestrator.try_update(|o| {
            o.set_has_events(has);
            o.dispatch(query)
        });
        if let Some(dispatch) = dispatch {
            run_dispatch(dispatch);
        }
    });

    // Existence poll
    let poll_alive = Arc::new(AtomicBool::new(true));
    {
        let alive = poll_alive.clone();
        on_cleanup(move || alive.store(false, Ordering::Relaxed));
    }
    spawn_local(async move {
        loop {
            TimeoutFuture::new(EXISTENCE_POLL_INTERVAL_MS).await;
            if !poll_alive.load(Ordering::Relaxed) {
                break;
            }
            refresh_existence(category_name.clone(), has_events, existence_error).await;
        }
    });

    let retry = move |_: leptos::ev::MouseEvent| {
        if existence_error.get_untracked().is_some() {
            spawn_local(refresh_existence(category.get_value(), has_events, existence_error));
        }
        if let Some(dispatch) = orchestrator.try_update(|o| o.retry()) {
            run_dispatch(dispatch);
        }
    };

    let is_fetching = Signal::derive(move || orchestrator.with(|o| o.is_fetching()));
    let is_refetching = Signal::derive(move || orchestrator.with(|o| o.is_refetching()));
    let has_data_for_current = Signal::derive(move || orchestrator.with(|o| o.has_data_for_current()));
    // Rows and totals of a previous identity are not shown under a new tab/page
    let page = Signal::derive(move || orchestrator.with(|o| o.current_page()));
    let fetch_error = Signal::derive(move || {
        orchestrator
            .with(|o| o.error().cloned())
            .or_else(|| existence_error.get())
    });

    let events = Memo::new(move |_| page.get().map(|p| p.events.clone()).unwrap_or_default());
    let columns = Memo::new(move |_| events.with(|e| resolve_columns(e)));
    let aggregates = Memo::new(move |_| events.with(|e| aggregate(e, &Local::now())));
    let rows = Memo::new(move |_| {
        let cols = columns.get();
        events.with(|e| state.with(|s| s.apply_view(e, &cols, &category.get_value())))
    });

    let active_tab = Signal::derive(move || state.with(|s| s.active_tab));

    view! {
        {move || {
            if !has_events.get() {
                return view! { <EmptyCategoryState category_name=category.get_value() /> }.into_any();
            }
            view! {
                <div class="event-analytics">
                    <TabBar
                        active_tab=active_tab
                        on_select=Callback::new(move |tab| state.update(|s| s.set_tab(tab)))
                    />

                    <div class="stat-cards">
                        <StatCard
                            label="Total Events"
                            icon_name="bar-chart"
                            value=Signal::derive(move || page.get().map(|p| p.events_count as f64))
                            format=ValueFormat::Integer
                            subtitle=Signal::derive(move || Some(format!("Events {}", active_tab.get().caption())))
                            highlighted=true
                        />
                        {move || {
                            let tab = active_tab.get();
                            aggregates
                                .get()
                                .iter()
                                .map(|(key, bucket)| {
                                    let value = bucket.for_tab(tab);
                                    view! {
                                        <StatCard
                                            label=capitalize_first_letter(key)
                                            value=Signal::derive(move || Some(value))
                                            format={ValueFormat::Decimal { decimals: 2 }}
                                            subtitle=Signal::derive(move || Some(tab.caption().to_string()))
                                        />
                                    }
                                })
                                .collect_view()
                        }}
                    </div>

                    {move || fetch_error.get().map(|e| view! {
                        <MessageBar intent=MessageBarIntent::Error>
                            <div class="message-bar__text">{e.to_string()}</div>
                            <Button size=ButtonSize::Small on_click=retry>
                                {icon("refresh")}
                                " Retry"
                            </Button>
                        </MessageBar>
                    })}

                    <div class=move || {
                        if is_refetching.get() {
                            "events-table events-table--refetching"
                        } else {
                            "events-table"
                        }
                    }>
                        <Table attr:style="width: 100%;">
                            <TableHeader>
                                <TableRow>
                                    {move || {
                                        columns
                                            .get()
                                            .into_iter()
                                            .map(|col| header_cell(col, state))
                                            .collect_view()
                                    }}
                                </TableRow>
                                <TableRow>
                                    {move || {
                                        columns
                                            .get()
                                            .into_iter()
                                            .map(|col| filter_cell(col, state))
                                            .collect_view()
                                    }}
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {move || {
                                    let cols = columns.get();
                                    let visible = rows.get();
                                    match body_state(is_fetching.get(), has_data_for_current.get(), visible.len()) {
                                        BodyState::Skeleton => skeleton_rows(cols.len()).into_any(),
                                        BodyState::NoResults => view! {
                                            <TableRow>
                                                <TableCell class="table__cell--empty" attr:colspan=cols.len().to_string()>
                                                    <TableCellLayout>"No Results"</TableCellLayout>
                                                </TableCell>
                                            </TableRow>
                                        }.into_any(),
                                        BodyState::Rows => {
                                            let name = category.get_value();
                                            visible
                                                .into_iter()
                                                .map(|record| event_row(&cols, &record, &name))
                                                .collect_view()
                                                .into_any()
                                        }
                                        BodyState::Blank => view! { <></> }.into_any(),
                                    }
                                }}
                            </TableBody>
                        </Table>
                    </div>

                    <PaginationControls
                        current_page=Signal::derive(move || state.with(|s| s.page_index))
                        total_pages=Signal::derive(move || state.with(|s| s.page_count()))
                        total_count=Signal::derive(move || state.with(|s| s.events_count))
                        page_size=Signal::derive(move || state.with(|s| s.page_size))
                        can_previous=Signal::derive(move || state.with(|s| s.can_previous(is_fetching.get())))
                        can_next=Signal::derive(move || state.with(|s| s.can_next(is_fetching.get())))
                        on_previous=Callback::new(move |_| {
                            let fetching = is_fetching.get_untracked();
                            state.update(|s| s.previous_page(fetching));
                        })
                        on_next=Callback::new(move |_| {
                            let fetching = is_fetching.get_untracked();
                            state.update(|s| s.next_page(fetching));
                        })
                        on_page_size_change=Callback::new(move |size| state.update(|s| s.set_page_size(size)))
                    />
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
fn TabBar(
    #[prop(into)] active_tab: Signal<TimeWindowTab>,
    on_select: Callback<TimeWindowTab>,
) -> impl IntoView {
    view! {
        <Flex gap=FlexGap::Small align=FlexAlign::Center style="margin-bottom: var(--spacing-md);">
            {TimeWindowTab::ALL
                .into_iter()
                .map(|tab| {
                    view! {
                        <Button
                            appearance=Signal::derive(move || {
                                if active_tab.get() == tab {
                                    ButtonAppearance::Primary
                                } else {
                                    ButtonAppearance::Subtle
                                }
                            })
                            size=ButtonSize::Small
                            on_click=move |_| on_select.run(tab)
                        >
                            {tab.label()}
                        </Button>
                    }
                })
                .collect_view()}
        </Flex>
    }
}

fn header_cell(col: ColumnDescriptor, state: RwSignal<state::EventListState>) -> impl IntoView {
    view! {
        <SortableHeaderCell
            label=col.label
            sort_field=col.key
            sortable=col.sortable
            current_sort_field=Signal::derive(move || {
                state.with(|s| s.sort.as_ref().map(|sort| sort.column.clone()))
            })
            sort_ascending=Signal::derive(move || {
                state.with(|s| s.sort.as_ref().map(|sort| sort.ascending).unwrap_or(true))
            })
            on_sort=Callback::new(move |field: String| state.update(|s| s.toggle_sort(&field)))
        />
    }
}

fn filter_cell(col: ColumnDescriptor, state: RwSignal<state::EventListState>) -> impl IntoView {
    let key_for_value = col.key.clone();
    let key_for_input = col.key;
    view! {
        <TableCell>
            <input
                class="table__filter-input"
                type="text"
                placeholder="Filter…"
                prop:value=move || state.with(|s| s.filter.get(&key_for_value).to_string())
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    state.update(|s| s.set_column_filter(&key_for_input, &text));
                }
            />
        </TableCell>
    }
}

fn skeleton_rows(column_count: usize) -> impl IntoView {
    (0..SKELETON_ROWS)
        .map(|_| {
            view! {
                <TableRow>
                    {(0..column_count)
                        .map(|_| view! { <TableCell><div class="skeleton skeleton--cell"></div></TableCell> })
                        .collect_view()}
                </TableRow>
            }
        })
        .collect_view()
}

fn event_row(columns: &[ColumnDescriptor], record: &EventRecord, category: &str) -> impl IntoView {
    let cells = columns
        .iter()
        .map(|col| {
            if col.kind == ColumnKind::DeliveryStatus {
                let status = record.delivery_status;
                return view! {
                    <TableCell>
                        <TableCellLayout>
                            <DeliveryStatusBadge status=status />
                        </TableCellLayout>
                    </TableCell>
                }
                .into_any();
            }
            let text = col.cell_text(record, category);
            let is_number = match &col.kind {
                ColumnKind::Field(key) => record.field(key).map(|v| v.is_number()).unwrap_or(false),
                _ => false,
            };
            let class = if is_number { "table__cell--right" } else { "" };
            view! {
                <TableCell class=class>
                    <TableCellLayout>{text}</TableCellLayout>
                </TableCell>
            }
            .into_any()
        })
        .collect_view();

    view! { <TableRow>{cells}</TableRow> }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::fetch::PageQuery;
    use contracts::domain::a002_event::aggregate::PageResult;
    use contracts::shared::time_window::TimeWindowTab;

    fn query(page_index: u64, tab: TimeWindowTab) -> PageQuery {
        PageQuery {
            category: "sale".into(),
            page_index,
            page_size: 10,
            tab,
        }
    }

    fn state_of(o: &FetchOrchestrator, rows: usize) -> BodyState {
        body_state(o.is_fetching(), o.has_data_for_current(), rows)
    }

    #[test]
    fn test_skeleton_while_nothing_displayed() {
        assert_eq!(body_state(true, false, 0), BodyState::Skeleton);
    }

    #[test]
    fn test_empty_page_shows_no_results() {
        assert_eq!(body_state(false, true, 0), BodyState::NoResults);
    }

    #[test]
    fn test_same_identity_refetch_keeps_rows() {
        assert_eq!(body_state(true, true, 3), BodyState::Rows);
    }

    #[test]
    fn test_failed_first_fetch_is_blank() {
        assert_eq!(body_state(false, false, 0), BodyState::Blank);
    }

    #[test]
    fn test_skeleton_while_other_identity_loads() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, TimeWindowTab::Today));
        assert_eq!(state_of(&orchestrator, 0), BodyState::Skeleton);

        orchestrator.commit(
            query(0, TimeWindowTab::Today),
            Ok(PageResult {
                events: Vec::new(),
                events_count: 1,
            }),
        );
        assert_eq!(state_of(&orchestrator, 1), BodyState::Rows);

        // next page, then a tab switch: old rows must not stay on screen
        orchestrator.dispatch(query(1, TimeWindowTab::Today));
        assert_eq!(state_of(&orchestrator, 1), BodyState::Skeleton);
        orchestrator.dispatch(query(0, TimeWindowTab::Week));
        assert_eq!(state_of(&orchestrator, 1), BodyState::Skeleton);
        assert!(orchestrator.current_page().is_none());
    }

    #[test]
    fn test_failed_identity_stays_blank_after_redispatch() {
        let mut orchestrator = FetchOrchestrator::new(true);
        let q = query(0, TimeWindowTab::Month);
        orchestrator.dispatch(q.clone());
        orchestrator.commit(q.clone(), Err(FetchError::Status(500)));

        assert_eq!(orchestrator.dispatch(q), Dispatch::Failed);
        assert_eq!(state_of(&orchestrator, 0), BodyState::Blank);
    }
}
