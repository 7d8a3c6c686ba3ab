use std::collections::BTreeMap;

use contracts::domain::a002_event::aggregate::EventRecord;
use contracts::shared::page_params::{page_count, PageParams, MAX_PAGE_SIZE};
use contracts::shared::time_window::TimeWindowTab;
use leptos::prelude::*;

use super::columns::ColumnDescriptor;
use super::fetch::PageQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub ascending: bool,
}

/// Case-insensitive substring filter per column key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    filters: BTreeMap<String, String>,
}

impl FilterSpec {
    pub fn get(&self, column: &str) -> &str {
        self.filters.get(column).map(String::as_str).unwrap_or("")
    }

    /// Empty text removes the filter.
    pub fn set(&mut self, column: &str, text: &str) {
        if text.trim().is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_string(), text.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn matches(&self, record: &EventRecord, columns: &[ColumnDescriptor], category: &str) -> bool {
        self.filters.iter().all(|(key, needle)| {
            match columns.iter().find(|c| &c.key == key) {
                Some(column) => column
                    .cell_text(record, category)
                    .to_lowercase()
                    .contains(&needle.trim().to_lowercase()),
                // фильтр по колонке, которой нет на текущей странице, не применяется
                None => true,
            }
        })
    }
}

#[derive(Clone, Debug)]
pub struct EventListState {
    /// Zero-based
    pub page_index: u64,
    pub page_size: u64,
    pub sort: Option<SortSpec>,
    pub filter: FilterSpec,
    pub active_tab: TimeWindowTab,
    /// Last eventsCount declared by the server
    pub events_count: u64,
}

impl Default for EventListState {
    fn default() -> Self {
        Self::from_params(PageParams::default())
    }
}

impl EventListState {
    pub fn from_params(params: PageParams) -> Self {
        Self {
            page_index: params.page_index(),
            page_size: params.limit.clamp(1, MAX_PAGE_SIZE),
            sort: None,
            filter: FilterSpec::default(),
            active_tab: TimeWindowTab::default(),
            events_count: 0,
        }
    }

    pub fn page_query(&self, category: &str) -> PageQuery {
        PageQuery {
            category: category.to_string(),
            page_index: self.page_index,
            page_size: self.page_size,
            tab: self.active_tab,
        }
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.events_count, self.page_size)
    }

    pub fn can_next(&self, is_fetching: bool) -> bool {
        !is_fetching && self.page_index + 1 < self.page_count()
    }

    pub fn can_previous(&self, is_fetching: bool) -> bool {
        !is_fetching && self.page_index > 0
    }

    /// No-op past the last page or while fetching.
    pub fn next_page(&mut self, is_fetching: bool) {
        if self.can_next(is_fetching) {
            self.page_index += 1;
        }
    }

    pub fn previous_page(&mut self, is_fetching: bool) {
        if self.can_previous(is_fetching) {
            self.page_index -= 1;
        }
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Header click: same column flips direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        let next = match &self.sort {
            Some(current) if current.column == column => SortSpec {
                column: column.to_string(),
                ascending: !current.ascending,
            },
            _ => SortSpec {
                column: column.to_string(),
                ascending: true,
            },
        };
        self.set_sort(Some(next));
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    pub fn set_column_filter(&mut self, column: &str, text: &str) {
        self.filter.set(column, text);
    }

    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.page_index = 0;
    }

    /// Смена вкладки меняет окно на сервере, поэтому возвращаемся на первую страницу
    pub fn set_tab(&mut self, tab: TimeWindowTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.page_index = 0;
        }
    }

    pub fn set_events_count(&mut self, events_count: u64) {
        self.events_count = events_count;
    }

    /// Rows to render: current page filtered, then sorted. Server order is kept
    /// when no sort is set.
    pub fn apply_view(
        &self,
        events: &[EventRecord],
        columns: &[ColumnDescriptor],
        category: &str,
    ) -> Vec<EventRecord> {
        let mut rows: Vec<EventRecord> = events
            .iter()
            .filter(|e| self.filter.matches(e, columns, category))
            .cloned()
            .collect();

        if let Some(sort) = &self.sort {
            if let Some(column) = columns.iter().find(|c| c.key == sort.column && c.sortable) {
                rows.sort_by(|a, b| {
                    let cmp = column.compare(a, b);
                    if sort.ascending {
                        cmp
                    } else {
                        cmp.reverse()
                    }
                });
            }
        }

        rows
    }
}

// Create state within component scope instead of thread-local
// This ensures state is properly disposed when component unmounts
pub fn create_state(params: PageParams) -> RwSignal<EventListState> {
    RwSignal::new(EventListState::from_params(params))
}
