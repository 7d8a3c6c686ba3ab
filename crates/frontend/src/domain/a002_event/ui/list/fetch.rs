//! Two-stage fetch of the event table.
//!
//! An existence flag gates the paginated query: while the category has no
//! events nothing is requested. Each page request is identified by
//! [`PageQuery`]; results are memoized per identity and only the response for
//! the current identity is ever displayed.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use contracts::domain::a002_event::aggregate::{EventPageRequest, PageResult};
use contracts::shared::time_window::TimeWindowTab;

use crate::shared::api_utils::FetchError;

pub const EXISTENCE_POLL_INTERVAL_MS: u32 = 30_000;

/// Identity of one page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub category: String,
    /// Zero-based
    pub page_index: u64,
    pub page_size: u64,
    pub tab: TimeWindowTab,
}

impl PageQuery {
    /// 1-based page number sent to the server.
    pub fn page_number(&self) -> u64 {
        self.page_index + 1
    }

    pub fn to_request(&self) -> EventPageRequest {
        EventPageRequest {
            page: self.page_number(),
            limit: self.page_size,
            time_range: self.tab,
        }
    }
}

/// Memoizing cache keyed by identity.
#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> QueryCache<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the caller has to do after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Category has no events; no request.
    Disabled,
    /// Served from cache and displayed.
    CacheHit,
    /// Same identity already in flight.
    Pending,
    /// Last fetch of this identity failed; only `retry()` re-issues it.
    Failed,
    /// Caller must issue the request.
    Issue(PageQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Displayed,
    Failed,
    /// Identity changed while the request was in flight; cached, not shown.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOrchestrator {
    has_events: bool,
    current: Option<PageQuery>,
    cache: QueryCache<PageQuery, Arc<PageResult>>,
    in_flight: HashSet<PageQuery>,
    displayed: Option<(PageQuery, Arc<PageResult>)>,
    error: Option<FetchError>,
}

impl FetchOrchestrator {
    pub fn new(has_events: bool) -> Self {
        Self {
            has_events,
            ..Default::default()
        }
    }

    pub fn has_events(&self) -> bool {
        self.has_events
    }

    /// Returns true on a false→true flip. The cache and any error are dropped
    /// then, since pages read while the category was empty are outdated.
    pub fn set_has_events(&mut self, has_events: bool) -> bool {
        let unlocked = !self.has_events && has_events;
        if unlocked {
            self.invalidate();
            self.error = None;
        }
        self.has_events = has_events;
        unlocked
    }

    /// Makes `query` the current identity.
    pub fn dispatch(&mut self, query: PageQuery) -> Dispatch {
        let same = self.current.as_ref() == Some(&query);
        if !same {
            self.error = None;
        }
        self.current = Some(query.clone());

        if !self.has_events {
            return Dispatch::Disabled;
        }
        if same && self.error.is_some() {
            return Dispatch::Failed;
        }
        if let Some(page) = self.cache.get(&query) {
            self.displayed = Some((query, page));
            return Dispatch::CacheHit;
        }
        if self.in_flight.contains(&query) {
            return Dispatch::Pending;
        }
        self.in_flight.insert(query.clone());
        Dispatch::Issue(query)
    }

    pub fn commit(&mut self, query: PageQuery, result: Result<PageResult, FetchError>) -> CommitOutcome {
        self.in_flight.remove(&query);
        let is_current = self.current.as_ref() == Some(&query);

        match result {
            Ok(page) => {
                let page = Arc::new(page);
                self.cache.insert(query.clone(), page.clone());
                if is_current {
                    self.displayed = Some((query, page));
                    self.error = None;
                    CommitOutcome::Displayed
                } else {
                    CommitOutcome::Stale
                }
            }
            Err(e) => {
                if is_current {
                    self.error = Some(e);
                    CommitOutcome::Failed
                } else {
                    CommitOutcome::Stale
                }
            }
        }
    }

    /// Re-issues the current identity after a failure.
    pub fn retry(&mut self) -> Dispatch {
        match self.current.clone() {
            Some(query) if self.error.is_some() => {
                self.error = None;
                self.dispatch(query)
            }
            _ => Dispatch::Pending,
        }
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn current(&self) -> Option<&PageQuery> {
        self.current.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.current
            .as_ref()
            .map(|q| self.in_flight.contains(q))
            .unwrap_or(false)
    }

    /// In flight with nothing on screen yet.
    pub fn is_initial_loading(&self) -> bool {
        self.is_fetching() && self.displayed.is_none()
    }

    /// In flight while an older page stays on screen.
    pub fn is_refetching(&self) -> bool {
        self.is_fetching() && self.displayed.is_some()
    }

    pub fn displayed_page(&self) -> Option<Arc<PageResult>> {
        self.displayed.as_ref().map(|(_, page)| page.clone())
    }

    /// The page on screen belongs to the current identity.
    pub fn has_data_for_current(&self) -> bool {
        match (&self.displayed, &self.current) {
            (Some((shown, _)), Some(current)) => shown == current,
            _ => false,
        }
    }

    /// Displayed page, only if it belongs to the current identity.
    pub fn current_page(&self) -> Option<Arc<PageResult>> {
        if self.has_data_for_current() {
            self.displayed_page()
        } else {
            None
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page_index: u64, page_size: u64) -> PageQuery {
        PageQuery {
            category: "sale".into(),
            page_index,
            page_size,
            tab: TimeWindowTab::Today,
        }
    }

    fn page(count: u64) -> PageResult {
        PageResult {
            events: Vec::new(),
            events_count: count,
        }
    }

    #[test]
    fn test_page_number_is_one_based() {
        let request = query(0, 30).to_request();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 30);
        assert_eq!(request.time_range, TimeWindowTab::Today);
    }

    #[test]
    fn test_any_component_changes_identity() {
        let base = query(0, 10);
        assert_ne!(base, query(0, 30));
        assert_ne!(base, query(1, 10));
        assert_ne!(
            base,
            PageQuery {
                tab: TimeWindowTab::Week,
                ..base.clone()
            }
        );
        assert_ne!(
            base,
            PageQuery {
                category: "signup".into(),
                ..base.clone()
            }
        );
        assert_eq!(base, query(0, 10));
    }

    #[test]
    fn test_gated_until_events_exist() {
        let mut orchestrator = FetchOrchestrator::new(false);
        for i in 0..3 {
            assert_eq!(orchestrator.dispatch(query(i, 10)), Dispatch::Disabled);
        }
        assert_eq!(orchestrator.dispatch(query(0, 50)), Dispatch::Disabled);
        assert!(!orchestrator.is_fetching());

        assert!(orchestrator.set_has_events(true));
        assert_eq!(
            orchestrator.dispatch(query(0, 50)),
            Dispatch::Issue(query(0, 50))
        );
    }

    #[test]
    fn test_unchanged_identity_fetches_once() {
        let mut orchestrator = FetchOrchestrator::new(true);
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Issue(query(0, 10)));
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Pending);

        orchestrator.commit(query(0, 10), Ok(page(25)));
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::CacheHit);
        assert_eq!(orchestrator.dispatch(query(0, 30)), Dispatch::Issue(query(0, 30)));
    }

    #[test]
    fn test_loading_flags() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        assert!(orchestrator.is_initial_loading());
        assert!(!orchestrator.is_refetching());

        orchestrator.commit(query(0, 10), Ok(page(25)));
        assert!(!orchestrator.is_fetching());

        orchestrator.dispatch(query(1, 10));
        assert!(orchestrator.is_refetching());
        assert!(!orchestrator.is_initial_loading());
        // older page stays displayed
        assert_eq!(orchestrator.displayed_page().map(|p| p.events_count), Some(25));
    }

    #[test]
    fn test_stale_response_is_cached_not_displayed() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.dispatch(query(1, 10));

        let outcome = orchestrator.commit(query(0, 10), Ok(page(11)));
        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(orchestrator.displayed_page().is_none());
        assert_eq!(orchestrator.cached_pages(), 1);

        let outcome = orchestrator.commit(query(1, 10), Ok(page(12)));
        assert_eq!(outcome, CommitOutcome::Displayed);
        assert_eq!(orchestrator.displayed_page().map(|p| p.events_count), Some(12));

        // going back is a cache hit
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::CacheHit);
        assert_eq!(orchestrator.displayed_page().map(|p| p.events_count), Some(11));
    }

    #[test]
    fn test_stale_error_is_ignored() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.dispatch(query(1, 10));
        let outcome = orchestrator.commit(query(0, 10), Err(FetchError::Status(500)));
        assert_eq!(outcome, CommitOutcome::Stale);
        assert!(orchestrator.error().is_none());
    }

    #[test]
    fn test_retry_reissues_same_identity() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(2, 10));
        let outcome = orchestrator.commit(query(2, 10), Err(FetchError::Network("offline".into())));
        assert_eq!(outcome, CommitOutcome::Failed);
        assert_eq!(
            orchestrator.error(),
            Some(&FetchError::Network("offline".into()))
        );

        assert_eq!(orchestrator.retry(), Dispatch::Issue(query(2, 10)));
        assert!(orchestrator.error().is_none());
        assert!(orchestrator.is_fetching());
    }

    #[test]
    fn test_failed_identity_is_not_refetched_on_redispatch() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.commit(query(0, 10), Err(FetchError::Status(500)));

        // existence poll re-sets an unchanged flag, the effect re-runs
        assert!(!orchestrator.set_has_events(true));
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Failed);
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Failed);
        assert!(!orchestrator.is_fetching());
        assert_eq!(orchestrator.error(), Some(&FetchError::Status(500)));

        assert_eq!(orchestrator.retry(), Dispatch::Issue(query(0, 10)));
    }

    #[test]
    fn test_new_identity_after_failure_is_fetched() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.commit(query(0, 10), Err(FetchError::Status(502)));

        assert_eq!(orchestrator.dispatch(query(1, 10)), Dispatch::Issue(query(1, 10)));
        assert!(orchestrator.error().is_none());
    }

    #[test]
    fn test_data_for_current_follows_identity() {
        let mut orchestrator = FetchOrchestrator::new(true);
        assert!(!orchestrator.has_data_for_current());

        orchestrator.dispatch(query(0, 10));
        orchestrator.commit(query(0, 10), Ok(page(25)));
        assert!(orchestrator.has_data_for_current());
        assert_eq!(orchestrator.current_page().map(|p| p.events_count), Some(25));

        orchestrator.dispatch(query(1, 10));
        assert!(!orchestrator.has_data_for_current());
        assert!(orchestrator.current_page().is_none());
        assert!(orchestrator.displayed_page().is_some());

        orchestrator.commit(query(1, 10), Ok(page(25)));
        assert!(orchestrator.has_data_for_current());
    }

    #[test]
    fn test_retry_without_error_does_nothing() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.commit(query(0, 10), Ok(page(1)));
        assert_eq!(orchestrator.retry(), Dispatch::Pending);
    }

    #[test]
    fn test_flip_to_true_invalidates_cache() {
        let mut orchestrator = FetchOrchestrator::new(true);
        orchestrator.dispatch(query(0, 10));
        orchestrator.commit(query(0, 10), Ok(page(0)));
        assert_eq!(orchestrator.cached_pages(), 1);

        assert!(!orchestrator.set_has_events(false));
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Disabled);
        assert!(orchestrator.set_has_events(true));
        assert_eq!(orchestrator.cached_pages(), 0);
        assert_eq!(orchestrator.dispatch(query(0, 10)), Dispatch::Issue(query(0, 10)));
    }

    #[test]
    fn test_query_cache() {
        let mut cache: QueryCache<PageQuery, u32> = QueryCache::default();
        assert!(cache.is_empty());
        cache.insert(query(0, 10), 1);
        assert!(cache.contains(&query(0, 10)));
        assert_eq!(cache.get(&query(0, 10)), Some(1));
        assert_eq!(cache.get(&query(0, 30)), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
