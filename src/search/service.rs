use futures::stream::{self, BoxStream};
use futures::{StreamExt, future};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::content::{ContentStore, ModuleSnapshot};
use crate::search::config::{SEARCHING_EVENTS_CAPACITY, SearchConfig};
use crate::search::debounce::spawn_debounced;
use crate::search::executor;
use crate::search::filter::available_filters;
use crate::search::suggest::get_suggestions;
use crate::search::types::{FilterOptions, FilterUpdate, SearchFilters, SearchResult};
use crate::util::{broadcast_stream, watch_stream};

/// Shared list of results from one search execution
pub type SearchResults = Arc<Vec<SearchResult>>;

/// Searching state. The watch holds the current value; the broadcast
/// delivers every transition, even when two happen back to back.
#[derive(Debug, Clone)]
struct SearchingFlag {
    state: Arc<watch::Sender<bool>>,
    events: broadcast::Sender<bool>,
}

impl SearchingFlag {
    fn new() -> Self {
        let (state, _) = watch::channel(false);
        let (events, _) = broadcast::channel(SEARCHING_EVENTS_CAPACITY);
        Self {
            state: Arc::new(state),
            events,
        }
    }

    fn set(&self, searching: bool) {
        self.state.send_replace(searching);
        // no subscribers is fine
        let _ = self.events.send(searching);
    }
}

/// Reactive search over a [`ContentStore`].
///
/// Combines the debounced query, the filter set and the latest content
/// snapshot; any change to one of them recomputes the results from scratch.
/// Background tasks stop when the service is dropped.
#[derive(Debug)]
pub struct SearchService {
    store: ContentStore,
    config: Arc<SearchConfig>,
    query: watch::Sender<String>,
    filters: watch::Sender<SearchFilters>,
    results: watch::Receiver<SearchResults>,
    searching: SearchingFlag,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SearchService {
    /// Create the service and spawn its background tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: ContentStore, config: SearchConfig) -> Self {
        let config = Arc::new(config);
        let shutdown = CancellationToken::new();
        let searching = SearchingFlag::new();

        let (query, query_rx) = watch::channel(String::new());
        let (filters, filters_rx) = watch::channel(SearchFilters::default());
        let (results_tx, results) = watch::channel(SearchResults::default());

        let (debounced_query, debounce_task) =
            spawn_debounced(query_rx, config.debounce(), shutdown.clone());

        let search_loop = SearchLoop {
            query: debounced_query,
            filters: filters_rx,
            modules: store.subscribe(),
            results: results_tx,
            searching: searching.clone(),
            config: config.clone(),
            shutdown: shutdown.clone(),
        };
        let search_task = tokio::spawn(search_loop.run());

        tracing::info!(
            "Search service started (debounce {}ms, limit {})",
            config.debounce_ms,
            config.max_results
        );

        Self {
            store,
            config,
            query,
            filters,
            results,
            searching,
            shutdown,
            tasks: vec![debounce_task, search_task],
        }
    }

    /// Update the query. Consecutive duplicates are ignored.
    pub fn set_search_query(&self, query: &str) {
        self.query.send_if_modified(|current| {
            if current == query {
                false
            } else {
                query.clone_into(current);
                true
            }
        });
    }

    /// Apply a filter update to the current set, key by key
    pub fn set_search_filters(&self, update: impl Into<FilterUpdate>) {
        let update = update.into();
        self.filters.send_modify(|current| current.merge(update));
    }

    /// Reset the filter set
    pub fn clear_search_filters(&self) {
        self.filters.send_replace(SearchFilters::default());
    }

    /// Get the current query
    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// Get the current filter set
    pub fn filters(&self) -> SearchFilters {
        self.filters.borrow().clone()
    }

    /// Subscribe to result changes
    pub fn results(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }

    /// Get the latest results
    pub fn current_results(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Stream of results, starting with the current list
    pub fn results_stream(&self) -> BoxStream<'static, SearchResults> {
        watch_stream(self.results.clone())
    }

    /// Check if a search is running
    pub fn is_searching(&self) -> bool {
        *self.searching.state.borrow()
    }

    /// Stream of searching states, starting with the current one and then
    /// every transition
    pub fn searching_stream(&self) -> BoxStream<'static, bool> {
        let transitions = broadcast_stream(self.searching.events.subscribe());
        stream::once(future::ready(self.is_searching()))
            .chain(transitions)
            .boxed()
    }

    /// Stream of filter options, recomputed for every content snapshot
    pub fn available_filters(&self) -> BoxStream<'static, FilterOptions> {
        watch_stream(self.store.subscribe())
            .map(|modules| available_filters(&modules))
            .boxed()
    }

    /// Filter options for the current snapshot
    pub fn current_filter_options(&self) -> FilterOptions {
        available_filters(&self.store.snapshot())
    }

    /// Stream of suggestions for `partial_query`, recomputed for every content snapshot
    pub fn search_suggestions(&self, partial_query: &str) -> BoxStream<'static, Vec<String>> {
        let partial_query = partial_query.to_string();
        let limit = self.config.max_suggestions;
        watch_stream(self.store.subscribe())
            .map(move |modules| get_suggestions(&partial_query, &modules, limit))
            .boxed()
    }

    /// Suggestions for `partial_query` against the current snapshot
    pub fn suggest(&self, partial_query: &str) -> Vec<String> {
        get_suggestions(
            partial_query,
            &self.store.snapshot(),
            self.config.max_suggestions,
        )
    }

    /// Get the content store this service searches
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Get the active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Drop for SearchService {
    fn drop(&mut self) {
        self.shutdown.cancel();
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// The combinator task: recomputes on any input change
struct SearchLoop {
    query: watch::Receiver<String>,
    filters: watch::Receiver<SearchFilters>,
    modules: watch::Receiver<ModuleSnapshot>,
    results: watch::Sender<SearchResults>,
    searching: SearchingFlag,
    config: Arc<SearchConfig>,
    shutdown: CancellationToken,
}

impl SearchLoop {
    async fn run(mut self) {
        loop {
            let trigger = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                changed = self.query.changed() => changed.map(|_| "query"),
                changed = self.filters.changed() => changed.map(|_| "filters"),
                changed = self.modules.changed() => changed.map(|_| "content"),
            };
            let Ok(trigger) = trigger else {
                tracing::debug!("Search input closed, stopping search loop");
                break;
            };

            // Mark every input as seen so one change never triggers two runs
            let query = self.query.borrow_and_update().clone();
            let filters = self.filters.borrow_and_update().clone();
            let modules = self.modules.borrow_and_update().clone();

            tracing::trace!("Recomputing search results after {} change", trigger);
            let results = self.compute(&query, &filters, &modules);

            if self.results.send(Arc::new(results)).is_err() {
                break;
            }
        }
    }

    fn compute(
        &self,
        query: &str,
        filters: &SearchFilters,
        modules: &ModuleSnapshot,
    ) -> Vec<SearchResult> {
        if executor::is_blank_search(query, filters) {
            return Vec::new();
        }

        self.searching.set(true);
        let results = executor::execute(query, filters, modules, &self.config);
        self.searching.set(false);
        results
    }
}
