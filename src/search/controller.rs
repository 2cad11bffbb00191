//! Search-as-you-type over the remote catalog.
//!
//! The controller owns the visible search state. Keystrokes update
//! `query_text` immediately and re-arm a [`Debouncer`]; when the quiet period
//! elapses one fetch is dispatched with the trimmed text, or the default
//! listing when the text is blank. Progress is reported on an unbounded
//! channel of [`SearchEvent`]s so the application loop can re-render.
//!
//! Responses can arrive out of order. Every dispatched fetch takes a sequence
//! number and a response is applied only if no later fetch was dispatched in
//! the meantime.

use super::debounce::Debouncer;
use crate::api::ApiClient;
use crate::domain::Movie;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

/// What a dispatched fetch asks the server for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Blank input: the default catalog listing.
    Default,
    /// Non-blank input, trimmed.
    Text(String),
}

impl SearchQuery {
    /// Classifies raw input.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelist::search::SearchQuery;
    ///
    /// assert_eq!(SearchQuery::from_input("   "), SearchQuery::Default);
    /// assert_eq!(SearchQuery::from_input(" heat "), SearchQuery::Text("heat".into()));
    /// ```
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::Default
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

/// Visible search state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Raw input exactly as typed.
    pub query_text: String,
    pub results: Vec<Movie>,
    pub is_loading: bool,
}

/// Progress notifications emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// A fetch was dispatched.
    Loading { query: SearchQuery },
    /// Results were replaced.
    Loaded { query: SearchQuery, count: usize },
    /// The fetch failed; previous results are still shown.
    Failed { query: SearchQuery, message: String },
}

#[derive(Clone)]
struct FetchContext {
    api: ApiClient,
    state: Arc<Mutex<SearchState>>,
    sequence: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl FetchContext {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SearchEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("search event receiver dropped");
        }
    }

    async fn run(self, query: SearchQuery) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(seq, ?query, "search dispatched");

        self.lock().is_loading = true;
        self.emit(SearchEvent::Loading { query: query.clone() });

        let result = match &query {
            SearchQuery::Default => self.api.popular_movies().await,
            SearchQuery::Text(text) => self.api.search_movies(text).await,
        };

        if self.sequence.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "discarding stale search response");
            return;
        }

        let event = {
            let mut state = self.lock();
            state.is_loading = false;
            match result {
                Ok(movies) => {
                    let count = movies.len();
                    state.results = movies;
                    SearchEvent::Loaded { query, count }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search failed");
                    SearchEvent::Failed {
                        query,
                        message: e.to_string(),
                    }
                }
            }
        };
        self.emit(event);
    }
}

/// Debounced search controller.
///
/// Dropping the controller cancels a pending timer; a fetch already in flight
/// still completes and updates the shared state.
pub struct SearchController {
    ctx: FetchContext,
    debouncer: Debouncer,
}

impl SearchController {
    /// Must be created inside a tokio runtime.
    #[must_use]
    pub fn new(
        api: ApiClient,
        quiet_period: Duration,
        events: mpsc::UnboundedSender<SearchEvent>,
    ) -> Self {
        Self {
            ctx: FetchContext {
                api,
                state: Arc::new(Mutex::new(SearchState::default())),
                sequence: Arc::new(AtomicU64::new(0)),
                events,
            },
            debouncer: Debouncer::new(quiet_period),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.ctx.lock().clone()
    }

    /// Records the new input and re-arms the debounce timer.
    pub fn on_text_changed(&mut self, text: &str) {
        self.ctx.lock().query_text = text.to_string();
        let fetch = self.fetch(SearchQuery::from_input(text));
        self.debouncer.schedule(fetch);
    }

    /// Loads the default listing immediately, bypassing the debounce.
    pub async fn load_default(&self) {
        self.fetch(SearchQuery::Default).await;
    }

    /// Cancels a pending debounced dispatch. Returns whether one was waiting.
    pub fn cancel_pending(&mut self) -> bool {
        self.debouncer.cancel_pending()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn fetch(&self, query: SearchQuery) -> impl Future<Output = ()> + Send + 'static {
        self.ctx.clone().run(query)
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("state", &self.state())
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
