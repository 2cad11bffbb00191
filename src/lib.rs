//! Cinelist: client core for a movie catalog.
//!
//! Cinelist owns the logic behind a movie-catalog app and leaves layout and
//! navigation chrome to whatever front end drives it:
//! - Session handling with a persisted bearer token
//! - Debounced search-as-you-type over the remote catalog
//! - Mutually exclusive "watch later" and "seen" lists per movie
//! - One rating/comment per user per movie
//! - Structured failure reporting, including forced re-login on expiry

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Presentation (main.rs terminal shell, or any UI)   │
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling, screen coordination              │
//! │  - Failure → action conversion                      │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌────────────────┐   ┌───────────────┐
//! │ search/       │   │ engagement/    │   │ comments/     │
//! │ - debounce    │   │ - membership   │   │ - partition   │
//! │ - stale guard │   │ - transitions  │   │ - submit gate │
//! └───────────────┘   └────────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  api/ (endpoint catalog, Transport, ApiClient)      │
//! │  session/ (SessionStore, account flows)             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  storage/ (token persistence)   domain/ (models,    │
//! │  infrastructure/ (paths)        errors)             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cinelist::{handle_event, initialize, Config, Event};
//!
//! # async fn run() -> cinelist::Result<()> {
//! let (mut state, mut search_events) = initialize(&Config::default())?;
//!
//! let (_render, actions) = handle_event(&mut state, Event::Restore).await;
//! for action in actions {
//!     println!("{action:?}");
//! }
//!
//! let (_render, _actions) = handle_event(&mut state, Event::QueryChanged("alien".into())).await;
//! if let Some(update) = search_events.recv().await {
//!     handle_event(&mut state, Event::SearchUpdate(update)).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod comments;
pub mod domain;
pub mod engagement;
pub mod infrastructure;
pub mod search;
pub mod session;
pub mod storage;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, Notice, NoticeLevel, ProfileTab, Screen};
pub use domain::{CinelistError, ErrorKind, Result};

use api::{ApiClient, HttpTransport};
use search::{SearchController, SearchEvent};
use serde::{Deserialize, Serialize};
use session::SessionStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use storage::JsonKeyValueStore;
use tokio::sync::mpsc;

/// Client configuration.
///
/// # Example
///
/// ```toml
/// api_url = "https://movies.example.com/api"
/// search_debounce_ms = 300
/// request_timeout_secs = 10
/// data_dir = "~/.local/share/cinelist"
/// log_level = "cinelist=debug"
/// trace_export = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is appended to. Default:
    /// `http://localhost:5000/api`
    pub api_url: String,

    /// Search quiet period in milliseconds. Default: `500`
    pub search_debounce_ms: u64,

    /// Per-request timeout in seconds. Default: `15`
    pub request_timeout_secs: u64,

    /// Where the session token and trace file live. Default: see
    /// [`infrastructure::get_data_dir`].
    pub data_dir: Option<PathBuf>,

    /// `EnvFilter` directive used when `RUST_LOG` is unset. Default: `"info"`
    pub log_level: Option<String>,

    /// Export spans as OTLP JSON to the data directory. Default: `false`
    pub trace_export: bool,
}

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: None,
            log_level: None,
            trace_export: false,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// Unknown keys are ignored and unparsable values fall back to their
    /// defaults. Recognized keys match the field names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use cinelist::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://movies.example.com/api".to_string());
    /// map.insert("search_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_url, "https://movies.example.com/api");
    /// assert_eq!(config.search_debounce_ms, 500);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            api_url: non_empty("api_url").map_or(defaults.api_url, str::to_string),
            search_debounce_ms: non_empty("search_debounce_ms")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_debounce_ms),
            request_timeout_secs: non_empty("request_timeout_secs")
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.request_timeout_secs),
            data_dir: non_empty("data_dir").map(|v| PathBuf::from(infrastructure::expand_tilde(v))),
            log_level: non_empty("log_level").map(str::to_string),
            trace_export: non_empty("trace_export").is_some_and(|v| {
                matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
            }),
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CinelistError::Config`] for malformed TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(source).map_err(|e| CinelistError::Config(format!("invalid config: {e}")))?;
        if let Some(dir) = config.data_dir.take() {
            config.data_dir = Some(PathBuf::from(infrastructure::expand_tilde(&dir.to_string_lossy())));
        }
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// I/O errors reading the file, or the errors of [`Config::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Effective data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(infrastructure::get_data_dir)
    }

    #[must_use]
    pub const fn search_quiet_period(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builds the application state from configuration.
///
/// Opens the token store in the data directory, builds the HTTP transport and
/// the search controller, and returns the receiver the caller must drain into
/// [`Event::SearchUpdate`]. Does not contact the server; send
/// [`Event::Restore`] for that.
///
/// Must be called inside a tokio runtime.
///
/// # Errors
///
/// Fails if the token store cannot be opened or the HTTP client cannot be
/// built.
pub fn initialize(config: &Config) -> Result<(AppState, mpsc::UnboundedReceiver<SearchEvent>)> {
    tracing::debug!(api_url = %config.api_url, "initializing cinelist");

    let store = JsonKeyValueStore::open(infrastructure::session_file(&config.data_dir()))?;
    let session = SessionStore::persistent(store);
    let transport = HttpTransport::new(&config.api_url, config.request_timeout())?;

    Ok(assemble(ApiClient::new(Arc::new(transport), session), config.search_quiet_period()))
}

/// Wires an [`AppState`] around an existing client.
///
/// Useful with a custom [`Transport`](api::Transport) or session store.
pub fn assemble(api: ApiClient, quiet_period: Duration) -> (AppState, mpsc::UnboundedReceiver<SearchEvent>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let search = SearchController::new(api.clone(), quiet_period, events_tx);
    (AppState::new(api, search), events_rx)
}
