//! Debounced catalog search.

pub mod controller;
pub mod debounce;

pub use controller::{SearchController, SearchEvent, SearchQuery, SearchState};
pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
