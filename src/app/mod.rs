//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the presentation layer (the terminal shell in
//! `main.rs`, or any other front end) and the session, search, engagement and
//! comment components. It implements an event-driven loop:
//!
//! ```text
//! User Input → Event → handle_event → component calls → Actions → Presentation
//!                 ↑                                                   │
//!                 └──────────── SearchEvent (background) ─────────────┘
//! ```
//!
//! Failures never escape [`handle_event`]; they come back as actions.
//!
//! # Modules
//!
//! - [`actions`]: Commands the presentation layer must carry out
//! - [`handler`]: Event processing and failure conversion
//! - [`modes`]: Screen and tab enums
//! - [`state`]: Central application state and per-screen view state

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::{failure_actions, Action, Notice, NoticeLevel};
pub use handler::{handle_event, Event};
pub use modes::{ProfileTab, Screen};
pub use state::{AppState, MovieDetail, ProfileView};
