//! Authenticated session state.
//!
//! [`SessionStore`] holds the token and cached profile for the whole process;
//! [`auth`] implements the account flows that populate and clear it.

pub mod auth;
pub mod store;

pub use auth::{login, logout, register, restore, RegisterOutcome};
pub use store::SessionStore;
