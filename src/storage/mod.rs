//! Storage layer for the persisted session token.
//!
//! The client persists exactly one value, the opaque session token, through a
//! small key-value contract. Everything else is re-fetched from the server.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait abstraction
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: In-process implementation for tests and ephemeral sessions

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::{KeyValueStore, TOKEN_KEY};
pub use json::JsonKeyValueStore;
pub use memory::MemoryStore;
