//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where cinelist keeps its token file and trace exports, and expands
//! user-supplied paths from configuration.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, session_file, trace_file};
