//! Comment thread loading and submission gating.

pub mod reconciler;

pub use reconciler::{CommentReconciler, CommentThread};
