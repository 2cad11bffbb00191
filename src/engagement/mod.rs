//! Per-movie list membership.
//!
//! A movie is on the watchlist, on the seenlist, or on neither. The two
//! remote lists are the source of truth; [`Membership`] is always derived
//! from them and never tracked independently.

pub mod machine;
pub mod membership;

pub use machine::{EngagementStateMachine, Refusal, Transition};
pub use membership::{classify, Membership, MovieLists};
