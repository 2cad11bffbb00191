//! Membership transitions for one movie.
//!
//! ```text
//!            toggle_watchlist            mark_seen
//!   None  ───────────────────▶ Watchlist ─────────▶ Seen
//!    ▲ │   ◀───────────────────                       ▲
//!    │ │      toggle_watchlist                        │
//!    │ └──────────────────────────────────────────────┘
//!    │                 mark_seen
//! ```
//!
//! `Seen` is terminal: toggling the watchlist from it is refused and marking
//! it seen again is a no-op. A movie without an internal id cannot be listed;
//! both transitions are refused for it before any request. After every mutation both lists are re-fetched
//! and the membership is recomputed from them.

use super::membership::{Membership, MovieLists};
use crate::api::ApiClient;
use crate::domain::error::{CinelistError, Result};
use futures_util::future::try_join;

/// Business-rule refusals. Not errors: nothing failed, nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Seen movies cannot go back to the watchlist.
    AlreadySeen,
    /// The movie has no internal id, so no list can reference it.
    NotInCatalog,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadySeen => f.write_str("this movie is already marked as seen"),
            Self::NotInCatalog => f.write_str("this movie is not in the catalog yet"),
        }
    }
}

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Mutations went through; `to` is the re-fetched membership.
    Applied { from: Membership, to: Membership },
    /// Refused without touching the network.
    Refused(Refusal),
    /// Already in the requested state; no calls were made.
    Unchanged(Membership),
}

/// List membership of a single movie.
#[derive(Debug)]
pub struct EngagementStateMachine {
    api: ApiClient,
    movie_id: String,
    lists: Option<MovieLists>,
}

impl EngagementStateMachine {
    #[must_use]
    pub fn new(api: ApiClient, movie_id: impl Into<String>) -> Self {
        Self {
            api,
            movie_id: movie_id.into(),
            lists: None,
        }
    }

    /// Last reconciled membership, `None` before the first load.
    #[must_use]
    pub fn membership(&self) -> Membership {
        self.lists
            .as_ref()
            .map_or(Membership::None, |lists| lists.membership_of(&self.movie_id))
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.lists.is_some()
    }

    /// Fetches both lists concurrently and classifies the movie.
    ///
    /// On failure the previous lists are kept.
    ///
    /// # Errors
    ///
    /// The first failure of either fetch.
    pub async fn load(&mut self) -> Result<Membership> {
        let (watchlist, seenlist) = try_join(self.api.watchlist(), self.api.seenlist()).await?;
        self.lists = Some(MovieLists { watchlist, seenlist });

        let membership = self.membership();
        tracing::debug!(movie_id = %self.movie_id, %membership, "memberships loaded");
        Ok(membership)
    }

    /// Adds the movie to the watchlist, or removes it if already there.
    ///
    /// # Errors
    ///
    /// A failed mutation leaves the state untouched. A failed re-fetch after a
    /// successful mutation is returned as is and the stale lists are kept.
    pub async fn toggle_watchlist(&mut self) -> Result<Transition> {
        if let Some(refused) = self.uncataloged() {
            return Ok(refused);
        }
        let from = self.current().await?;
        match from {
            Membership::Seen => {
                tracing::debug!(movie_id = %self.movie_id, "watchlist toggle refused, already seen");
                return Ok(Transition::Refused(Refusal::AlreadySeen));
            }
            Membership::None => self.api.add_to_watchlist(&self.movie_id).await?,
            Membership::Watchlist => self.api.remove_from_watchlist(&self.movie_id).await?,
        }

        let to = self.load().await?;
        tracing::info!(movie_id = %self.movie_id, %from, %to, "watchlist toggled");
        Ok(Transition::Applied { from, to })
    }

    /// Moves the movie to the seenlist, taking it off the watchlist first.
    ///
    /// # Errors
    ///
    /// - [`CinelistError::PartialFailure`] when the watchlist removal went
    ///   through but the seenlist add did not; the lists are re-fetched first
    ///   and nothing is rolled back
    /// - [`CinelistError::AuthExpired`] from either step
    /// - any other failure of the first step or of the final re-fetch
    pub async fn mark_seen(&mut self) -> Result<Transition> {
        if let Some(refused) = self.uncataloged() {
            return Ok(refused);
        }
        let from = self.current().await?;
        match from {
            Membership::Seen => return Ok(Transition::Unchanged(Membership::Seen)),
            Membership::None => self.api.add_to_seenlist(&self.movie_id).await?,
            Membership::Watchlist => {
                self.api.remove_from_watchlist(&self.movie_id).await?;
                if let Err(e) = self.api.add_to_seenlist(&self.movie_id).await {
                    return Err(self.partial_failure(e).await);
                }
            }
        }

        let to = self.load().await?;
        tracing::info!(movie_id = %self.movie_id, %from, %to, "marked as seen");
        Ok(Transition::Applied { from, to })
    }

    fn uncataloged(&self) -> Option<Transition> {
        if !self.movie_id.is_empty() {
            return None;
        }
        tracing::debug!("list change refused, movie has no internal id");
        Some(Transition::Refused(Refusal::NotInCatalog))
    }

    async fn current(&mut self) -> Result<Membership> {
        if self.is_loaded() {
            Ok(self.membership())
        } else {
            self.load().await
        }
    }

    async fn partial_failure(&mut self, cause: CinelistError) -> CinelistError {
        if cause.is_auth_expired() {
            return cause;
        }
        tracing::warn!(movie_id = %self.movie_id, error = %cause, "seenlist add failed after watchlist removal");
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "re-fetch after partial failure failed");
            if e.is_auth_expired() {
                return e;
            }
        }
        CinelistError::PartialFailure {
            completed: "removed from watchlist".to_string(),
            failed: format!("adding to seenlist failed: {cause}"),
        }
    }
}
