//! Application state.
//!
//! [`AppState`] is the single owner of everything the presentation layer
//! renders: the current screen, the search controller backing the home
//! screen, and the per-screen state of the movie detail and profile screens.
//! Per-screen state is created when its screen is opened and dropped on
//! logout or session expiry.

use super::modes::{ProfileTab, Screen};
use crate::api::ApiClient;
use crate::comments::{CommentReconciler, CommentThread};
use crate::domain::{Movie, UserProfile};
use crate::engagement::{EngagementStateMachine, Membership, MovieLists};
use crate::search::SearchController;
use crate::session::SessionStore;

/// State of an open movie detail screen.
#[derive(Debug)]
pub struct MovieDetail {
    pub movie: Movie,
    /// Profile read when the screen was opened.
    pub viewer: UserProfile,
    pub engagement: EngagementStateMachine,
    pub comments: CommentReconciler,
}

impl MovieDetail {
    #[must_use]
    pub fn membership(&self) -> Membership {
        self.engagement.membership()
    }

    #[must_use]
    pub const fn thread(&self) -> Option<&CommentThread> {
        self.comments.thread()
    }
}

/// State of an open profile screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user: UserProfile,
    pub lists: MovieLists,
    pub tab: ProfileTab,
}

impl ProfileView {
    /// Movies of the selected tab.
    #[must_use]
    pub fn visible(&self) -> &[Movie] {
        match self.tab {
            ProfileTab::Watchlist => &self.lists.watchlist,
            ProfileTab::Seen => &self.lists.seenlist,
        }
    }
}

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    pub api: ApiClient,
    pub screen: Screen,
    pub search: SearchController,
    pub detail: Option<MovieDetail>,
    pub profile: Option<ProfileView>,
}

impl AppState {
    #[must_use]
    pub const fn new(api: ApiClient, search: SearchController) -> Self {
        Self {
            api,
            screen: Screen::Login,
            search,
            detail: None,
            profile: None,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// Drops all per-screen state and returns to the login screen.
    pub fn reset_to_login(&mut self) {
        tracing::debug!(from = %self.screen, "resetting to login");
        self.search.cancel_pending();
        self.detail = None;
        self.profile = None;
        self.screen = Screen::Login;
    }
}
