//! Event handling and screen coordination.
//!
//! [`handle_event`] is the only entry point the presentation layer calls. It
//! routes an [`Event`] to the component that owns it, updates [`AppState`],
//! and returns whether a re-render is due together with the actions to carry
//! out. Every failure is converted by [`failure_actions`] before returning.
//!
//! # Screen flows
//!
//! - **Movie detail open**: profile read and movie lookup run concurrently,
//!   then both lists are loaded, then the comments.
//! - **Comment submit**: the thread is reloaded, then memberships refreshed.
//! - **Profile open**: profile read, then both lists concurrently.

use super::actions::{failure_actions, Action, Notice};
use super::modes::{ProfileTab, Screen};
use super::state::{AppState, MovieDetail, ProfileView};
use crate::comments::CommentReconciler;
use crate::domain::error::Result;
use crate::domain::{Credentials, ProfileUpdate, Registration};
use crate::engagement::{EngagementStateMachine, Membership, MovieLists, Transition};
use crate::search::SearchEvent;
use crate::session::{self, RegisterOutcome};
use futures_util::future::try_join;
use tracing::Instrument;

/// User intents and background notifications.
#[derive(Clone, PartialEq, Eq)]
pub enum Event {
    /// Startup: try to resume the session left by a previous run.
    Restore,
    Login { identifier: String, password: String },
    Register(Registration),
    Logout,
    ShowLogin,
    ShowRegister,
    GoHome,

    /// The search input changed.
    QueryChanged(String),
    /// Background progress of the search controller.
    SearchUpdate(SearchEvent),

    /// Open the detail screen of a catalog movie.
    OpenMovie { tmdb_id: u64 },
    ToggleWatchlist,
    MarkSeen,
    SubmitComment { content: String, rating: u8 },

    OpenProfile,
    SelectProfileTab(ProfileTab),
    SaveProfile(ProfileUpdate),
}

impl Event {
    /// Short name for spans; never includes user input.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Login { .. } => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::ShowLogin => "show_login",
            Self::ShowRegister => "show_register",
            Self::GoHome => "go_home",
            Self::QueryChanged(_) => "query_changed",
            Self::SearchUpdate(_) => "search_update",
            Self::OpenMovie { .. } => "open_movie",
            Self::ToggleWatchlist => "toggle_watchlist",
            Self::MarkSeen => "mark_seen",
            Self::SubmitComment { .. } => "submit_comment",
            Self::OpenProfile => "open_profile",
            Self::SelectProfileTab(_) => "select_profile_tab",
            Self::SaveProfile(_) => "save_profile",
        }
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { identifier, .. } => f
                .debug_struct("Login")
                .field("identifier", identifier)
                .finish_non_exhaustive(),
            Self::Register(registration) => f.debug_tuple("Register").field(registration).finish(),
            Self::QueryChanged(text) => f.debug_tuple("QueryChanged").field(text).finish(),
            Self::SearchUpdate(update) => f.debug_tuple("SearchUpdate").field(update).finish(),
            Self::OpenMovie { tmdb_id } => f.debug_struct("OpenMovie").field("tmdb_id", tmdb_id).finish(),
            Self::SubmitComment { content, rating } => f
                .debug_struct("SubmitComment")
                .field("content", content)
                .field("rating", rating)
                .finish(),
            Self::SelectProfileTab(tab) => f.debug_tuple("SelectProfileTab").field(tab).finish(),
            Self::SaveProfile(update) => f.debug_tuple("SaveProfile").field(update).finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// Processes an event and returns `(needs_render, actions)`.
///
/// Never fails: errors are logged and turned into actions. An expired session
/// additionally clears all per-screen state.
pub async fn handle_event(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
    let span = tracing::debug_span!("handle_event", event = event.name(), screen = %state.screen);

    async move {
        match dispatch(state, event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, kind = ?e.kind(), "event failed");
                if e.is_auth_expired() {
                    state.reset_to_login();
                }
                (true, failure_actions(&e))
            }
        }
    }
    .instrument(span)
    .await
}

async fn dispatch(state: &mut AppState, event: Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Restore => match session::restore(&state.api).await? {
            Some(user) => {
                let mut actions = enter_home(state).await;
                actions.push(Action::Notify(Notice::info(format!("Welcome back, {}", user.username))));
                Ok((true, actions))
            }
            None => {
                state.screen = Screen::Login;
                Ok((true, vec![Action::Navigate(Screen::Login)]))
            }
        },
        Event::Login { identifier, password } => {
            session::login(&state.api, &Credentials::new(identifier, password)).await?;
            Ok((true, enter_home(state).await))
        }
        Event::Register(registration) => match session::register(&state.api, &registration).await? {
            RegisterOutcome::LoggedIn(_) => Ok((true, enter_home(state).await)),
            RegisterOutcome::LoginRequired => {
                state.screen = Screen::Login;
                Ok((
                    true,
                    vec![
                        Action::Notify(Notice::info("Registration successful, please log in")),
                        Action::Navigate(Screen::Login),
                    ],
                ))
            }
        },
        Event::Logout => {
            session::logout(state.session());
            state.reset_to_login();
            Ok((true, vec![Action::ResetToLogin]))
        }
        Event::ShowLogin => Ok(navigate(state, Screen::Login)),
        Event::ShowRegister => Ok(navigate(state, Screen::Register)),
        Event::GoHome => {
            state.detail = None;
            state.profile = None;
            Ok(navigate(state, Screen::Home))
        }
        Event::QueryChanged(text) => {
            state.search.on_text_changed(&text);
            Ok((true, vec![]))
        }
        Event::SearchUpdate(update) => match update {
            SearchEvent::Failed { message, .. } => Ok((true, vec![Action::Notify(Notice::error(message))])),
            SearchEvent::Loading { .. } | SearchEvent::Loaded { .. } => Ok((true, vec![])),
        },
        Event::OpenMovie { tmdb_id } => open_movie(state, tmdb_id).await,
        Event::ToggleWatchlist => {
            let Some(detail) = state.detail.as_mut() else {
                return Ok((false, vec![]));
            };
            let notice = match detail.engagement.toggle_watchlist().await? {
                Transition::Refused(refusal) => Notice::info(refusal.to_string()),
                Transition::Applied { to: Membership::Watchlist, .. } => Notice::info("Added to watch later"),
                Transition::Applied { .. } => Notice::info("Removed from watch later"),
                Transition::Unchanged(_) => return Ok((false, vec![])),
            };
            Ok((true, vec![Action::Notify(notice)]))
        }
        Event::MarkSeen => {
            let Some(detail) = state.detail.as_mut() else {
                return Ok((false, vec![]));
            };
            let notice = match detail.engagement.mark_seen().await? {
                Transition::Unchanged(_) => Notice::info("Already marked as seen"),
                Transition::Refused(refusal) => Notice::info(refusal.to_string()),
                Transition::Applied { .. } => Notice::info("Marked as seen"),
            };
            Ok((true, vec![Action::Notify(notice)]))
        }
        Event::SubmitComment { content, rating } => {
            let Some(detail) = state.detail.as_mut() else {
                return Ok((false, vec![]));
            };
            let movie_id = detail.movie.id.clone();
            detail.comments.submit(&movie_id, &content, rating).await?;
            detail.engagement.load().await?;
            Ok((true, vec![Action::Notify(Notice::info("Comment posted"))]))
        }
        Event::OpenProfile => {
            let user = state.api.profile().await?;
            state.session().update_user(user.clone());
            let (watchlist, seenlist) = try_join(state.api.watchlist(), state.api.seenlist()).await?;

            state.profile = Some(ProfileView {
                user,
                lists: MovieLists { watchlist, seenlist },
                tab: ProfileTab::default(),
            });
            Ok(navigate(state, Screen::Profile))
        }
        Event::SelectProfileTab(tab) => match state.profile.as_mut() {
            Some(profile) if profile.tab != tab => {
                profile.tab = tab;
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },
        Event::SaveProfile(update) => {
            update.validate()?;
            let user = state.api.update_profile(&update).await?;
            state.session().update_user(user.clone());
            if let Some(profile) = state.profile.as_mut() {
                profile.user = user;
            }
            Ok((true, vec![Action::Notify(Notice::info("Profile updated"))]))
        }
    }
}

fn navigate(state: &mut AppState, screen: Screen) -> (bool, Vec<Action>) {
    state.screen = screen;
    (true, vec![Action::Navigate(screen)])
}

async fn enter_home(state: &mut AppState) -> Vec<Action> {
    state.screen = Screen::Home;
    state.search.load_default().await;
    vec![Action::Navigate(Screen::Home)]
}

async fn open_movie(state: &mut AppState, tmdb_id: u64) -> Result<(bool, Vec<Action>)> {
    let api = state.api.clone();
    let (viewer, movie) = try_join(api.profile(), api.movie_by_tmdb_id(tmdb_id)).await?;
    state.session().update_user(viewer.clone());

    let mut engagement = EngagementStateMachine::new(api.clone(), movie.id.clone());
    let mut comments = CommentReconciler::new(api);

    engagement.load().await?;
    if movie.id.is_empty() {
        tracing::debug!(tmdb_id, "movie has no internal id, skipping comments");
    } else {
        comments.load(&movie.id, &viewer.id).await?;
    }

    tracing::info!(tmdb_id, movie_id = %movie.id, "movie opened");
    state.detail = Some(MovieDetail {
        movie,
        viewer,
        engagement,
        comments,
    });
    Ok(navigate(state, Screen::MovieDetail))
}
