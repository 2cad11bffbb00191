mod common;

use cinelist::domain::{ProfileUpdate, Role};
use cinelist::engagement::Membership;
use cinelist::search::SearchEvent;
use cinelist::{handle_event, Action, AppState, Event, Notice, ProfileTab, Screen};
use common::{app, FakeBackend, Fault, PASSWORD};

fn info(message: &str) -> Vec<Action> {
    vec![Action::Notify(Notice::info(message))]
}

fn error(message: &str) -> Vec<Action> {
    vec![Action::Notify(Notice::error(message))]
}

async fn login(state: &mut AppState) {
    let event = Event::Login {
        identifier: "ana".into(),
        password: PASSWORD.into(),
    };
    let (_, actions) = handle_event(state, event).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::Home)]);
}

#[tokio::test]
async fn watch_later_then_seen_then_review() {
    let backend = FakeBackend::new();
    let (mut state, _events) = app(&backend);

    let (_, actions) = handle_event(&mut state, Event::Restore).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::Login)]);

    login(&mut state).await;
    assert_eq!(state.screen, Screen::Home);
    assert_eq!(state.search.state().results.len(), 4);

    let (_, actions) = handle_event(&mut state, Event::OpenMovie { tmdb_id: 7 }).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::MovieDetail)]);
    let detail = state.detail.as_ref().unwrap();
    assert_eq!(detail.movie.title, "Seven Samurai");
    assert_eq!(detail.membership(), Membership::None);
    assert!(detail.thread().unwrap().is_empty());

    let (_, actions) = handle_event(&mut state, Event::ToggleWatchlist).await;
    assert_eq!(actions, info("Added to watch later"));
    assert_eq!(state.detail.as_ref().unwrap().membership(), Membership::Watchlist);

    backend.clear_calls();
    let (_, actions) = handle_event(&mut state, Event::MarkSeen).await;
    assert_eq!(actions, info("Marked as seen"));
    assert_eq!(
        backend.mutations(),
        vec!["POST /users/watchlist/remove", "POST /users/mylist"]
    );
    assert_eq!(state.detail.as_ref().unwrap().membership(), Membership::Seen);

    backend.clear_calls();
    let (_, actions) = handle_event(&mut state, Event::ToggleWatchlist).await;
    assert_eq!(actions, info("this movie is already marked as seen"));
    assert!(backend.mutations().is_empty());
    assert_eq!(state.detail.as_ref().unwrap().membership(), Membership::Seen);

    let submit = Event::SubmitComment {
        content: " A classic ".into(),
        rating: 5,
    };
    let (_, actions) = handle_event(&mut state, submit).await;
    assert_eq!(actions, info("Comment posted"));
    let own = state.detail.as_ref().unwrap().thread().unwrap().own_comment.clone().unwrap();
    assert_eq!(own.content, "A classic");

    let again = Event::SubmitComment {
        content: "Still a classic".into(),
        rating: 4,
    };
    let (_, actions) = handle_event(&mut state, again).await;
    assert_eq!(actions, error("you have already commented on this movie"));
}

#[tokio::test]
async fn profile_tabs_and_edits() {
    let backend = FakeBackend::new();
    backend.seed_lists(&["m8"], &["m7", "m9"]);
    let (mut state, _events) = app(&backend);
    login(&mut state).await;

    let (_, actions) = handle_event(&mut state, Event::OpenProfile).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::Profile)]);
    let profile = state.profile.as_ref().unwrap();
    assert_eq!(profile.tab, ProfileTab::Watchlist);
    assert_eq!(profile.visible().len(), 1);

    let (render, _) = handle_event(&mut state, Event::SelectProfileTab(ProfileTab::Seen)).await;
    assert!(render);
    let titles: Vec<&str> = state
        .profile
        .as_ref()
        .unwrap()
        .visible()
        .iter()
        .map(|m| m.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Seven Samurai", "Alien"]);

    let (render, _) = handle_event(&mut state, Event::SelectProfileTab(ProfileTab::Seen)).await;
    assert!(!render);

    backend.clear_calls();
    let blank = ProfileUpdate {
        username: "   ".into(),
        role: Role::User,
    };
    let (_, actions) = handle_event(&mut state, Event::SaveProfile(blank)).await;
    assert_eq!(actions, error("username must not be empty"));
    assert!(backend.calls().is_empty());

    let renamed = ProfileUpdate {
        username: "ana-b".into(),
        role: Role::Critic,
    };
    let (_, actions) = handle_event(&mut state, Event::SaveProfile(renamed)).await;
    assert_eq!(actions, info("Profile updated"));
    assert_eq!(state.profile.as_ref().unwrap().user.username, "ana-b");
    assert_eq!(state.session().user().unwrap().role, Role::Critic);
}

#[tokio::test]
async fn expired_session_resets_to_login() {
    let backend = FakeBackend::new();
    let (mut state, _events) = app(&backend);
    login(&mut state).await;
    handle_event(&mut state, Event::OpenMovie { tmdb_id: 8 }).await;
    assert!(state.detail.is_some());

    backend.expire_tokens();
    let (_, actions) = handle_event(&mut state, Event::ToggleWatchlist).await;
    assert_eq!(actions[0], Action::ResetToLogin);
    assert!(actions.contains(&Action::Navigate(Screen::Login)));

    assert_eq!(state.screen, Screen::Login);
    assert!(state.detail.is_none());
    assert!(!state.session().is_authenticated());
}

#[tokio::test]
async fn partial_failure_is_reported_without_logout() {
    let backend = FakeBackend::new();
    backend.seed_lists(&["m8"], &[]);
    let (mut state, _events) = app(&backend);
    login(&mut state).await;
    handle_event(&mut state, Event::OpenMovie { tmdb_id: 8 }).await;

    backend.fail("POST /users/mylist", Fault::Status(500, "boom"));
    let (_, actions) = handle_event(&mut state, Event::MarkSeen).await;
    assert_eq!(
        actions,
        error("removed from watchlist, but adding to seenlist failed: Request rejected (500): boom")
    );

    assert_eq!(state.screen, Screen::MovieDetail);
    assert!(state.session().is_authenticated());
    assert_eq!(state.detail.as_ref().unwrap().membership(), Membership::None);
}

#[tokio::test]
async fn unknown_movie_stays_home() {
    let backend = FakeBackend::new();
    let (mut state, _events) = app(&backend);
    login(&mut state).await;

    let (_, actions) = handle_event(&mut state, Event::OpenMovie { tmdb_id: 404 }).await;
    assert_eq!(actions, error("Movie not found"));
    assert_eq!(state.screen, Screen::Home);
    assert!(state.detail.is_none());
}

#[tokio::test]
async fn detail_events_without_a_movie_are_ignored() {
    let backend = FakeBackend::new();
    let (mut state, _events) = app(&backend);
    login(&mut state).await;
    backend.clear_calls();

    assert_eq!(handle_event(&mut state, Event::ToggleWatchlist).await, (false, vec![]));
    assert_eq!(handle_event(&mut state, Event::MarkSeen).await, (false, vec![]));
    assert!(backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_failures_become_notices() {
    let backend = FakeBackend::new();
    let (mut state, mut events) = app(&backend);
    login(&mut state).await;
    while events.try_recv().is_ok() {}

    backend.fail("GET /tmdb/search", Fault::Status(503, "catalog unavailable"));
    let (render, actions) = handle_event(&mut state, Event::QueryChanged("alien".into())).await;
    assert!(render);
    assert!(actions.is_empty());

    let mut last = Vec::new();
    while let Some(update) = events.recv().await {
        let failed = matches!(update, SearchEvent::Failed { .. });
        last = handle_event(&mut state, Event::SearchUpdate(update)).await.1;
        if failed {
            break;
        }
    }
    assert_eq!(last, error("Request rejected (503): catalog unavailable"));
    assert_eq!(state.search.state().results.len(), 4);
}

#[tokio::test]
async fn registration_then_logout() {
    let backend = FakeBackend::new();
    let (mut state, _events) = app(&backend);

    let (_, actions) = handle_event(&mut state, Event::ShowRegister).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::Register)]);

    let form = cinelist::domain::Registration {
        username: "bo".into(),
        email: "bo@mail.com".into(),
        password: "hunter22".into(),
        role: Role::User,
    };
    let (_, actions) = handle_event(&mut state, Event::Register(form)).await;
    assert_eq!(
        actions,
        vec![
            Action::Notify(Notice::info("Registration successful, please log in")),
            Action::Navigate(Screen::Login),
        ]
    );

    login(&mut state).await;
    let (_, actions) = handle_event(&mut state, Event::Logout).await;
    assert_eq!(actions, vec![Action::ResetToLogin]);
    assert_eq!(state.screen, Screen::Login);
    assert!(state.session().get().is_none());
}

#[tokio::test]
async fn uncataloged_movie_cannot_be_listed() {
    let backend = FakeBackend::new();
    backend.seed_catalog(common::movie("", 500, "Festival Preview"));
    let (mut state, _events) = app(&backend);
    login(&mut state).await;

    let (_, actions) = handle_event(&mut state, Event::OpenMovie { tmdb_id: 500 }).await;
    assert_eq!(actions, vec![Action::Navigate(Screen::MovieDetail)]);
    assert!(state.detail.as_ref().unwrap().thread().is_none());

    backend.clear_calls();
    let (_, actions) = handle_event(&mut state, Event::ToggleWatchlist).await;
    assert_eq!(actions, info("this movie is not in the catalog yet"));
    let (_, actions) = handle_event(&mut state, Event::MarkSeen).await;
    assert_eq!(actions, info("this movie is not in the catalog yet"));
    assert!(backend.calls().is_empty());
    assert_eq!(state.detail.as_ref().unwrap().membership(), Membership::None);
}
