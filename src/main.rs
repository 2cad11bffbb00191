//! Terminal shell and entry point.
//!
//! A thin line-oriented front end over the library: each command typed on
//! stdin becomes an [`Event`], the returned actions are carried out by
//! printing, and background search progress is drained concurrently.
//!
//! # Configuration
//!
//! 1. `--config <path>` or `$CINELIST_CONFIG` names a TOML file (optional)
//! 2. `CINELIST_<FIELD>` environment variables override single fields, e.g.
//!    `CINELIST_API_URL`, `CINELIST_SEARCH_DEBOUNCE_MS`, `CINELIST_TRACE_EXPORT`
//!
//! # Commands
//!
//! ```text
//! login <email|username> <password>      register <user> <email> <password> [user|critic]
//! s <text>        search (blank text shows the popular listing)
//! open <n>        open result n           home / profile / logout
//! watch           toggle watch later      seen      mark as seen
//! comment <1-5> <text>                    tab watch|seen
//! save <username> [user|critic]           show / help / quit
//! ```

#![allow(clippy::multiple_crate_versions)]

use cinelist::app::ProfileView;
use cinelist::domain::{ProfileUpdate, Registration, Role};
use cinelist::engagement::Membership;
use cinelist::observability::init_tracing;
use cinelist::{handle_event, initialize, Action, AppState, Config, Event, NoticeLevel, ProfileTab, Screen};
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  login <email|username> <password>
  register <username> <email> <password> [user|critic]
  s <text>                 search; blank text shows the popular listing
  open <n>                 open search result n
  watch                    toggle watch later
  seen                     mark as seen
  comment <1-5> <text>     rate and comment
  profile                  open your profile
  tab watch|seen           switch profile list
  save <username> [role]   update your profile
  home | show | logout | help | quit";

enum Command {
    Dispatch(Event),
    Show,
    Help,
    Quit,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cinelist: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let (mut state, mut search_events) = match initialize(&config) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!(error = %e, "initialization failed");
            eprintln!("cinelist: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = handle_event(&mut state, Event::Restore).await;
    apply(&state, outcome);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&state);
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read stdin");
                        break;
                    }
                };
                match parse_command(&line, &state) {
                    Ok(Command::Dispatch(event)) => {
                        let outcome = handle_event(&mut state, event).await;
                        apply(&state, outcome);
                    }
                    Ok(Command::Show) => render(&state),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Quit) => break,
                    Err(message) if message.is_empty() => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
            Some(update) = search_events.recv() => {
                let outcome = handle_event(&mut state, Event::SearchUpdate(update)).await;
                apply(&state, outcome);
            }
        }
    }

    tracing::debug!("shell exiting");
    ExitCode::SUCCESS
}

fn load_config() -> cinelist::Result<Config> {
    let mut args = std::env::args().skip(1);
    let mut path = std::env::var_os("CINELIST_CONFIG").map(PathBuf::from);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            path = args.next().map(PathBuf::from);
        }
    }

    let config = match path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    Ok(with_env_overrides(config))
}

fn with_env_overrides(mut config: Config) -> Config {
    let env: BTreeMap<String, String> = std::env::vars()
        .filter_map(|(key, value)| {
            key.strip_prefix("CINELIST_")
                .map(|field| (field.to_ascii_lowercase(), value))
        })
        .collect();
    let parsed = Config::from_map(&env);

    if env.contains_key("api_url") {
        config.api_url = parsed.api_url;
    }
    if env.contains_key("search_debounce_ms") {
        config.search_debounce_ms = parsed.search_debounce_ms;
    }
    if env.contains_key("request_timeout_secs") {
        config.request_timeout_secs = parsed.request_timeout_secs;
    }
    if env.contains_key("data_dir") {
        config.data_dir = parsed.data_dir;
    }
    if env.contains_key("log_level") {
        config.log_level = parsed.log_level;
    }
    if env.contains_key("trace_export") {
        config.trace_export = parsed.trace_export;
    }
    config
}

fn parse_command(line: &str, state: &AppState) -> Result<Command, String> {
    let line = line.trim_end_matches('\r');
    let (head, rest) = line.trim_start().split_once(' ').unwrap_or((line.trim(), ""));
    let words: Vec<&str> = rest.split_whitespace().collect();

    let event = match head {
        "" => return Err(String::new()),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "show" => return Ok(Command::Show),
        "login" => match words.as_slice() {
            [identifier, password] => Event::Login {
                identifier: (*identifier).to_string(),
                password: (*password).to_string(),
            },
            _ => return Err("usage: login <email|username> <password>".into()),
        },
        "register" => match words.as_slice() {
            [username, email, password, role @ ..] if role.len() <= 1 => Event::Register(Registration {
                username: (*username).to_string(),
                email: (*email).to_string(),
                password: (*password).to_string(),
                role: parse_role(role.first().copied())?,
            }),
            _ => return Err("usage: register <username> <email> <password> [user|critic]".into()),
        },
        "logout" => Event::Logout,
        "home" => Event::GoHome,
        "s" | "search" => Event::QueryChanged(rest.to_string()),
        "open" => {
            let index: usize = words
                .first()
                .and_then(|w| w.parse().ok())
                .filter(|n| *n > 0)
                .ok_or("usage: open <n>")?;
            let results = state.search.state().results;
            let movie = results.get(index - 1).ok_or_else(|| format!("no result {index}"))?;
            Event::OpenMovie { tmdb_id: movie.tmdb_id }
        }
        "watch" => Event::ToggleWatchlist,
        "seen" => Event::MarkSeen,
        "comment" => {
            let (rating, content) = rest.trim_start().split_once(' ').ok_or("usage: comment <1-5> <text>")?;
            let rating: u8 = rating.parse().map_err(|_| "rating must be a number from 1 to 5")?;
            Event::SubmitComment {
                content: content.to_string(),
                rating,
            }
        }
        "profile" => Event::OpenProfile,
        "tab" => match words.first().copied() {
            Some("watch" | "watchlist") => Event::SelectProfileTab(ProfileTab::Watchlist),
            Some("seen") => Event::SelectProfileTab(ProfileTab::Seen),
            _ => return Err("usage: tab watch|seen".into()),
        },
        "save" => match words.as_slice() {
            [username, role @ ..] if role.len() <= 1 => {
                let current = state.session().user().map(|u| u.role).unwrap_or_default();
                Event::SaveProfile(ProfileUpdate {
                    username: (*username).to_string(),
                    role: role.first().map_or(Ok(current), |r| parse_role(Some(*r)))?,
                })
            }
            _ => return Err("usage: save <username> [user|critic]".into()),
        },
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Command::Dispatch(event))
}

fn parse_role(role: Option<&str>) -> Result<Role, String> {
    role.map_or(Ok(Role::User), str::parse)
}

fn apply(state: &AppState, (needs_render, actions): (bool, Vec<Action>)) {
    let mut navigated = false;
    for action in actions {
        match action {
            Action::ResetToLogin => println!("-- signed out --"),
            Action::Navigate(_) => navigated = true,
            Action::Notify(notice) => match notice.level {
                NoticeLevel::Info => println!("* {}", notice.message),
                NoticeLevel::Error => eprintln!("! {}", notice.message),
            },
        }
    }
    if needs_render || navigated {
        render(state);
    }
}

fn prompt(state: &AppState) {
    print!("{}> ", state.screen);
    std::io::stdout().flush().ok();
}

fn render(state: &AppState) {
    match state.screen {
        Screen::Login => println!("Log in with `login`, or create an account with `register`."),
        Screen::Register => println!("register <username> <email> <password> [user|critic]"),
        Screen::Home => render_home(state),
        Screen::MovieDetail => render_detail(state),
        Screen::Profile => {
            if let Some(profile) = &state.profile {
                render_profile(profile);
            }
        }
    }
}

fn render_home(state: &AppState) {
    let search = state.search.state();
    let status = if search.is_loading { " (loading…)" } else { "" };
    println!("search: \"{}\"{status}", search.query_text);
    if search.results.is_empty() && !search.is_loading {
        println!("  no movies");
    }
    for (i, movie) in search.results.iter().enumerate() {
        let year = movie.release_date.as_deref().and_then(|d| d.get(..4)).unwrap_or("----");
        println!("{:>3}. {} ({year})", i + 1, movie.title);
    }
}

fn render_detail(state: &AppState) {
    let Some(detail) = &state.detail else {
        return;
    };
    let movie = &detail.movie;
    println!("== {} ==", movie.title);
    if let Some(description) = &movie.description {
        println!("{description}");
    }
    if !movie.categories.is_empty() {
        println!("genres: {}", movie.categories.join(", "));
    }
    if !movie.cast.is_empty() {
        println!("cast: {}", movie.cast.join(", "));
    }
    println!(
        "users: {}  critics: {}",
        movie.user_rating_label(),
        movie.critic_rating_label()
    );
    let hint = match detail.membership() {
        Membership::None => "`watch` to save for later, `seen` to mark as seen",
        Membership::Watchlist => "`watch` to remove, `seen` to mark as seen",
        Membership::Seen => "already seen",
    };
    println!("list: {} ({hint})", detail.membership());

    let Some(thread) = detail.thread() else {
        return;
    };
    match &thread.own_comment {
        Some(own) => println!("your review: {} {}", own.stars(), own.content),
        None => println!("no review from you yet: comment <1-5> <text>"),
    }
    for comment in &thread.other_comments {
        println!("  {} [{}] {} {}", comment.username, comment.role, comment.stars(), comment.content);
    }
}

fn render_profile(profile: &ProfileView) {
    let user = &profile.user;
    println!("{} ({})", user.username, user.role);
    if let Some(email) = &user.email {
        println!("{email}");
    }
    println!(
        "[{}] watch later: {}  seen: {}",
        profile.tab,
        profile.lists.watchlist.len(),
        profile.lists.seenlist.len()
    );
    for movie in profile.visible() {
        println!("  - {}", movie.title);
    }
}
