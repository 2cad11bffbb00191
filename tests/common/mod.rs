//! Scripted in-process backend for integration tests.
//!
//! [`FakeBackend`] implements [`Transport`] over a small in-memory model of the
//! movie server: a catalog, one watchlist and one seenlist per token holder,
//! comments, and accounts. Every request is recorded. Faults and delays can be
//! scripted per `"METHOD /path"` key.

#![allow(dead_code)]

use cinelist::api::{ApiClient, ApiRequest, ApiResponse, HttpMethod, Transport};
use cinelist::domain::{Movie, Role, Session, UserProfile};
use cinelist::search::SearchEvent;
use cinelist::session::SessionStore;
use cinelist::{AppState, CinelistError};
use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;

pub const TOKEN: &str = "tok-ana";
pub const PASSWORD: &str = "secret1";
pub const QUIET: Duration = Duration::from_millis(500);

/// A scripted failure for the next matching request.
#[derive(Debug, Clone)]
pub enum Fault {
    /// Answer with this status and `{"message": ..}` body.
    Status(u16, &'static str),
    /// No HTTP response at all.
    Network,
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: String,
    movie_id: String,
    author: UserProfile,
    rating: u8,
    content: String,
}

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    user: UserProfile,
}

#[derive(Default)]
struct Inner {
    catalog: Vec<Movie>,
    watchlist: Vec<String>,
    seenlist: Vec<String>,
    comments: Vec<StoredComment>,
    accounts: Vec<Account>,
    tokens: HashMap<String, String>,
    faults: HashMap<String, VecDeque<Fault>>,
    delays: HashMap<String, Duration>,
    calls: Vec<ApiRequest>,
    issue_token_on_register: bool,
    next_id: u32,
}

pub struct FakeBackend {
    inner: Mutex<Inner>,
}

pub fn movie(id: &str, tmdb_id: u64, title: &str) -> Movie {
    Movie::new(id, tmdb_id, title)
}

pub fn ana() -> UserProfile {
    UserProfile {
        id: "u-ana".into(),
        username: "ana".into(),
        role: Role::User,
        email: Some("ana@mail.com".into()),
    }
}

pub fn critic(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: id.into(),
        username: name.into(),
        role: Role::Critic,
        email: None,
    }
}

impl FakeBackend {
    /// A server with a small catalog and one account, `ana`, whose token is
    /// [`TOKEN`].
    pub fn new() -> Arc<Self> {
        let inner = Inner {
            catalog: vec![
                movie("m7", 7, "Seven Samurai"),
                movie("m8", 8, "The Matrix"),
                movie("m9", 9, "Alien"),
                movie("m10", 10, "Aliens"),
            ],
            accounts: vec![Account {
                email: "ana@mail.com".into(),
                password: PASSWORD.into(),
                user: ana(),
            }],
            tokens: HashMap::from([(TOKEN.to_string(), "u-ana".to_string())]),
            ..Inner::default()
        };
        Arc::new(Self {
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn seed_lists(&self, watchlist: &[&str], seenlist: &[&str]) {
        let mut inner = self.lock();
        inner.watchlist = watchlist.iter().map(ToString::to_string).collect();
        inner.seenlist = seenlist.iter().map(ToString::to_string).collect();
    }

    pub fn seed_comment(&self, movie_id: &str, author: UserProfile, rating: u8, content: &str) {
        let mut inner = self.lock();
        let id = inner.fresh_id("c");
        inner.comments.push(StoredComment {
            id,
            movie_id: movie_id.into(),
            author,
            rating,
            content: content.into(),
        });
    }

    pub fn seed_catalog(&self, entry: Movie) {
        self.lock().catalog.push(entry);
    }

    pub fn issue_token_on_register(&self) {
        self.lock().issue_token_on_register = true;
    }

    /// Invalidates every issued token, as a server-side expiry would.
    pub fn expire_tokens(&self) {
        self.lock().tokens.clear();
    }

    /// Queues `fault` for the next request matching `key`, e.g.
    /// `"POST /users/mylist"`.
    pub fn fail(&self, key: &str, fault: Fault) {
        self.lock()
            .faults
            .entry(key.to_string())
            .or_default()
            .push_back(fault);
    }

    /// Delays every search for exactly `query`.
    pub fn delay_search(&self, query: &str, delay: Duration) {
        self.lock().delays.insert(query.to_string(), delay);
    }

    pub fn watchlist_ids(&self) -> Vec<String> {
        self.lock().watchlist.clone()
    }

    pub fn seenlist_ids(&self) -> Vec<String> {
        self.lock().seenlist.clone()
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.lock().calls.clone()
    }

    /// Recorded calls as `"METHOD /path"` strings.
    pub fn call_keys(&self) -> Vec<String> {
        self.lock().calls.iter().map(key_of).collect()
    }

    pub fn count(&self, key: &str) -> usize {
        self.lock().calls.iter().filter(|c| key_of(c) == key).count()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method != HttpMethod::Get)
            .map(key_of)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

fn key_of(request: &ApiRequest) -> String {
    format!("{} {}", request.method, request.path)
}

fn reply(status: u16, body: &Value) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

fn message(status: u16, text: &str) -> ApiResponse {
    reply(status, &json!({ "message": text }))
}

fn movie_id_of(request: &ApiRequest) -> String {
    request
        .body
        .as_ref()
        .and_then(|b| b.get("movieId"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn delay_for(&self, request: &ApiRequest) -> Option<Duration> {
        if request.path != "/tmdb/search" {
            return None;
        }
        let query = request.query.iter().find(|(k, _)| k == "query")?;
        self.delays.get(&query.1).copied()
    }

    fn user(&self, user_id: &str) -> Option<UserProfile> {
        self.accounts.iter().find(|a| a.user.id == user_id).map(|a| a.user.clone())
    }

    fn listed(&self, ids: &[String]) -> Value {
        let movies: Vec<Movie> = ids
            .iter()
            .map(|id| {
                self.catalog
                    .iter()
                    .find(|m| &m.id == id)
                    .cloned()
                    .unwrap_or_else(|| movie(id, 0, id))
            })
            .collect();
        json!(movies)
    }

    fn respond(&mut self, request: &ApiRequest) -> cinelist::Result<ApiResponse> {
        let key = key_of(request);
        if let Some(fault) = self.faults.get_mut(&key).and_then(VecDeque::pop_front) {
            return match fault {
                Fault::Network => Err(CinelistError::Transport("connection reset".into())),
                Fault::Status(status, text) => Ok(message(status, text)),
            };
        }

        let caller = match &request.bearer {
            Some(token) => match self.tokens.get(token).and_then(|id| self.user(id)) {
                Some(user) => Some(user),
                None => return Ok(message(401, "Invalid token")),
            },
            None => None,
        };

        let path = request.path.as_str();
        match (request.method, path) {
            (HttpMethod::Get, "/tmdb/popular") => return Ok(reply(200, &json!(self.catalog))),
            (HttpMethod::Get, "/tmdb/search") => {
                let needle = request
                    .query
                    .iter()
                    .find(|(k, _)| k == "query")
                    .map(|(_, v)| v.to_lowercase())
                    .unwrap_or_default();
                let hits: Vec<&Movie> = self
                    .catalog
                    .iter()
                    .filter(|m| m.title.to_lowercase().contains(&needle))
                    .collect();
                return Ok(reply(200, &json!(hits)));
            }
            (HttpMethod::Get, p) if p.starts_with("/movies/tmdb/") => {
                let tmdb_id: u64 = p.trim_start_matches("/movies/tmdb/").parse().unwrap_or(0);
                return Ok(match self.catalog.iter().find(|m| m.tmdb_id == tmdb_id) {
                    Some(found) => reply(200, &json!(found)),
                    None => message(404, "Movie not found"),
                });
            }
            (HttpMethod::Get, p) if p.starts_with("/comments/movie/") => {
                let movie_id = p.trim_start_matches("/comments/movie/");
                let populated: Vec<Value> = self
                    .comments
                    .iter()
                    .filter(|c| c.movie_id == movie_id)
                    .map(|c| {
                        json!({
                            "_id": c.id,
                            "movieId": c.movie_id,
                            "userId": {
                                "_id": c.author.id,
                                "username": c.author.username,
                                "role": c.author.role,
                            },
                            "rating": c.rating,
                            "content": c.content,
                        })
                    })
                    .collect();
                return Ok(reply(200, &json!(populated)));
            }
            (HttpMethod::Post, "/users/login") => return Ok(self.login(request)),
            (HttpMethod::Post, "/users/register") => return Ok(self.register(request)),
            _ => {}
        }

        let Some(caller) = caller else {
            return Ok(message(401, "No token provided"));
        };

        let response = match (request.method, path) {
            (HttpMethod::Get, "/users/profile") => reply(200, &json!(caller)),
            (HttpMethod::Patch, "/users/profile") => {
                let body = request.body.clone().unwrap_or_default();
                let account = self
                    .accounts
                    .iter_mut()
                    .find(|a| a.user.id == caller.id)
                    .expect("caller has an account");
                if let Some(name) = body.get("username").and_then(Value::as_str) {
                    account.user.username = name.to_string();
                }
                if let Some(role) = body.get("role").and_then(Value::as_str) {
                    account.user.role = role.parse().unwrap_or(account.user.role);
                }
                reply(200, &json!(account.user))
            }
            (HttpMethod::Get, "/users/watchlist") => reply(200, &self.listed(&self.watchlist)),
            (HttpMethod::Get, "/users/seenlist") => reply(200, &self.listed(&self.seenlist)),
            (HttpMethod::Post, "/users/watchlist") => {
                let id = movie_id_of(request);
                if self.watchlist.contains(&id) {
                    message(400, "Movie already in watchlist")
                } else {
                    self.watchlist.push(id);
                    message(200, "Movie added to watchlist")
                }
            }
            (HttpMethod::Post, "/users/watchlist/remove") => {
                let id = movie_id_of(request);
                self.watchlist.retain(|m| *m != id);
                message(200, "Movie removed from watchlist")
            }
            (HttpMethod::Post, "/users/mylist") => {
                let id = movie_id_of(request);
                if !self.seenlist.contains(&id) {
                    self.seenlist.push(id);
                }
                message(200, "Movie added to seen list")
            }
            (HttpMethod::Post, "/comments") => {
                let body = request.body.clone().unwrap_or_default();
                let id = self.fresh_id("c");
                self.comments.push(StoredComment {
                    id,
                    movie_id: body["movieId"].as_str().unwrap_or_default().to_string(),
                    author: caller,
                    rating: body["rating"].as_u64().and_then(|r| u8::try_from(r).ok()).unwrap_or(0),
                    content: body["content"].as_str().unwrap_or_default().to_string(),
                });
                message(201, "Comment created")
            }
            _ => message(404, "Not found"),
        };
        Ok(response)
    }

    fn login(&mut self, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or_default();
        let identifier = body
            .get("email")
            .or_else(|| body.get("username"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

        let Some(account) = self
            .accounts
            .iter()
            .find(|a| (a.email == identifier || a.user.username == identifier) && a.password == password)
            .cloned()
        else {
            return message(401, "Invalid credentials");
        };

        let token = if account.user.id == "u-ana" {
            TOKEN.to_string()
        } else {
            self.fresh_id("tok-")
        };
        self.tokens.insert(token.clone(), account.user.id.clone());
        reply(200, &json!({ "token": token, "user": account.user }))
    }

    fn register(&mut self, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or_default();
        let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
        let email = field("email");
        if self.accounts.iter().any(|a| a.email == email) {
            return message(400, "User already exists");
        }

        let id = self.fresh_id("u");
        let user = UserProfile {
            id: id.clone(),
            username: field("username"),
            role: field("role").parse().unwrap_or_default(),
            email: Some(email.clone()),
        };
        self.accounts.push(Account {
            email,
            password: field("password"),
            user,
        });

        if self.issue_token_on_register {
            let token = format!("tok-{id}");
            self.tokens.insert(token.clone(), id);
            reply(201, &json!({ "token": token }))
        } else {
            message(201, "User registered successfully")
        }
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, cinelist::Result<ApiResponse>> {
        Box::pin(async move {
            let delay = {
                let mut inner = self.lock();
                inner.calls.push(request.clone());
                inner.delay_for(&request)
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.lock().respond(&request)
        })
    }
}

/// A client over `backend` with an in-memory, logged-out session.
pub fn client(backend: &Arc<FakeBackend>) -> ApiClient {
    let transport: Arc<dyn Transport> = Arc::clone(backend) as Arc<dyn Transport>;
    ApiClient::new(transport, SessionStore::in_memory())
}

/// A client whose session already holds `ana`'s token.
pub fn logged_in(backend: &Arc<FakeBackend>) -> ApiClient {
    let api = client(backend);
    api.session().set(Session::new(TOKEN.to_string(), ana()));
    api
}

/// Application state over `backend`, logged out.
pub fn app(backend: &Arc<FakeBackend>) -> (AppState, mpsc::UnboundedReceiver<SearchEvent>) {
    cinelist::assemble(client(backend), QUIET)
}
