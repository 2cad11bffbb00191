//! Typed access to every remote operation.
//!
//! [`ApiClient`] resolves an [`Endpoint`] into an [`ApiRequest`], attaches the
//! bearer token read from the [`SessionStore`] at call time, and maps the
//! outcome:
//!
//! | Outcome | Result |
//! |---|---|
//! | 2xx | body decoded into the expected type |
//! | 401 on an authenticated call | session cleared, [`CinelistError::AuthExpired`] |
//! | other non-2xx | [`CinelistError::Rejected`] with the server's `message` |
//! | no response | [`CinelistError::Transport`] |
//! | undecodable body | [`CinelistError::Decode`] |

use super::endpoint::Endpoint;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::domain::error::{CinelistError, Result};
use crate::domain::{Comment, CommentDraft, Credentials, Movie, ProfileUpdate, Registration, UserProfile};
use crate::session::SessionStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Answer of the login and register endpoints.
///
/// Registration may answer without a token, in which case the user has to log
/// in explicitly.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MovieRefBody<'a> {
    movie_id: &'a str,
}

/// Client for the movie catalog API.
///
/// Cloning is cheap; clones share the transport and the session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    /// The session this client reads its token from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Default catalog listing.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures.
    pub async fn popular_movies(&self) -> Result<Vec<Movie>> {
        let body = self.execute(&Endpoint::Popular, Vec::new(), None, None).await?;
        decode(&Endpoint::Popular, &body)
    }

    /// Catalog search. `query` is sent as given; callers trim it.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let params = vec![("query".to_string(), query.to_string())];
        let body = self.execute(&Endpoint::Search, params, None, None).await?;
        decode(&Endpoint::Search, &body)
    }

    /// Looks up a movie by its external catalog id.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures.
    pub async fn movie_by_tmdb_id(&self, tmdb_id: u64) -> Result<Movie> {
        let endpoint = Endpoint::MovieByTmdbId(tmdb_id);
        let body = self.execute(&endpoint, Vec::new(), None, None).await?;
        decode(&endpoint, &body)
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures. Validation is the caller's job.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let body = self
            .execute(&Endpoint::Register, Vec::new(), Some(to_body(registration)?), None)
            .await?;
        if body.trim().is_empty() {
            return Ok(AuthResponse::default());
        }
        decode(&Endpoint::Register, &body)
    }

    /// Exchanges credentials for a token.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures. Bad credentials surface as
    /// [`CinelistError::Rejected`], not as an expired session.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let body = self
            .execute(&Endpoint::Login, Vec::new(), Some(credentials.to_body()), None)
            .await?;
        decode(&Endpoint::Login, &body)
    }

    /// Reads the profile of the session user.
    ///
    /// # Errors
    ///
    /// [`CinelistError::AuthExpired`] without a session or on 401, plus
    /// transport, rejection or decode failures.
    pub async fn profile(&self) -> Result<UserProfile> {
        let body = self.execute(&Endpoint::ProfileRead, Vec::new(), None, None).await?;
        decode(&Endpoint::ProfileRead, &body)
    }

    /// Reads the profile using an explicit token instead of the session's.
    ///
    /// Used to turn a persisted or freshly issued token into a full session.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn profile_with_token(&self, token: &str) -> Result<UserProfile> {
        let body = self
            .execute(&Endpoint::ProfileRead, Vec::new(), None, Some(token.to_string()))
            .await?;
        decode(&Endpoint::ProfileRead, &body)
    }

    /// Updates the editable profile fields and returns the stored profile.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        let body = self
            .execute(&Endpoint::ProfileUpdate, Vec::new(), Some(to_body(update)?), None)
            .await?;
        decode(&Endpoint::ProfileUpdate, &body)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn watchlist(&self) -> Result<Vec<Movie>> {
        let body = self.execute(&Endpoint::WatchlistRead, Vec::new(), None, None).await?;
        decode(&Endpoint::WatchlistRead, &body)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn add_to_watchlist(&self, movie_id: &str) -> Result<()> {
        self.mutate_list(Endpoint::WatchlistAdd, movie_id).await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn remove_from_watchlist(&self, movie_id: &str) -> Result<()> {
        self.mutate_list(Endpoint::WatchlistRemove, movie_id).await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn seenlist(&self) -> Result<Vec<Movie>> {
        let body = self.execute(&Endpoint::SeenlistRead, Vec::new(), None, None).await?;
        decode(&Endpoint::SeenlistRead, &body)
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn add_to_seenlist(&self, movie_id: &str) -> Result<()> {
        self.mutate_list(Endpoint::SeenlistAdd, movie_id).await
    }

    /// All comments on a movie, in server order.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures.
    pub async fn comments_for_movie(&self, movie_id: &str) -> Result<Vec<Comment>> {
        let endpoint = Endpoint::CommentsForMovie(movie_id.to_string());
        let body = self.execute(&endpoint, Vec::new(), None, None).await?;
        decode(&endpoint, &body)
    }

    /// Posts a validated comment.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::profile`].
    pub async fn create_comment(&self, draft: &CommentDraft) -> Result<()> {
        self.execute(&Endpoint::CommentCreate, Vec::new(), Some(to_body(draft)?), None)
            .await
            .map(drop)
    }

    async fn mutate_list(&self, endpoint: Endpoint, movie_id: &str) -> Result<()> {
        let body = to_body(&MovieRefBody { movie_id })?;
        self.execute(&endpoint, Vec::new(), Some(body), None).await.map(drop)
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
        token_override: Option<String>,
    ) -> Result<String> {
        let span = tracing::debug_span!(
            "api_call",
            endpoint = endpoint.name(),
            method = %endpoint.method(),
            status = tracing::field::Empty,
        );

        async move {
            let bearer = if endpoint.requires_auth() {
                let Some(token) = token_override.or_else(|| self.session.token()) else {
                    tracing::debug!("no session token held");
                    return Err(CinelistError::AuthExpired);
                };
                Some(token)
            } else {
                None
            };

            let request = ApiRequest {
                method: endpoint.method(),
                path: endpoint.path(),
                query,
                body,
                bearer,
            };

            let response = self.transport.send(request).await.map_err(|e| {
                tracing::warn!(error = %e, "request failed");
                e
            })?;
            tracing::Span::current().record("status", response.status);

            self.interpret(endpoint, response)
        }
        .instrument(span)
        .await
    }

    fn interpret(&self, endpoint: &Endpoint, response: ApiResponse) -> Result<String> {
        if response.is_success() {
            return Ok(response.body);
        }

        if response.status == 401 && endpoint.requires_auth() {
            tracing::info!("token rejected, clearing session");
            self.session.clear();
            return Err(CinelistError::AuthExpired);
        }

        let message = rejection_message(&response);
        tracing::warn!(status = response.status, message = %message, "request rejected");
        Err(CinelistError::Rejected {
            status: response.status,
            message,
        })
    }
}

fn rejection_message(response: &ApiResponse) -> String {
    serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(endpoint = endpoint.name(), error = %e, "undecodable response");
        CinelistError::Decode(format!("{}: {e}", endpoint.name()))
    })
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| CinelistError::Decode(format!("failed to encode body: {e}")))
}
