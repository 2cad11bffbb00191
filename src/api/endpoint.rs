//! Catalog of remote operations.
//!
//! Every request the client makes is one of the [`Endpoint`] variants. Path
//! parameters travel inside the variant; query strings and bodies are supplied
//! by [`ApiClient`](super::ApiClient).

use std::fmt;

/// HTTP verbs used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Patch => Self::PATCH,
        }
    }
}

/// A remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Default catalog listing shown for blank search input.
    Popular,
    /// Free-text catalog search; the text goes in the `query` parameter.
    Search,
    /// Movie lookup by external catalog id.
    MovieByTmdbId(u64),
    Register,
    Login,
    ProfileRead,
    ProfileUpdate,
    WatchlistRead,
    WatchlistAdd,
    WatchlistRemove,
    SeenlistRead,
    SeenlistAdd,
    CommentsForMovie(String),
    CommentCreate,
}

impl Endpoint {
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::Popular
            | Self::Search
            | Self::MovieByTmdbId(_)
            | Self::ProfileRead
            | Self::WatchlistRead
            | Self::SeenlistRead
            | Self::CommentsForMovie(_) => HttpMethod::Get,
            Self::Register
            | Self::Login
            | Self::WatchlistAdd
            | Self::WatchlistRemove
            | Self::SeenlistAdd
            | Self::CommentCreate => HttpMethod::Post,
            Self::ProfileUpdate => HttpMethod::Patch,
        }
    }

    /// Path relative to the API base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelist::api::Endpoint;
    ///
    /// assert_eq!(Endpoint::MovieByTmdbId(603).path(), "/movies/tmdb/603");
    /// assert_eq!(Endpoint::SeenlistAdd.path(), "/users/mylist");
    /// ```
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Popular => "/tmdb/popular".to_string(),
            Self::Search => "/tmdb/search".to_string(),
            Self::MovieByTmdbId(id) => format!("/movies/tmdb/{id}"),
            Self::Register => "/users/register".to_string(),
            Self::Login => "/users/login".to_string(),
            Self::ProfileRead | Self::ProfileUpdate => "/users/profile".to_string(),
            Self::WatchlistRead | Self::WatchlistAdd => "/users/watchlist".to_string(),
            Self::WatchlistRemove => "/users/watchlist/remove".to_string(),
            Self::SeenlistRead => "/users/seenlist".to_string(),
            Self::SeenlistAdd => "/users/mylist".to_string(),
            Self::CommentsForMovie(movie_id) => format!("/comments/movie/{movie_id}"),
            Self::CommentCreate => "/comments".to_string(),
        }
    }

    /// Whether the request must carry the session's bearer token.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::ProfileRead
                | Self::ProfileUpdate
                | Self::WatchlistRead
                | Self::WatchlistAdd
                | Self::WatchlistRemove
                | Self::SeenlistRead
                | Self::SeenlistAdd
                | Self::CommentCreate
        )
    }

    /// Short stable name used in spans and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Search => "search",
            Self::MovieByTmdbId(_) => "movie_by_tmdb_id",
            Self::Register => "register",
            Self::Login => "login",
            Self::ProfileRead => "profile_read",
            Self::ProfileUpdate => "profile_update",
            Self::WatchlistRead => "watchlist_read",
            Self::WatchlistAdd => "watchlist_add",
            Self::WatchlistRemove => "watchlist_remove",
            Self::SeenlistRead => "seenlist_read",
            Self::SeenlistAdd => "seenlist_add",
            Self::CommentsForMovie(_) => "comments_for_movie",
            Self::CommentCreate => "comment_create",
        }
    }
}
