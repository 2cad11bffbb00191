//! Comment model and the validated submission draft.
//!
//! The comments endpoint returns the author either populated
//! (`"userId": {"_id": .., "username": .., "role": ..}`) or as flat fields
//! (`"userId": "..", "username": ..`). Both shapes decode into the same
//! [`Comment`].

use super::error::{ValidationError, MAX_COMMENT_CHARS};
use super::user::Role;
use serde::{Deserialize, Serialize};

/// A rating plus short review left by one user on one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireComment")]
pub struct Comment {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub rating: u8,
    pub content: String,
}

impl Comment {
    /// Star string for the rating, e.g. `★★★ (3/5)`.
    #[must_use]
    pub fn stars(&self) -> String {
        format!("{} ({}/5)", "★".repeat(usize::from(self.rating)), self.rating)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRef {
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        username: String,
        #[serde(default)]
        role: Role,
    },
    Id(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MovieRef {
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
    Id(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireComment {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    movie_id: Option<MovieRef>,
    user_id: AuthorRef,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    rating: u8,
    #[serde(default)]
    content: String,
}

impl From<WireComment> for Comment {
    fn from(wire: WireComment) -> Self {
        let movie_id = match wire.movie_id {
            Some(MovieRef::Populated { id } | MovieRef::Id(id)) => id,
            None => String::new(),
        };
        let (user_id, username, role) = match wire.user_id {
            AuthorRef::Populated { id, username, role } => (
                id,
                wire.username.unwrap_or(username),
                wire.role.unwrap_or(role),
            ),
            AuthorRef::Id(id) => (
                id,
                wire.username.unwrap_or_default(),
                wire.role.unwrap_or_default(),
            ),
        };
        Self {
            id: wire.id,
            movie_id,
            user_id,
            username,
            role,
            rating: wire.rating,
            content: wire.content,
        }
    }
}

/// A comment that passed local validation and is ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub movie_id: String,
    pub content: String,
    pub rating: u8,
}

impl CommentDraft {
    /// Validates and builds a draft. The content is stored trimmed.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyComment`] for blank content
    /// - [`ValidationError::CommentTooLong`] past [`MAX_COMMENT_CHARS`]
    /// - [`ValidationError::RatingOutOfRange`] outside `1..=5`
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelist::domain::{CommentDraft, ValidationError};
    ///
    /// let draft = CommentDraft::new("m1", "  great  ", 5).unwrap();
    /// assert_eq!(draft.content, "great");
    /// assert_eq!(
    ///     CommentDraft::new("m1", "great", 0),
    ///     Err(ValidationError::RatingOutOfRange(0))
    /// );
    /// ```
    pub fn new(movie_id: impl Into<String>, content: &str, rating: u8) -> Result<Self, ValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        let len = content.chars().count();
        if len > MAX_COMMENT_CHARS {
            return Err(ValidationError::CommentTooLong { len, max: MAX_COMMENT_CHARS });
        }
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        Ok(Self {
            movie_id: movie_id.into(),
            content: content.to_string(),
            rating,
        })
    }
}
