//! One rating/comment per user per movie.
//!
//! A loaded [`CommentThread`] splits the movie's comments into the current
//! user's own comment and everybody else's. Submission is gated on that split:
//! a user holding a comment cannot post another one.

use crate::api::ApiClient;
use crate::domain::error::{Result, ValidationError};
use crate::domain::{Comment, CommentDraft};

/// A movie's comments, partitioned around the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    pub movie_id: String,
    /// First comment authored by the current user, if any.
    pub own_comment: Option<Comment>,
    /// Comments by other users, in server order.
    pub other_comments: Vec<Comment>,
}

impl CommentThread {
    /// Partitions `comments` in one pass.
    ///
    /// The first comment whose author is `user_id` becomes the own comment.
    /// Further comments by the same author are neither own nor other and are
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelist::comments::CommentThread;
    /// use cinelist::domain::{Comment, Role};
    ///
    /// let comment = |id: &str, user: &str| Comment {
    ///     id: id.into(),
    ///     movie_id: "m1".into(),
    ///     user_id: user.into(),
    ///     username: user.into(),
    ///     role: Role::User,
    ///     rating: 4,
    ///     content: "good".into(),
    /// };
    ///
    /// let thread = CommentThread::partition("m1", Some("u1"), vec![comment("c1", "u2"), comment("c2", "u1")]);
    /// assert_eq!(thread.own_comment.map(|c| c.id).as_deref(), Some("c2"));
    /// assert_eq!(thread.other_comments.len(), 1);
    /// ```
    #[must_use]
    pub fn partition(movie_id: impl Into<String>, user_id: Option<&str>, comments: Vec<Comment>) -> Self {
        let mut own_comment = None;
        let mut other_comments = Vec::with_capacity(comments.len());

        for comment in comments {
            let is_own = user_id.is_some_and(|id| !id.is_empty() && comment.user_id == id);
            if !is_own {
                other_comments.push(comment);
            } else if own_comment.is_none() {
                own_comment = Some(comment);
            } else {
                tracing::debug!(comment_id = %comment.id, "extra comment by current user ignored");
            }
        }

        Self {
            movie_id: movie_id.into(),
            own_comment,
            other_comments,
        }
    }

    #[must_use]
    pub const fn has_commented(&self) -> bool {
        self.own_comment.is_some()
    }

    /// Number of comments shown, own included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.other_comments.len() + usize::from(self.own_comment.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads threads and gates submissions.
#[derive(Debug)]
pub struct CommentReconciler {
    api: ApiClient,
    thread: Option<CommentThread>,
    user_id: Option<String>,
}

impl CommentReconciler {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            thread: None,
            user_id: None,
        }
    }

    #[must_use]
    pub const fn thread(&self) -> Option<&CommentThread> {
        self.thread.as_ref()
    }

    /// Fetches and partitions the comments of `movie_id`.
    ///
    /// On failure the previously loaded thread is kept.
    ///
    /// # Errors
    ///
    /// Transport, rejection or decode failures.
    pub async fn load(&mut self, movie_id: &str, user_id: &str) -> Result<&CommentThread> {
        let comments = self.api.comments_for_movie(movie_id).await?;
        let thread = CommentThread::partition(movie_id, Some(user_id), comments);
        tracing::debug!(
            movie_id,
            comments = thread.len(),
            has_commented = thread.has_commented(),
            "comments loaded"
        );

        self.user_id = Some(user_id.to_string());
        Ok(self.thread.insert(thread))
    }

    /// Posts a comment and reloads the thread.
    ///
    /// Checks run in order and any violation returns before a request is made:
    /// the thread for `movie_id` must be loaded, the user must not already
    /// hold a comment, the trimmed content must be 1 to 70 characters and the
    /// rating 1 to 5.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`] reasons for the checks above
    /// - failures of the post or of the reload
    pub async fn submit(&mut self, movie_id: &str, content: &str, rating: u8) -> Result<&CommentThread> {
        let (Some(thread), Some(user_id)) = (&self.thread, &self.user_id) else {
            return Err(ValidationError::CommentsNotLoaded.into());
        };
        if thread.movie_id != movie_id {
            return Err(ValidationError::CommentsNotLoaded.into());
        }
        if thread.has_commented() {
            return Err(ValidationError::AlreadyCommented.into());
        }

        let draft = CommentDraft::new(movie_id, content, rating)?;
        let user_id = user_id.clone();

        self.api.create_comment(&draft).await?;
        tracing::info!(movie_id, rating, "comment posted");

        self.load(movie_id, &user_id).await
    }
}
