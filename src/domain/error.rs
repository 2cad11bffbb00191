//! Error types for the cinelist client core.
//!
//! This module defines the centralized error type [`CinelistError`], the
//! [`ValidationError`] reasons that are rejected locally before any network
//! call, and the [`ErrorKind`] classifier the application layer uses to decide
//! how a failure is reported. All errors are implemented with `thiserror`.

use thiserror::Error;

/// Maximum length of a comment body, in characters.
pub const MAX_COMMENT_CHARS: usize = 70;

/// Minimum password length accepted by registration.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Reasons an operation was rejected locally, before touching the network.
///
/// Every variant maps to a precondition of a user-facing operation. They are
/// reported to the caller as structured reasons rather than free text so the
/// presentation layer can highlight the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Comment body is empty or whitespace-only.
    #[error("comment must not be empty")]
    EmptyComment,

    /// Comment body exceeds [`MAX_COMMENT_CHARS`].
    #[error("comment is {len} characters long, the limit is {max}")]
    CommentTooLong {
        /// Length of the trimmed comment in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Rating is outside `1..=5`.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    /// The current user already holds a comment on this movie.
    #[error("you have already commented on this movie")]
    AlreadyCommented,

    /// Submission attempted before the movie's comments were loaded.
    #[error("comments for this movie have not been loaded")]
    CommentsNotLoaded,

    /// Username is empty or whitespace-only.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Email address does not look like `local@domain.tld`.
    #[error("invalid email address")]
    InvalidEmail,

    /// Password is shorter than [`MIN_PASSWORD_CHARS`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// Login identifier (email or username) or password is missing.
    #[error("email/username and password are required")]
    MissingCredentials,
}

/// Coarse classification of a [`CinelistError`].
///
/// The application layer turns each kind into a different user-facing
/// outcome. Only [`ErrorKind::AuthExpired`] has an effect beyond the local
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally; no request was made.
    Validation,
    /// Network failure, server rejection or undecodable response. Recoverable.
    Transport,
    /// The held session token is no longer valid.
    AuthExpired,
    /// A multi-step mutation stopped after an earlier step succeeded.
    PartialFailure,
    /// Configuration, storage or I/O failure inside the client itself.
    Internal,
}

/// The main error type for cinelist operations.
#[derive(Debug, Error)]
pub enum CinelistError {
    /// Input failed a local precondition.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status other than 401.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or the status reason when absent.
        message: String,
    },

    /// The server rejected the session token, or none was held.
    ///
    /// By the time this error is observed the session store has already been
    /// cleared.
    #[error("Session expired, please log in again")]
    AuthExpired,

    /// A sequence of mutations stopped half way.
    ///
    /// The completed step is not rolled back; the observable state is whatever
    /// the server holds after a re-fetch.
    #[error("Partial failure: {completed} succeeded but {failed}")]
    PartialFailure {
        /// Description of the step that went through.
        completed: String,
        /// Description of the step that failed, including its cause.
        failed: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The token store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CinelistError {
    /// Classifies the error for reporting.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) | Self::Rejected { .. } | Self::Decode(_) => ErrorKind::Transport,
            Self::AuthExpired => ErrorKind::AuthExpired,
            Self::PartialFailure { .. } => ErrorKind::PartialFailure,
            Self::Storage(_) | Self::Io(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` for [`CinelistError::AuthExpired`].
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// A specialized `Result` type for cinelist operations.
pub type Result<T> = std::result::Result<T, CinelistError>;
