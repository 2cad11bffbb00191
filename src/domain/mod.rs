//! Domain layer: catalog, user and comment models plus the error taxonomy.
//!
//! Nothing in here performs I/O. The types are shared by the API client, the
//! controllers and the application layer.
//!
//! # Organization
//!
//! - [`error`]: Error types, validation reasons and the result alias
//! - [`movie`]: Catalog movie model
//! - [`user`]: Profiles, sessions and account forms
//! - [`comment`]: Comments and the validated submission draft

pub mod comment;
pub mod error;
pub mod movie;
pub mod user;

pub use comment::{Comment, CommentDraft};
pub use error::{CinelistError, ErrorKind, Result, ValidationError, MAX_COMMENT_CHARS};
pub use movie::Movie;
pub use user::{Credentials, ProfileUpdate, Registration, Role, Session, UserProfile};
