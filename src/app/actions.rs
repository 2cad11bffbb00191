//! Actions the presentation layer carries out after an event.
//!
//! [`handle_event`](super::handle_event) returns a `Vec<Action>`; the caller
//! executes them in order. The core never navigates or shows dialogs itself.

use super::modes::Screen;
use crate::domain::error::{CinelistError, ErrorKind};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Commands for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The session is gone. Discard any per-screen state and history and
    /// show the login screen.
    ResetToLogin,

    /// Show a screen.
    Navigate(Screen),

    /// Show a message.
    Notify(Notice),
}

/// Converts a failure into the actions reporting it.
///
/// | Kind | Actions |
/// |---|---|
/// | auth expired | `ResetToLogin`, `Navigate(Login)`, error notice |
/// | validation | error notice with the reason |
/// | transport / rejection | error notice with the server message |
/// | partial failure | error notice naming the completed step |
/// | internal | error notice |
///
/// # Examples
///
/// ```
/// use cinelist::app::{failure_actions, Action, Screen};
/// use cinelist::CinelistError;
///
/// let actions = failure_actions(&CinelistError::AuthExpired);
/// assert_eq!(actions[0], Action::ResetToLogin);
/// assert_eq!(actions[1], Action::Navigate(Screen::Login));
/// ```
#[must_use]
pub fn failure_actions(error: &CinelistError) -> Vec<Action> {
    match (error.kind(), error) {
        (ErrorKind::AuthExpired, _) => vec![
            Action::ResetToLogin,
            Action::Navigate(Screen::Login),
            Action::Notify(Notice::error(error.to_string())),
        ],
        (_, CinelistError::Validation(reason)) => vec![Action::Notify(Notice::error(reason.to_string()))],
        (_, CinelistError::Rejected { message, .. }) => vec![Action::Notify(Notice::error(message.clone()))],
        (ErrorKind::PartialFailure, CinelistError::PartialFailure { completed, failed }) => {
            vec![Action::Notify(Notice::error(format!("{completed}, but {failed}")))]
        }
        _ => vec![Action::Notify(Notice::error(error.to_string()))],
    }
}
