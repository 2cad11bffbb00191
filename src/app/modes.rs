//! Screen and tab state types.
//!
//! The client moves between five screens. Login and Register are reachable
//! without a session; every other screen requires one, and an expired session
//! sends the user back to Login.

use std::fmt;

/// Screen currently shown by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Login,
    Register,
    /// Catalog listing with the search bar.
    Home,
    MovieDetail,
    Profile,
}

impl Screen {
    /// Whether the screen can only be shown with an active session.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Home => "home",
            Self::MovieDetail => "movie",
            Self::Profile => "profile",
        })
    }
}

/// Which list the profile screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    /// "Watch later".
    #[default]
    Watchlist,
    Seen,
}

impl fmt::Display for ProfileTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Watchlist => "watch later",
            Self::Seen => "seen",
        })
    }
}
