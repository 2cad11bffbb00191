//! Membership classification.

use crate::domain::Movie;
use std::fmt;

/// Where a movie sits in the user's lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Membership {
    #[default]
    None,
    Watchlist,
    Seen,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "not listed",
            Self::Watchlist => "watch later",
            Self::Seen => "seen",
        })
    }
}

/// The user's two remote lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieLists {
    pub watchlist: Vec<Movie>,
    pub seenlist: Vec<Movie>,
}

impl MovieLists {
    #[must_use]
    pub fn membership_of(&self, movie_id: &str) -> Membership {
        classify(movie_id, &self.watchlist, &self.seenlist)
    }
}

/// Classifies `movie_id` against the two lists by id.
///
/// The seenlist wins when a movie appears in both, which only happens after a
/// partially applied transition.
///
/// # Examples
///
/// ```
/// use cinelist::domain::Movie;
/// use cinelist::engagement::{classify, Membership};
///
/// let heat = Movie::new("m1", 949, "Heat");
/// assert_eq!(classify("m1", &[heat.clone()], &[]), Membership::Watchlist);
/// assert_eq!(classify("m1", &[heat.clone()], &[heat]), Membership::Seen);
/// assert_eq!(classify("m2", &[], &[]), Membership::None);
/// ```
#[must_use]
pub fn classify(movie_id: &str, watchlist: &[Movie], seenlist: &[Movie]) -> Membership {
    let contains = |list: &[Movie]| !movie_id.is_empty() && list.iter().any(|m| m.id == movie_id);
    if contains(seenlist) {
        Membership::Seen
    } else if contains(watchlist) {
        Membership::Watchlist
    } else {
        Membership::None
    }
}
