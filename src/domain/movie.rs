//! Movie domain model.
//!
//! A [`Movie`] is the catalog entry returned by listing, search and lookup
//! endpoints as well as the element type of the watchlist and seenlist. The
//! client never mutates movies; the two average ratings are recomputed by the
//! server.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a rating has not been computed yet.
const MISSING_RATING: &str = "–";

/// A catalog movie.
///
/// `id` is the server's internal identifier (`_id` on the wire) and is what
/// list membership and comments refer to. Catalog listings coming straight
/// from the external catalog may not carry one yet, in which case it is empty
/// and `tmdb_id` is the only usable key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub tmdb_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub average_user_rating: Option<f64>,
    #[serde(default)]
    pub average_critic_rating: Option<f64>,
}

impl Movie {
    /// Creates a movie with only its identifiers and title set.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelist::domain::Movie;
    ///
    /// let movie = Movie::new("m7", 603, "The Matrix");
    /// assert_eq!(movie.tmdb_id, 603);
    /// assert!(movie.categories.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, tmdb_id: u64, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tmdb_id,
            title: title.into(),
            poster_url: None,
            description: None,
            release_date: None,
            categories: Vec::new(),
            cast: Vec::new(),
            average_user_rating: None,
            average_critic_rating: None,
        }
    }

    /// Formats the user average with one decimal, or a dash when absent.
    #[must_use]
    pub fn user_rating_label(&self) -> String {
        format_rating(self.average_user_rating)
    }

    /// Formats the critic average with one decimal, or a dash when absent.
    #[must_use]
    pub fn critic_rating_label(&self) -> String {
        format_rating(self.average_critic_rating)
    }
}

fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| MISSING_RATING.to_string(), |r| format!("{r:.1}"))
}
