//! User, session and account-form models.
//!
//! [`UserProfile`] is the client's cached copy of the server-side profile and
//! [`Session`] pairs it with the opaque bearer token. The form types
//! ([`Credentials`], [`Registration`], [`ProfileUpdate`]) validate themselves
//! before anything is sent.

use super::error::{ValidationError, MIN_PASSWORD_CHARS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Critics' ratings feed a separate average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Critic,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Critic => "critic",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "critic" => Ok(Self::Critic),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Server-side user profile as cached by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Exists only while the user is logged in and is owned by
/// [`SessionStore`](crate::session::SessionStore).
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    #[must_use]
    pub const fn new(token: String, user: UserProfile) -> Self {
        Self { token, user }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Login form: an email address or a username plus a password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Checks that both fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCredentials`] when either is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.identifier.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }

    /// Request body for the login endpoint.
    ///
    /// Identifiers containing `@` are sent as `email`, anything else as
    /// `username`.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let identifier = self.identifier.trim();
        let field = if identifier.contains('@') { "email" } else { "username" };
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), identifier.into());
        body.insert("password".to_string(), self.password.clone().into());
        serde_json::Value::Object(body)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    /// Validates every field of the form.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: empty username, malformed email, or a
    /// password shorter than [`MIN_PASSWORD_CHARS`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_CHARS });
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Editable part of the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub role: Role,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUsername`] for a blank username.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        Ok(())
    }
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            role: profile.role,
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
