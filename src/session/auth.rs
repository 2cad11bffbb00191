//! Account flows: login, registration, restore and logout.
//!
//! Each flow validates its form locally first, so a rejected form never
//! reaches the network.

use crate::api::ApiClient;
use crate::domain::error::{CinelistError, Result};
use crate::domain::{Credentials, Registration, Session, UserProfile};
use crate::session::SessionStore;

/// What happened after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The server issued a token and the session is populated.
    LoggedIn(UserProfile),
    /// The account exists but the user has to log in explicitly.
    LoginRequired,
}

/// Logs in and populates the session.
///
/// When the login answer omits the user, the profile is read with the new
/// token before the session is installed.
///
/// # Errors
///
/// - [`CinelistError::Validation`] for a blank identifier or password
/// - [`CinelistError::Rejected`] for bad credentials
/// - [`CinelistError::Decode`] when the answer carries no token
pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<UserProfile> {
    credentials.validate()?;

    let response = api.login(credentials).await?;
    let token = response
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CinelistError::Decode("login: response carried no token".to_string()))?;

    establish(api, token, response.user).await
}

/// Registers an account.
///
/// # Errors
///
/// - [`CinelistError::Validation`] for an empty username, malformed email or
///   short password
/// - transport and rejection failures from the server
pub async fn register(api: &ApiClient, registration: &Registration) -> Result<RegisterOutcome> {
    registration.validate()?;

    let response = api.register(registration).await?;
    match response.token.filter(|t| !t.is_empty()) {
        Some(token) => {
            let user = establish(api, token, response.user).await?;
            Ok(RegisterOutcome::LoggedIn(user))
        }
        None => {
            tracing::info!(username = %registration.username, "registered, login required");
            Ok(RegisterOutcome::LoginRequired)
        }
    }
}

/// Turns a token persisted by an earlier run into a full session.
///
/// Returns `Ok(None)` when nothing is persisted or the server no longer
/// accepts the token; in the latter case the stored token is wiped.
///
/// # Errors
///
/// Transport failures leave the persisted token in place and are returned.
pub async fn restore(api: &ApiClient) -> Result<Option<UserProfile>> {
    let Some(token) = api.session().persisted_token() else {
        tracing::debug!("no persisted token");
        return Ok(None);
    };

    match api.profile_with_token(&token).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "session restored");
            api.session().set(Session::new(token, user.clone()));
            Ok(Some(user))
        }
        Err(CinelistError::AuthExpired) => {
            tracing::info!("persisted token rejected");
            api.session().clear();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Ends the session and wipes the persisted token.
pub fn logout(session: &SessionStore) {
    tracing::info!("logout");
    session.clear();
}

async fn establish(api: &ApiClient, token: String, user: Option<UserProfile>) -> Result<UserProfile> {
    let user = match user {
        Some(user) => user,
        None => api.profile_with_token(&token).await?,
    };
    tracing::info!(user_id = %user.id, "logged in");
    api.session().set(Session::new(token, user.clone()));
    Ok(user)
}
