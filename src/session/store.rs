//! Process-wide session holder.

use crate::domain::{Session, UserProfile};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Shared handle to the current [`Session`].
///
/// Clones observe the same state. Only the token is persisted, through the
/// optional [`KeyValueStore`]; the profile is re-read from the server when a
/// persisted token is restored.
///
/// Persistence failures are logged and never fail the in-memory update: the
/// session is authoritative, the stored token is a convenience.
///
/// # Examples
///
/// ```
/// use cinelist::domain::{Role, Session, UserProfile};
/// use cinelist::session::SessionStore;
///
/// let store = SessionStore::in_memory();
/// let user = UserProfile { id: "u1".into(), username: "ana".into(), role: Role::User, email: None };
/// store.set(Session::new("tok".into(), user));
///
/// assert_eq!(store.token().as_deref(), Some("tok"));
/// store.clear();
/// assert!(!store.is_authenticated());
/// ```
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    persistence: Option<Arc<Mutex<dyn KeyValueStore>>>,
}

impl SessionStore {
    /// A store whose token does not outlive the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            persistence: None,
        }
    }

    /// A store that writes the token through to `backend`.
    pub fn persistent<S: KeyValueStore + 'static>(backend: S) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            persistence: Some(Arc::new(Mutex::new(backend))),
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Installs `session` and persists its token.
    pub fn set(&self, session: Session) {
        tracing::debug!(user_id = %session.user.id, "session established");
        let token = session.token.clone();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.with_backend("persist token", |backend| backend.set_item(TOKEN_KEY, &token));
    }

    /// Drops the session and wipes the persisted token. Idempotent.
    pub fn clear(&self) {
        let previous = self.current.write().unwrap_or_else(PoisonError::into_inner).take();
        if previous.is_some() {
            tracing::debug!("session cleared");
        }
        self.with_backend("clear persisted token", |backend| backend.clear());
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    /// Replaces the cached profile. Ignored when no session is held.
    pub fn update_user(&self, profile: UserProfile) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(session) => session.user = profile,
            None => tracing::debug!("profile update ignored, no session"),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Token left behind by a previous process, if any.
    #[must_use]
    pub fn persisted_token(&self) -> Option<String> {
        let backend = self.persistence.as_ref()?;
        let guard = backend.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token");
                None
            }
        }
    }

    fn with_backend<F>(&self, what: &str, op: F)
    where
        F: FnOnce(&mut dyn KeyValueStore) -> crate::Result<()>,
    {
        let Some(backend) = &self.persistence else {
            return;
        };
        let mut guard = backend.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = op(&mut *guard) {
            tracing::warn!(error = %e, "failed to {what}");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.get())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}
