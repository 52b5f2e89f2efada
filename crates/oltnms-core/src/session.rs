// ── Session store and route guard ──
//
// Owns the authenticated/anonymous state derived from credential storage.
// Storage is read once at `init`; afterwards the session is the only
// writer, and every transition is published on a `watch` channel.

use std::sync::Arc;

use oltnms_api::types::{LoginResponse, User};
use oltnms_api::{CredentialStorage, TOKEN_KEY, USER_KEY, UnauthorizedHandler};
use secrecy::SecretString;
use strum::{Display, EnumString};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Who is using the frontend right now.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated { user: Arc<User> },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Authenticated { user } => Some(user),
            Self::Anonymous => None,
        }
    }
}

/// Frontend screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Olts,
    Onus,
    Provisioning,
    Alarms,
    ActivityLogs,
    Maps,
}

impl Route {
    /// Routes reachable without a session.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Landing | Self::Login | Self::Register)
    }
}

/// A navigation the frontend must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The session ended (logout or rejected token).
    Login,
    /// A login succeeded.
    Dashboard,
}

/// Returned by [`Session::guard`] when a route needs a different screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("redirect to {0}")]
pub struct Redirect(pub Route);

/// Application-level session context.
pub struct Session {
    storage: Arc<dyn CredentialStorage>,
    state: watch::Sender<AuthState>,
    nav: broadcast::Sender<Navigation>,
}

impl Session {
    /// Read `token` and `user` from storage once.
    ///
    /// A token without a parseable cached user, or a user without a token,
    /// is discarded: both keys are removed and the session starts anonymous.
    pub fn init(storage: Arc<dyn CredentialStorage>) -> Self {
        let initial = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(raw)) if !token.is_empty() => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user = %user.email, "restored session from storage");
                    AuthState::Authenticated { user: Arc::new(user) }
                }
                Err(e) => {
                    warn!(error = %e, "cached user unreadable, discarding session");
                    discard(storage.as_ref());
                    AuthState::Anonymous
                }
            },
            (Some(_), _) => {
                warn!("token without cached user, discarding session");
                discard(storage.as_ref());
                AuthState::Anonymous
            }
            (None, Some(_)) => {
                debug!("cached user without token, discarding");
                discard(storage.as_ref());
                AuthState::Anonymous
            }
            (None, None) => AuthState::Anonymous,
        };

        let (state, _) = watch::channel(initial);
        let (nav, _) = broadcast::channel(16);
        Self { storage, state, nav }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.state.borrow().user().cloned()
    }

    /// The stored bearer token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.storage.get(TOKEN_KEY).map(SecretString::from)
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn navigation(&self) -> broadcast::Receiver<Navigation> {
        self.nav.subscribe()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Persist a successful login and enter the authenticated state.
    pub fn establish(&self, login: LoginResponse) -> Result<Arc<User>, CoreError> {
        let encoded = serde_json::to_string(&login.user)
            .map_err(|e| CoreError::Internal(format!("cannot encode user: {e}")))?;
        self.storage.set(TOKEN_KEY, &login.access_token)?;
        self.storage.set(USER_KEY, &encoded)?;

        let user = Arc::new(login.user);
        info!(user = %user.email, role = %user.role, "logged in");
        self.state.send_replace(AuthState::Authenticated { user: user.clone() });
        let _ = self.nav.send(Navigation::Dashboard);
        Ok(user)
    }

    /// Remove stored credentials and become anonymous.
    pub fn teardown(&self) -> Result<(), CoreError> {
        let result = self.storage.clear_session();
        self.leave();
        result.map_err(CoreError::from)
    }

    /// Handle a rejected token. Storage has already been cleared by the
    /// client; only the transition and the redirect remain.
    pub fn expire(&self) {
        if self.leave() {
            warn!("session expired, login required");
        }
    }

    /// Transition to anonymous. Emits `Navigation::Login` only when this
    /// call performed the transition, so concurrent 401s redirect once.
    fn leave(&self) -> bool {
        let changed = self.state.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = AuthState::Anonymous;
                true
            } else {
                false
            }
        });
        if changed {
            let _ = self.nav.send(Navigation::Login);
        }
        changed
    }

    /// Decide whether `route` may be shown.
    pub fn guard(&self, route: Route) -> Result<(), Redirect> {
        if route.is_public() || self.is_authenticated() {
            Ok(())
        } else {
            Err(Redirect(Route::Login))
        }
    }
}

impl UnauthorizedHandler for Session {
    fn on_unauthorized(&self) {
        self.expire();
    }
}

fn discard(storage: &dyn CredentialStorage) {
    if let Err(e) = storage.clear_session() {
        warn!(error = %e, "failed to clear stale credentials");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use oltnms_api::MemoryStorage;
    use oltnms_api::types::Role;
    use secrecy::ExposeSecret;

    use super::*;

    fn admin() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Admin", "email": "admin@example.com", "role": "admin"
        }))
        .unwrap()
    }

    fn login_response() -> LoginResponse {
        LoginResponse {
            access_token: "tok123".into(),
            token_type: "bearer".into(),
            user: admin(),
        }
    }

    #[test]
    fn empty_storage_is_anonymous() {
        let session = Session::init(Arc::new(MemoryStorage::new()));
        assert_eq!(session.state(), AuthState::Anonymous);
        assert!(session.token().is_none());
    }

    #[test]
    fn restores_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok123").unwrap();
        storage
            .set(USER_KEY, &serde_json::to_string(&admin()).unwrap())
            .unwrap();

        let session = Session::init(storage);
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().role, Role::Admin);
        assert_eq!(session.token().unwrap().expose_secret(), "tok123");
    }

    #[test]
    fn corrupt_user_discards_token() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok123").unwrap();
        storage.set(USER_KEY, "{broken").unwrap();

        let session = Session::init(storage.clone());
        assert!(!session.is_authenticated());
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
    }

    #[test]
    fn orphaned_user_is_removed() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(USER_KEY, &serde_json::to_string(&admin()).unwrap())
            .unwrap();

        let session = Session::init(storage.clone());
        assert_eq!(session.state(), AuthState::Anonymous);
        assert!(storage.get(USER_KEY).is_none());
    }

    #[test]
    fn establish_persists_token_and_user() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::init(storage.clone());
        let mut nav = session.navigation();

        session.establish(login_response()).unwrap();

        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok123"));
        let cached: serde_json::Value = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
        assert_eq!(cached["role"], "admin");
        assert!(session.is_authenticated());
        assert_eq!(nav.try_recv().unwrap(), Navigation::Dashboard);
    }

    #[test]
    fn repeated_expiry_redirects_once() {
        let session = Session::init(Arc::new(MemoryStorage::new()));
        session.establish(login_response()).unwrap();
        let mut nav = session.navigation();

        session.on_unauthorized();
        session.on_unauthorized();
        session.expire();

        assert_eq!(nav.try_recv().unwrap(), Navigation::Login);
        assert!(nav.try_recv().is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn teardown_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::init(storage.clone());
        session.establish(login_response()).unwrap();

        session.teardown().unwrap();
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
        assert_eq!(session.state(), AuthState::Anonymous);
    }

    #[test]
    fn guard_protects_private_routes() {
        let session = Session::init(Arc::new(MemoryStorage::new()));
        assert_eq!(session.guard(Route::Login), Ok(()));
        assert_eq!(session.guard(Route::Landing), Ok(()));
        assert_eq!(session.guard(Route::Olts), Err(Redirect(Route::Login)));

        session.establish(login_response()).unwrap();
        assert_eq!(session.guard(Route::Olts), Ok(()));
    }

    #[test]
    fn route_names() {
        assert_eq!(Route::ActivityLogs.to_string(), "activity-logs");
        assert_eq!("olts".parse::<Route>().unwrap(), Route::Olts);
    }
}
