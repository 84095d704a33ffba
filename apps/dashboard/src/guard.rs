//! Route guard
//!
//! Gates the protected page tree behind a single predicate: a non-empty
//! token in the session store. There is no client-side expiry or signature
//! check; the server is the authority, and any API error it classifies as an
//! authentication failure is fed back here and treated as a logout.

use tracing::{info, warn};

use crate::api::ApiError;
use crate::router::Route;
use crate::session::SessionStore;

/// Authentication state as seen by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

/// Decides whether protected routes may render
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    /// Create a new guard over the session store
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Derive the current authentication state from token presence
    pub fn evaluate(&self) -> AuthState {
        if self.session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Resolve a navigation target; protected routes redirect to login
    /// while unauthenticated
    pub fn admit(&self, route: Route) -> Route {
        if route.is_protected() && self.evaluate() == AuthState::Unauthenticated {
            info!("Redirecting {} to {}", route.path(), Route::Login.path());
            Route::Login
        } else {
            route
        }
    }

    /// Treat a server-side authentication failure as a logout
    pub fn handle_api_error(&self, error: &ApiError) {
        if !error.is_auth_failure() {
            return;
        }

        warn!("Session rejected by server, signing out: {}", error);
        if let Err(e) = self.session.clear() {
            warn!("Failed to clear session: {}", e);
        }
        self.session.trigger_refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserSnapshot;
    use common::storage::{KeyValueStore, StorageConfig};

    fn temp_guard() -> (RouteGuard, SessionStore) {
        let dir = std::env::temp_dir().join(format!(
            "adminhub-guard-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let store = KeyValueStore::open(&StorageConfig { dir }).expect("failed to open store");
        let session = SessionStore::new(store);
        session.clear().unwrap();
        (RouteGuard::new(session.clone()), session)
    }

    #[test]
    fn test_unauthenticated_redirects_protected_routes() {
        let (guard, _session) = temp_guard();

        assert_eq!(guard.evaluate(), AuthState::Unauthenticated);
        assert_eq!(guard.admit(Route::Home), Route::Login);
        assert_eq!(guard.admit(Route::Users), Route::Login);
        assert_eq!(guard.admit(Route::Login), Route::Login);
        assert_eq!(guard.admit(Route::Register), Route::Register);
    }

    #[test]
    fn test_token_presence_admits() {
        let (guard, session) = temp_guard();
        session
            .set_session("abc", &UserSnapshot { name: "Jane".to_string() })
            .unwrap();

        assert_eq!(guard.evaluate(), AuthState::Authenticated);
        assert_eq!(guard.admit(Route::Users), Route::Users);

        session.clear().unwrap();
        assert_eq!(guard.evaluate(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unauthorized_api_error_signs_out() {
        let (guard, session) = temp_guard();
        session
            .set_session("abc", &UserSnapshot { name: "Jane".to_string() })
            .unwrap();
        let mut rx = session.subscribe();

        guard.handle_api_error(&ApiError::Unauthorized("token expired".to_string()));

        assert_eq!(session.token(), None);
        rx.changed().await.unwrap();
    }

    #[test]
    fn test_other_api_errors_keep_session() {
        let (guard, session) = temp_guard();
        session
            .set_session("abc", &UserSnapshot { name: "Jane".to_string() })
            .unwrap();

        guard.handle_api_error(&ApiError::Server("boom".to_string()));

        assert_eq!(session.token(), Some("abc".to_string()));
        session.clear().unwrap();
    }
}
