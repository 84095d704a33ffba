//! Login flow
//!
//! Collects credentials, validates them locally before any network call,
//! allows exactly one in-flight submission, and on success persists the
//! token plus the minimal user snapshot through the session store. The
//! post-login redirect replaces the history entry so back-navigation never
//! returns to the form.

use std::time::Duration;

use crate::api::{ApiError, LoginPayload};
use crate::router::Route;
use crate::session::SessionStore;
use crate::validation::{validate_email, validate_password};

/// How long the success acknowledgment stays visible before the redirect
pub const REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// Field-level and general error slots of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub general: Option<String>,
}

/// A validated submission ready to be sent to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Navigation the shell must perform once the success message has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNavigation {
    pub route: Route,
    pub replace: bool,
}

/// Login form state
#[derive(Default)]
pub struct LoginView {
    email: String,
    password: String,
    errors: FormErrors,
    submitting: bool,
    success: bool,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the email field, clearing its error slot
    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
        self.errors.email = None;
        self.errors.general = None;
    }

    /// Update the password field, clearing its error slot
    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_string();
        self.errors.password = None;
        self.errors.general = None;
    }

    /// Run local validation, filling the field error slots
    fn validate(&mut self) -> bool {
        self.errors.email = validate_email(&self.email).err();
        self.errors.password = validate_password(&self.password).err();
        self.errors.email.is_none() && self.errors.password.is_none()
    }

    /// Attempt to submit; `None` means no network call may be made
    pub fn submit(&mut self) -> Option<LoginRequest> {
        if self.submitting {
            return None;
        }

        if !self.validate() {
            return None;
        }

        self.errors = FormErrors::default();
        self.success = false;
        self.submitting = true;

        Some(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Apply the submission outcome
    ///
    /// On success the session is persisted and refreshed before the pending
    /// navigation is returned; on failure the server message lands verbatim
    /// in the general slot and the entered field values stay put.
    pub fn complete(
        &mut self,
        result: Result<LoginPayload, ApiError>,
        session: &SessionStore,
    ) -> Option<PendingNavigation> {
        self.submitting = false;

        match result {
            Ok(payload) => {
                if let Err(e) = session.set_session(&payload.token, &payload.user) {
                    self.errors.general = Some(format!("Failed to persist session: {}", e));
                    return None;
                }
                session.trigger_refresh();

                self.success = true;
                self.password.clear();

                Some(PendingNavigation {
                    route: Route::Home,
                    replace: true,
                })
            }
            Err(e) => {
                self.errors.general = Some(e.to_string());
                None
            }
        }
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Current error slots
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Render the login surface
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("== Login ==\n");
        out.push_str("Sign in to your account to continue\n\n");

        if let Some(general) = &self.errors.general {
            out.push_str(&format!("[error] {}\n", general));
        }
        if self.success {
            out.push_str("Login successful! Redirecting to dashboard...\n");
        }

        out.push_str(&format!("Email:    {}\n", self.email));
        if let Some(e) = &self.errors.email {
            out.push_str(&format!("          ^ {}\n", e));
        }

        out.push_str(&format!("Password: {}\n", "*".repeat(self.password.len())));
        if let Some(e) = &self.errors.password {
            out.push_str(&format!("          ^ {}\n", e));
        }

        if self.submitting {
            out.push_str("\nSigning in...\n");
        } else {
            out.push_str("\nCommands: login <email> <password> | open /forgot-password | open /register\n");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserSnapshot;
    use common::storage::{KeyValueStore, StorageConfig};

    fn temp_session() -> SessionStore {
        let dir = std::env::temp_dir().join(format!(
            "adminhub-login-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let store = KeyValueStore::open(&StorageConfig { dir }).expect("failed to open store");
        let session = SessionStore::new(store);
        session.clear().unwrap();
        session
    }

    fn payload(token: &str, name: &str) -> LoginPayload {
        LoginPayload {
            token: token.to_string(),
            user: UserSnapshot {
                name: name.to_string(),
            },
        }
    }

    #[test]
    fn test_invalid_email_blocks_submission() {
        let mut view = LoginView::new();
        view.set_email("not-an-email");
        view.set_password("whatever-password");

        assert_eq!(view.submit(), None);
        assert!(view.errors().email.is_some());
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_short_password_blocks_submission() {
        let mut view = LoginView::new();
        view.set_email("jane@example.com");
        view.set_password("abc");

        assert_eq!(view.submit(), None);
        assert!(view.errors().password.is_some());
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_single_in_flight_submission() {
        let mut view = LoginView::new();
        view.set_email("jane@example.com");
        view.set_password("secret-password");

        assert!(view.submit().is_some());
        assert!(view.is_submitting());
        // Second submit while pending is a no-op.
        assert_eq!(view.submit(), None);
    }

    #[test]
    fn test_success_persists_session_and_schedules_redirect() {
        let session = temp_session();
        let mut view = LoginView::new();
        view.set_email("jane@example.com");
        view.set_password("secret-password");
        view.submit().unwrap();

        let nav = view.complete(Ok(payload("abc", "Jane")), &session);

        assert_eq!(
            nav,
            Some(PendingNavigation {
                route: Route::Home,
                replace: true,
            })
        );
        assert_eq!(session.token(), Some("abc".to_string()));
        assert_eq!(
            session.user(),
            Some(UserSnapshot {
                name: "Jane".to_string()
            })
        );

        session.clear().unwrap();
    }

    #[test]
    fn test_failure_keeps_fields_and_writes_nothing() {
        let session = temp_session();
        let mut view = LoginView::new();
        view.set_email("jane@example.com");
        view.set_password("secret-password");
        view.submit().unwrap();

        let nav = view.complete(Err(ApiError::Server("invalid credentials".to_string())), &session);

        assert_eq!(nav, None);
        assert_eq!(
            view.errors().general.as_deref(),
            Some("invalid credentials")
        );
        assert_eq!(session.token(), None);
        // Submission is re-enabled with the entered values intact.
        assert!(view.submit().is_some());
    }
}
