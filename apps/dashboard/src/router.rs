//! Routing surface and navigation history
//!
//! The route table is flat: home, users, files and login, plus two paths
//! that are referenced by the login surface but have no real page behind
//! them yet. History keeps the visited stack so `back` works, with replace
//! semantics for the post-login redirect.

/// A navigable page of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Users,
    Files,
    Login,
    ForgotPassword,
    Register,
}

impl Route {
    /// Parse a path into a route, `None` for unknown paths
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/users" => Some(Route::Users),
            "/files" => Some(Route::Files),
            "/login" => Some(Route::Login),
            "/forgot-password" => Some(Route::ForgotPassword),
            "/register" => Some(Route::Register),
            _ => None,
        }
    }

    /// The canonical path for this route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Users => "/users",
            Route::Files => "/files",
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::Register => "/register",
        }
    }

    /// Whether the route sits behind the authentication guard
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::ForgotPassword | Route::Register)
    }
}

/// Visited-route stack with push/replace/back semantics
#[derive(Debug)]
pub struct History {
    stack: Vec<Route>,
}

impl History {
    /// Start history at the given route
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    /// The route currently shown
    pub fn current(&self) -> Route {
        *self.stack.last().unwrap_or(&Route::Home)
    }

    /// Navigate to a route, keeping the current entry reachable via back
    pub fn push(&mut self, route: Route) {
        if self.current() != route {
            self.stack.push(route);
        }
    }

    /// Navigate to a route, replacing the current entry
    pub fn replace(&mut self, route: Route) {
        self.stack.pop();
        self.stack.push(route);
    }

    /// Go back one entry; `None` when there is nothing to go back to
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop();
            Some(self.current())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for route in [
            Route::Home,
            Route::Users,
            Route::Files,
            Route::Login,
            Route::ForgotPassword,
            Route::Register,
        ] {
            assert_eq!(Route::parse(route.path()), Some(route));
        }

        assert_eq!(Route::parse("/nope"), None);
    }

    #[test]
    fn test_protection_flags() {
        assert!(Route::Home.is_protected());
        assert!(Route::Users.is_protected());
        assert!(Route::Files.is_protected());
        assert!(!Route::Login.is_protected());
        assert!(!Route::ForgotPassword.is_protected());
        assert!(!Route::Register.is_protected());
    }

    #[test]
    fn test_replace_hides_login_from_back() {
        let mut history = History::new(Route::Login);
        history.replace(Route::Home);

        assert_eq!(history.current(), Route::Home);
        assert_eq!(history.back(), None);
    }

    #[test]
    fn test_push_and_back() {
        let mut history = History::new(Route::Home);
        history.push(Route::Users);
        history.push(Route::Files);

        assert_eq!(history.back(), Some(Route::Users));
        assert_eq!(history.back(), Some(Route::Home));
        assert_eq!(history.back(), None);
    }
}
