//! Home page view

use crate::session::SessionStore;

/// Static landing surface
pub struct HomeView;

impl HomeView {
    /// Render the landing page with the signed-in name when available
    pub fn render(session: &SessionStore) -> String {
        let mut out = String::new();
        out.push_str("== Welcome to AdminHub ==\n");
        out.push_str("Your centralized platform for user management and file organization\n\n");

        if let Some(user) = session.user() {
            out.push_str(&format!("Signed in as {}\n\n", user.name));
        }

        out.push_str("Commands: open /users | open /files | logout | help | quit\n");
        out
    }
}
