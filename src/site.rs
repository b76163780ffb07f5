//! Client-side route table of the portfolio site.
//!
//! Admin routes are guarded: a session that is not authenticated is
//! redirected to the login route.

use crate::auth::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoute {
    Home,
    Projects,
    ProjectDetails(String),
    About,
    Contact,
    AdminDashboard,
    AdminLogin,
    NotFound,
}

/// What the client should do for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(SiteRoute),
    Redirect(SiteRoute),
}

impl SiteRoute {
    /// Match a path against the route table. Unknown paths map to `NotFound`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => SiteRoute::Home,
            ["projects"] => SiteRoute::Projects,
            ["projects", id] => SiteRoute::ProjectDetails((*id).to_string()),
            ["about"] => SiteRoute::About,
            ["contact"] => SiteRoute::Contact,
            ["admin"] | ["admin", "dashboard"] => SiteRoute::AdminDashboard,
            ["admin", "login"] => SiteRoute::AdminLogin,
            _ => SiteRoute::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            SiteRoute::Home => "/".to_string(),
            SiteRoute::Projects => "/projects".to_string(),
            SiteRoute::ProjectDetails(id) => format!("/projects/{}", id),
            SiteRoute::About => "/about".to_string(),
            SiteRoute::Contact => "/contact".to_string(),
            SiteRoute::AdminDashboard => "/admin/dashboard".to_string(),
            SiteRoute::AdminLogin => "/admin/login".to_string(),
            SiteRoute::NotFound => "/404".to_string(),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, SiteRoute::AdminDashboard)
    }
}

/// Apply the admin guard to a route.
pub fn guard(route: SiteRoute, session: &Session) -> Navigation {
    if route.requires_session() && !session.is_authenticated() {
        tracing::debug!(route = %route.path(), "Redirecting to login");
        return Navigation::Redirect(SiteRoute::AdminLogin);
    }
    Navigation::Render(route)
}

/// Parse a path and apply the guard.
pub fn resolve(path: &str, session: &Session) -> Navigation {
    guard(SiteRoute::parse(path), session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionUser, UserRole};

    fn admin() -> Session {
        Session::authenticated(
            "tok",
            SessionUser {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
                role: UserRole::Admin,
            },
        )
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(SiteRoute::parse("/"), SiteRoute::Home);
        assert_eq!(SiteRoute::parse("/projects/"), SiteRoute::Projects);
        assert_eq!(
            SiteRoute::parse("/projects/abc?tab=1"),
            SiteRoute::ProjectDetails("abc".to_string())
        );
        assert_eq!(SiteRoute::parse("/admin"), SiteRoute::AdminDashboard);
        assert_eq!(SiteRoute::parse("/admin/login"), SiteRoute::AdminLogin);
        assert_eq!(SiteRoute::parse("/blog"), SiteRoute::NotFound);
        assert_eq!(SiteRoute::parse("/projects/a/b"), SiteRoute::NotFound);
    }

    #[test]
    fn test_guard_redirects_without_session() {
        assert_eq!(
            resolve("/admin/dashboard", &Session::Unauthenticated),
            Navigation::Redirect(SiteRoute::AdminLogin)
        );
        assert_eq!(
            resolve("/admin", &Session::SignedOut),
            Navigation::Redirect(SiteRoute::AdminLogin)
        );
        assert_eq!(
            resolve("/admin", &admin()),
            Navigation::Render(SiteRoute::AdminDashboard)
        );
    }

    #[test]
    fn test_public_routes_need_no_session() {
        assert_eq!(
            resolve("/contact", &Session::Unauthenticated),
            Navigation::Render(SiteRoute::Contact)
        );
        assert_eq!(
            resolve("/admin/login", &Session::Unauthenticated),
            Navigation::Render(SiteRoute::AdminLogin)
        );
    }
}
