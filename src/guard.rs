//! Access decisions for dashboard routes.

use crate::models::{User, UserType};
use crate::navigation::{
    ADMIN_COMPANY, SUPER_ADMIN_COMPANIES, SUPER_ADMIN_CURRENCIES, SUPER_ADMIN_ROLES, SUPER_ADMIN_USERS,
};
use crate::permission::has_permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// System data is still loading; render nothing yet.
    Pending,
    /// No user; go to the login screen.
    RedirectToLogin,
    /// Show the no-permission page.
    Forbidden,
    Allowed,
}

/// Requirements of one protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub roles: Option<Vec<UserType>>,
    pub permissions: &'static [&'static str],
}

impl Route {
    /// Decide whether `user` may open this route.
    ///
    /// # Arguments
    /// * `loading` - Whether the current user and system data are still being fetched
    /// * `user` - The current user, if known
    /// * `granted` - Permissions granted to the session
    ///
    /// # Returns
    /// * `RouteDecision` - What the shell should render
    pub fn check<G: AsRef<str>>(&self, loading: bool, user: Option<&User>, granted: &[G]) -> RouteDecision {
        if loading {
            return RouteDecision::Pending;
        }

        let Some(user) = user else {
            return RouteDecision::RedirectToLogin;
        };

        if let Some(roles) = &self.roles {
            if !roles.contains(&user.kind) {
                return RouteDecision::Forbidden;
            }
        }

        if !has_permission(granted, self.permissions) {
            return RouteDecision::Forbidden;
        }

        RouteDecision::Allowed
    }
}

/// The protected part of the dashboard.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

fn route(path: &'static str, permissions: &'static [&'static str]) -> Route {
    Route {
        path,
        roles: None,
        permissions,
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        RouteTable {
            routes: vec![
                route("/app/", SUPER_ADMIN_USERS),
                route("/app/super/admin/public", &[]),
                route("/app/super/admin/users", SUPER_ADMIN_USERS),
                route("/app/super/admin/company", SUPER_ADMIN_COMPANIES),
                route("/app/super/admin/roles", SUPER_ADMIN_ROLES),
                route("/app/super/admin/currency", SUPER_ADMIN_CURRENCIES),
                route("/app/admin/public", &[]),
                route("/app/admin/users", ADMIN_COMPANY),
                route("/app/admin/company", ADMIN_COMPANY),
            ],
        }
    }
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        RouteTable { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find a route by path. `/app` and `/app/` are the same route.
    pub fn find(&self, path: &str) -> Option<&Route> {
        let wanted = path.trim_end_matches('/');
        self.routes
            .iter()
            .find(|route| route.path.trim_end_matches('/') == wanted)
    }

    /// Decide access to `path`; paths outside the table are not found.
    pub fn check<G: AsRef<str>>(
        &self,
        path: &str,
        loading: bool,
        user: Option<&User>,
        granted: &[G],
    ) -> Option<RouteDecision> {
        self.find(path).map(|route| route.check(loading, user, granted))
    }
}
