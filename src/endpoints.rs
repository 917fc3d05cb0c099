//! REST endpoint paths, relative to the configured base URL.

pub const LOGIN: &str = "/common/auth/login";
pub const REFRESH: &str = "/common/auth/refresh";
pub const AUTH_USER: &str = "/common/auth/auth-user";
pub const SYSTEM_INFO: &str = "/common/system";

pub const ROLES_FOR_SELECT: &str = "/common/public/records/role?page=1&perPage=1000";
pub const COMPANIES_FOR_SELECT: &str = "/common/public/records/company";

/// Where the user lands when the session cannot be recovered.
pub const LOGIN_PATH: &str = "/auth/login";

/// Where the user lands after logging in.
pub const HOME_PATH: &str = "/app/";

/// Privilege tier of an endpoint family.
///
/// Company admins manage their own company's records; super-admins manage
/// everything under `/admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Admin,
    SuperAdmin,
}

/// A CRUD collection and the item paths below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    collection: &'static str,
}

impl ResourcePath {
    pub const fn new(collection: &'static str) -> Self {
        ResourcePath { collection }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub fn item(&self, id: u64) -> String {
        format!("{}/{}", self.collection, id)
    }
}

pub const ADMIN_USERS: ResourcePath = ResourcePath::new("/company/user/user");
pub const SUPER_ADMIN_USERS: ResourcePath = ResourcePath::new("/admin/user/user");
pub const SUPER_ADMIN_ROLES: ResourcePath = ResourcePath::new("/admin/user/role");
pub const ADMIN_COMPANIES: ResourcePath = ResourcePath::new("/company/company/company");
pub const SUPER_ADMIN_COMPANIES: ResourcePath = ResourcePath::new("/admin/company/company");
pub const SUPER_ADMIN_CURRENCIES: ResourcePath = ResourcePath::new("/admin/system/currency");

pub fn users(tier: Tier) -> ResourcePath {
    match tier {
        Tier::Admin => ADMIN_USERS,
        Tier::SuperAdmin => SUPER_ADMIN_USERS,
    }
}

pub fn companies(tier: Tier) -> ResourcePath {
    match tier {
        Tier::Admin => ADMIN_COMPANIES,
        Tier::SuperAdmin => SUPER_ADMIN_COMPANIES,
    }
}
