//! Data shapes exchanged with the admin REST API.
//!
//! The backend wraps single records as `{"data": ...}` and lists as
//! `{"data": [...], "meta": {"totalPage": n}}`. Optional fields are lenient
//! because the server omits them depending on `includes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Director,
    Employee,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Director => "director",
            UserType::Employee => "employee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Entity,
    Physical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: u64,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UserType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// An account as returned by the user endpoints and by `auth-user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: UserType,
    #[serde(default)]
    pub role_id: Option<u64>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name from the profile, falling back to the e-mail address.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.full_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub tree: Value,
}

/// The permission catalog from the system endpoint.
///
/// `available.permissions` is the set granted to the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionsObject {
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub tree: Value,
    #[serde(default)]
    pub available: PermissionCatalog,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    #[serde(default)]
    pub enums: Value,
    #[serde(default)]
    pub permissions: PermissionsObject,
}

impl SystemData {
    /// Permissions granted to the current session.
    pub fn granted(&self) -> &[String] {
        &self.permissions.available.permissions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<CompanyType>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub director_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: u64,
    pub code: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub round_mark: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyForm {
    pub code: String,
    pub country: String,
    pub symbol: String,
    pub is_main: bool,
    pub round_mark: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleForm {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: UserType,
    pub gender: Gender,
    pub role_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyForm {
    pub name: String,
    pub company_name: String,
    #[serde(rename = "type")]
    pub kind: CompanyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login payload. Everything besides the tokens is kept verbatim and
/// persisted as `access_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Single-record wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(rename = "totalPage", default)]
    pub total_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(rename = "perPage", default)]
    pub per_page: Option<u32>,
}

/// One page of a resource listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Number of pages, never less than one.
    pub fn page_count(&self) -> u32 {
        self.meta.total_page.unwrap_or(1).max(1)
    }
}
