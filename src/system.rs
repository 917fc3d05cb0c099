//! Current user and system data, fetched together after login.

use crate::api::AdminApi;
use crate::error::ApiError;
use crate::models::{SystemData, User};

#[derive(Debug, Clone)]
pub struct SystemStore {
    pub user: Option<User>,
    pub system: Option<SystemData>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for SystemStore {
    fn default() -> Self {
        SystemStore {
            user: None,
            system: None,
            loading: true,
            last_error: None,
        }
    }
}

impl SystemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the current user and the system info concurrently.
    ///
    /// Both are replaced together on success. On any failure the previous
    /// values are kept and only `loading` is cleared.
    pub async fn fetch(&mut self, api: &AdminApi) -> Result<(), ApiError> {
        let (user, system) = tokio::join!(api.me(), api.system());

        let outcome = match (user, system) {
            (Ok(user), Ok(system)) => {
                log::info!(
                    "loaded {} with {} granted permission(s)",
                    user.email,
                    system.granted().len()
                );
                self.user = Some(user);
                self.system = Some(system);
                self.last_error = None;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("failed to load system data: {}", e);
                self.last_error = Some(e.message());
                Err(e)
            }
        };

        self.loading = false;
        outcome
    }

    /// Permissions granted to the session; empty until loaded.
    pub fn granted(&self) -> &[String] {
        self.system.as_ref().map(SystemData::granted).unwrap_or(&[])
    }

    /// Back to the state before the first fetch.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
