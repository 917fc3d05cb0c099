//! Persisted client state: access/refresh tokens and the locale preference.
//!
//! A [`TokenStore`] is the client-local key/value storage. [`Session`] is the
//! typed view over it that the request pipeline and the shell share.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::{self, File, create_dir_all};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{ApiError, ApiResult};
use crate::models::LoginResponse;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const ACCESS_DATA_KEY: &str = "access_data";
pub const LOCALE_KEY: &str = "i18nextLng";
pub const REFRESHED_AT_KEY: &str = "token_refreshed_at";

/// Client-local string storage.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;
    fn remove(&self, key: &str) -> ApiResult<()>;
    /// Remove every key.
    fn clear(&self) -> ApiResult<()>;
}

/// Volatile store, used by tests and by one-shot CLI invocations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApiError::Storage("store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApiError::Storage("store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApiError::Storage("store lock poisoned".to_string()))?;
        entries.clear();
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// The whole map is rewritten on every change, which is fine for a handful
/// of short strings.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating the file and its directory if needed.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file
    ///
    /// # Returns
    /// * `ApiResult<FileStore>` - The opened store or a storage error
    ///
    /// # Errors
    /// * Returns an error if the file cannot be created, read, or parsed
    pub fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                create_dir_all(dir).map_err(|e| {
                    ApiError::Storage(format!("failed to create {}: {}", dir.display(), e))
                })?;
            }
        }

        if !path.exists() {
            let mut file = File::create(&path).map_err(|e| {
                ApiError::Storage(format!("failed to create {}: {}", path.display(), e))
            })?;
            file.write_all(b"{}")
                .map_err(|e| ApiError::Storage(format!("failed to initialise store: {}", e)))?;
        }

        let mut contents = String::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|e| ApiError::Storage(format!("failed to read {}: {}", path.display(), e)))?;

        let entries: BTreeMap<String, String> = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)
                .map_err(|e| ApiError::Storage(format!("failed to parse store: {}", e)))?
        };

        Ok(FileStore {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ApiError::Storage(format!("failed to serialize store: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| ApiError::Storage(format!("failed to write {}: {}", self.path.display(), e)))
    }

    /// Apply `change` on disk first; memory only follows a successful write.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> ApiResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ApiError::Storage("store lock poisoned".to_string()))?;
        let mut next = entries.clone();
        change(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> ApiResult<()> {
        self.update(|entries| entries.clear())
    }
}

/// Typed access to the tokens in a [`TokenStore`].
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Session { store }
    }

    pub fn in_memory() -> Self {
        Session::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Current access token. An empty stored value counts as absent.
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Time of the last successful token refresh, if one happened.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.store
            .get(REFRESHED_AT_KEY)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Persist a login response: the raw payload plus both tokens.
    pub fn store_login(&self, response: &LoginResponse) -> ApiResult<()> {
        let raw = serde_json::to_string(response)
            .map_err(|e| ApiError::Storage(format!("failed to serialize login data: {}", e)))?;
        self.store.set(ACCESS_DATA_KEY, &raw)?;
        self.store
            .set(ACCESS_TOKEN_KEY, response.access_token.as_deref().unwrap_or_default())?;
        self.store
            .set(REFRESH_TOKEN_KEY, response.refresh_token.as_deref().unwrap_or_default())?;
        Ok(())
    }

    /// Replace the access token, and the refresh token only when a new one is given.
    pub fn replace_tokens(&self, access: &str, refresh: Option<&str>) -> ApiResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        if let Some(refresh) = refresh.filter(|r| !r.is_empty()) {
            self.store.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        self.store.set(REFRESHED_AT_KEY, &Utc::now().to_rfc3339())?;
        Ok(())
    }

    pub fn clear_access(&self) -> ApiResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY)
    }

    /// Drop both tokens, keeping unrelated preferences such as the locale.
    pub fn clear_tokens(&self) -> ApiResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(REFRESHED_AT_KEY)?;
        Ok(())
    }

    /// Logout: forget everything stored for this client.
    pub fn clear(&self) -> ApiResult<()> {
        self.store.clear()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
