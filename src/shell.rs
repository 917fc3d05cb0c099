//! The application root.
//!
//! [`AdminShell`] owns every piece of client state (session, loading signal,
//! system data, navigation, locale) and wires them together. Logout and
//! locale changes are explicit resets of that state.

use std::sync::Arc;

use crate::api::AdminApi;
use crate::config::Config;
use crate::endpoints::{HOME_PATH, LOGIN_PATH};
use crate::error::{ApiError, ApiResult};
use crate::guard::{RouteDecision, RouteTable};
use crate::i18n::{Catalog, Locale};
use crate::loading::LoadingSignal;
use crate::navigation::{Navigation, default_navigation};
use crate::permission::NavigationItem;
use crate::pipeline::{Pipeline, RedirectFlag};
use crate::search::SearchPalette;
use crate::session::{FileStore, Session, TokenStore};
use crate::system::SystemStore;
use crate::transport::{HttpTransport, Transport};

pub struct AdminShell {
    config: Config,
    session: Session,
    loading: LoadingSignal,
    redirect: Arc<RedirectFlag>,
    api: AdminApi,
    system: SystemStore,
    catalog: Catalog,
    navigation: Navigation,
    routes: RouteTable,
}

impl AdminShell {
    /// Assemble a shell over the given storage and transport.
    pub fn new(config: Config, store: Arc<dyn TokenStore>, transport: Arc<dyn Transport>) -> ApiResult<Self> {
        let session = Session::new(store);

        let locale = match &config.locale {
            Some(tag) => {
                let locale = Locale::normalize(tag);
                locale.save(session.store().as_ref())?;
                locale
            }
            None => Locale::load(session.store().as_ref())?,
        };
        let catalog = Catalog::new(locale);

        let loading = LoadingSignal::new();
        let redirect = Arc::new(RedirectFlag::new());
        let pipeline = Arc::new(Pipeline::new(
            config.base_url.clone(),
            transport,
            session.clone(),
            redirect.clone(),
        ));
        let api = AdminApi::new(pipeline, loading.clone());

        Ok(AdminShell {
            config,
            session,
            loading,
            redirect,
            api,
            system: SystemStore::new(),
            catalog,
            navigation: Navigation::new(default_navigation(&catalog)),
            routes: RouteTable::default(),
        })
    }

    /// Shell with the on-disk token store and the HTTP transport.
    pub fn from_config(config: Config) -> ApiResult<Self> {
        let store = Arc::new(FileStore::open(&config.store_path)?);
        let transport = Arc::new(HttpTransport::new(config.timeout())?);
        Self::new(config, store, transport)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn loading(&self) -> &LoadingSignal {
        &self.loading
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    pub fn system(&self) -> &SystemStore {
        &self.system
    }

    pub fn locale(&self) -> Locale {
        self.catalog.locale()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    /// Load the current user and system data.
    ///
    /// If the pipeline ended the session along the way, local state is reset
    /// before the error is returned.
    pub async fn bootstrap(&mut self) -> ApiResult<()> {
        let result = {
            let _busy = self.loading.guard();
            self.system.fetch(&self.api).await
        };
        self.take_redirect();
        result
    }

    /// Log in, then load the user and system data.
    ///
    /// # Returns
    /// * `ApiResult<&'static str>` - The path to show next
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<&'static str> {
        let result = self.api.login(email, password).await;
        // A rejected login is already on the login screen.
        self.redirect.take();
        result?;
        self.bootstrap().await?;
        Ok(HOME_PATH)
    }

    /// Forget the session and every piece of state derived from it.
    ///
    /// The locale preference survives.
    ///
    /// # Returns
    /// * `ApiResult<&'static str>` - The login path
    pub fn logout(&mut self) -> ApiResult<&'static str> {
        let locale = self.locale();
        self.session.clear()?;
        locale.save(self.session.store().as_ref())?;
        self.reset_state();
        log::info!("logged out");
        Ok(LOGIN_PATH)
    }

    /// If the pipeline asked for the login screen, reset local state.
    ///
    /// # Returns
    /// * `bool` - True when a redirect had been requested
    pub fn take_redirect(&mut self) -> bool {
        if !self.redirect.take() {
            return false;
        }
        self.reset_state();
        true
    }

    fn reset_state(&mut self) {
        self.system.reset();
        self.navigation.reset();
        self.loading.force_reset();
    }

    /// Switch language: persist it and rebuild the localized menu.
    pub fn change_locale(&mut self, tag: &str) -> ApiResult<Locale> {
        let locale = Locale::normalize(tag);
        locale.save(self.session.store().as_ref())?;
        self.catalog = Catalog::new(locale);
        self.navigation.rebuild(default_navigation(&self.catalog));
        log::info!("locale switched to {}", locale);
        Ok(locale)
    }

    pub fn granted(&self) -> &[String] {
        self.system.granted()
    }

    /// The menu the current session may see.
    pub fn visible_navigation(&self) -> Vec<NavigationItem> {
        self.navigation.visible(self.system.granted())
    }

    /// A search palette over the visible menu.
    pub fn search_palette(&self) -> SearchPalette {
        SearchPalette::new(&self.visible_navigation())
    }

    /// Route check for `path`, and sidebar sync when access is allowed.
    ///
    /// # Errors
    /// * Returns `ApiError::Status` with 404 for paths outside the dashboard
    pub fn open_path(&mut self, path: &str) -> ApiResult<RouteDecision> {
        let decision = self
            .routes
            .check(path, self.system.loading, self.system.user.as_ref(), self.system.granted())
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("no such page: {}", path),
            })?;

        if decision == RouteDecision::Allowed {
            self.navigation.sync_with_path(path, self.system.granted());
        }
        Ok(decision)
    }
}
