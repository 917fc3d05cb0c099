//! Typed access to the admin REST API.
//!
//! Every call goes through the [`Pipeline`] and holds one count of the
//! [`LoadingSignal`] while it is in flight, error paths included.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::endpoints::{self, ResourcePath, Tier};
use crate::error::{ApiError, ApiResult};
use crate::loading::LoadingSignal;
use crate::models::{
    Company, Currency, Envelope, LoginRequest, LoginResponse, Page, Role, SystemData, User,
};
use crate::pipeline::{ApiRequest, Pipeline};
use crate::session::Session;

/// Entry point for API calls.
#[derive(Clone)]
pub struct AdminApi {
    pipeline: Arc<Pipeline>,
    loading: LoadingSignal,
}

impl AdminApi {
    pub fn new(pipeline: Arc<Pipeline>, loading: LoadingSignal) -> Self {
        AdminApi { pipeline, loading }
    }

    pub fn session(&self) -> &Session {
        self.pipeline.session()
    }

    pub fn loading(&self) -> &LoadingSignal {
        &self.loading
    }

    /// Execute a request and decode its JSON body.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let _busy = self.loading.guard();
        let response = self.pipeline.execute(&request).await?;
        response.json()
    }

    /// Execute a request whose body is irrelevant.
    pub async fn call_unit(&self, request: ApiRequest) -> ApiResult<()> {
        let _busy = self.loading.guard();
        self.pipeline.execute(&request).await.map(|_| ())
    }

    /// Log in and persist the returned tokens.
    ///
    /// # Arguments
    /// * `email` - Account e-mail
    /// * `password` - Account password
    ///
    /// # Returns
    /// * `ApiResult<LoginResponse>` - The login payload
    ///
    /// # Errors
    /// * Returns the server's message on bad credentials
    /// * Returns `ApiError::Decode` if the response carries no access token
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = ApiRequest::post(
            endpoints::LOGIN,
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )?;
        let response: LoginResponse = self.call(request).await?;

        if response.access_token.as_deref().unwrap_or_default().is_empty() {
            return Err(ApiError::Decode("login response has no access_token".to_string()));
        }

        self.session().store_login(&response)?;
        log::info!("logged in as {}", email);
        Ok(response)
    }

    /// The account behind the current access token.
    pub async fn me(&self) -> ApiResult<User> {
        self.call(ApiRequest::get(endpoints::AUTH_USER)).await
    }

    /// Enums and the permission catalog.
    pub async fn system(&self) -> ApiResult<SystemData> {
        self.call(ApiRequest::get(endpoints::SYSTEM_INFO)).await
    }

    pub fn users(&self, tier: Tier) -> Resource<'_, User> {
        Resource::new(self, endpoints::users(tier))
    }

    pub fn roles(&self) -> Resource<'_, Role> {
        Resource::new(self, endpoints::SUPER_ADMIN_ROLES)
    }

    pub fn companies(&self, tier: Tier) -> Resource<'_, Company> {
        Resource::new(self, endpoints::companies(tier))
    }

    pub fn currencies(&self) -> Resource<'_, Currency> {
        Resource::new(self, endpoints::SUPER_ADMIN_CURRENCIES)
    }

    /// All roles, for select inputs.
    pub async fn roles_for_select(&self) -> ApiResult<Vec<Role>> {
        let page: Page<Role> = self.call(ApiRequest::get(endpoints::ROLES_FOR_SELECT)).await?;
        Ok(page.data)
    }

    /// All companies, for select inputs.
    pub async fn companies_for_select(&self) -> ApiResult<Vec<Company>> {
        let page: Page<Company> = self
            .call(ApiRequest::get(endpoints::COMPANIES_FOR_SELECT))
            .await?;
        Ok(page.data)
    }
}

/// CRUD operations on one collection.
pub struct Resource<'a, T> {
    api: &'a AdminApi,
    path: ResourcePath,
    includes: Option<&'static str>,
    _record: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    fn new(api: &'a AdminApi, path: ResourcePath) -> Self {
        Resource {
            api,
            path,
            includes: None,
            _record: PhantomData,
        }
    }

    /// Ask the server to embed related records, e.g. `profile`.
    pub fn including(mut self, relations: &'static str) -> Self {
        self.includes = Some(relations);
        self
    }

    pub fn path(&self) -> ResourcePath {
        self.path
    }

    fn with_includes(&self, request: ApiRequest) -> ApiRequest {
        match self.includes {
            Some(relations) => request.with_query("includes", relations),
            None => request,
        }
    }

    /// One page of the collection, 1-based.
    pub async fn list(&self, page: u32, per_page: Option<u32>) -> ApiResult<Page<T>> {
        let mut request = ApiRequest::get(self.path.collection()).with_query("page", page.max(1));
        if let Some(per_page) = per_page {
            request = request.with_query("perPage", per_page);
        }
        self.api.call(self.with_includes(request)).await
    }

    pub async fn show(&self, id: u64) -> ApiResult<T> {
        let request = self.with_includes(ApiRequest::get(self.path.item(id)));
        let envelope: Envelope<T> = self.api.call(request).await?;
        Ok(envelope.data)
    }

    pub async fn create<B: Serialize>(&self, body: &B) -> ApiResult<()> {
        self.api
            .call_unit(ApiRequest::post(self.path.collection(), body)?)
            .await
    }

    pub async fn update<B: Serialize>(&self, id: u64, body: &B) -> ApiResult<()> {
        self.api
            .call_unit(ApiRequest::put(self.path.item(id), body)?)
            .await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.api.call_unit(ApiRequest::delete(self.path.item(id))).await
    }
}
