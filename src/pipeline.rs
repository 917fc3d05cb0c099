//! Authenticated request pipeline.
//!
//! Every call carries `Authorization: Bearer <access token>` when a token is
//! stored. A 401 triggers at most one refresh-and-retry cycle per request:
//!
//! ```text
//! Issued ──2xx/3xx──────────────────────────────▶ Completed
//!   │ 401 (Attempt::First)
//!   ▼
//! Refreshing ──no refresh token / refresh fails──▶ Failed (session cleared, login redirect)
//!   │ new tokens stored
//!   ▼
//! Issued again (Attempt::Retried) ──401──────────▶ Failed (session cleared, login redirect)
//! ```
//!
//! Any other error status fails immediately with the server's message.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::models::{RefreshRequest, RefreshResponse};
use crate::session::{LOCALE_KEY, Session};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, base_headers, bearer_header};

/// Fallback `Accept-Language` when no locale is stored.
const DEFAULT_LANGUAGE: &str = "uz";

/// A request as the API layer describes it, before auth is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> ApiResult<Self> {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> ApiResult<Self> {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Receives the "go to the login screen" signal when a session ends.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// A [`LoginRedirect`] that just remembers that a redirect was requested.
#[derive(Debug, Default)]
pub struct RedirectFlag {
    raised: AtomicBool,
}

impl RedirectFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Read and lower the flag.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}

impl LoginRedirect for RedirectFlag {
    fn redirect_to_login(&self) {
        log::info!("redirecting to {}", endpoints::LOGIN_PATH);
        self.raised.store(true, Ordering::SeqCst);
    }
}

/// Which try of a request this is. A request is retried at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retried,
}

enum Outcome {
    Completed(HttpResponse),
    /// Carries the rejected response for when no refresh is possible.
    NeedsRefresh(HttpResponse),
}

pub struct Pipeline {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Session,
    redirect: Arc<dyn LoginRedirect>,
}

impl Pipeline {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Session,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Pipeline {
            base_url,
            transport,
            session,
            redirect,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn locale(&self) -> String {
        self.session
            .store()
            .get(LOCALE_KEY)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Run `request` through the pipeline.
    ///
    /// # Arguments
    /// * `request` - The call to make
    ///
    /// # Returns
    /// * `ApiResult<HttpResponse>` - The successful response
    ///
    /// # Errors
    /// * `ApiError::Status` for any non-401 failure status, with the server's message
    /// * `ApiError::Unauthorized` when no refresh token is stored (carrying the
    ///   server's message for the 401) or the retry is rejected
    /// * `ApiError::Refresh` when the refresh call fails
    /// * `ApiError::Network` when no response arrives
    ///
    /// Concurrent calls that all hit a 401 each refresh on their own with the
    /// same refresh token; a server that rotates refresh tokens rejects all
    /// but the first, which ends the session.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<HttpResponse> {
        let first = self.issue(request).await?;
        let rejected = match self.settle(first, Attempt::First)? {
            Outcome::Completed(response) => return Ok(response),
            Outcome::NeedsRefresh(rejected) => rejected,
        };

        self.refresh(&rejected).await?;

        let retried = self.issue(request).await?;
        match self.settle(retried, Attempt::Retried)? {
            Outcome::Completed(response) => Ok(response),
            Outcome::NeedsRefresh(_) => Err(self.end_session("request rejected after refresh")),
        }
    }

    async fn issue(&self, request: &ApiRequest) -> ApiResult<HttpResponse> {
        let mut headers = base_headers(&self.locale());
        if let Some(token) = self.session.access_token() {
            headers.push(bearer_header(&token));
        }

        log::debug!("{} {}", request.method.as_str(), request.path);

        self.transport
            .send(HttpRequest {
                method: request.method,
                url: self.url(&request.path),
                headers,
                query: request.query.clone(),
                body: request.body.clone(),
            })
            .await
    }

    fn settle(&self, response: HttpResponse, attempt: Attempt) -> ApiResult<Outcome> {
        if response.is_success() {
            return Ok(Outcome::Completed(response));
        }

        if response.status != 401 {
            return Err(ApiError::from_status(response.status, &response.body));
        }

        match attempt {
            Attempt::First => {
                log::info!("access token rejected; attempting refresh");
                Ok(Outcome::NeedsRefresh(response))
            }
            Attempt::Retried => {
                log::warn!("request rejected again after token refresh");
                Err(self.end_session("request rejected after refresh"))
            }
        }
    }

    async fn refresh(&self, rejected: &HttpResponse) -> ApiResult<()> {
        let Some(refresh_token) = self.session.refresh_token() else {
            log::warn!("no refresh token stored; session ends");
            if let Err(e) = self.session.clear_access() {
                log::warn!("failed to clear access token: {}", e);
            }
            self.redirect.redirect_to_login();
            let reason = ApiError::from_status(rejected.status, &rejected.body).message();
            return Err(ApiError::Unauthorized(reason));
        };

        match self.request_new_tokens(&refresh_token).await {
            Ok((access, refresh)) => {
                self.session.replace_tokens(&access, refresh.as_deref())?;
                log::info!("access token refreshed");
                Ok(())
            }
            Err(e) => {
                log::warn!("token refresh failed: {}", e);
                self.clear_session();
                self.redirect.redirect_to_login();
                Err(e)
            }
        }
    }

    async fn request_new_tokens(&self, refresh_token: &str) -> ApiResult<(String, Option<String>)> {
        let body = serde_json::to_value(RefreshRequest { refresh_token })
            .map_err(|e| ApiError::Refresh(e.to_string()))?;

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::Post,
                url: self.url(endpoints::REFRESH),
                headers: base_headers(&self.locale()),
                query: Vec::new(),
                body: Some(body),
            })
            .await
            .map_err(|e| ApiError::Refresh(e.message()))?;

        if !response.is_success() {
            let reason = ApiError::from_status(response.status, &response.body).message();
            return Err(ApiError::Refresh(reason));
        }

        let tokens: RefreshResponse = response
            .json()
            .map_err(|e| ApiError::Refresh(e.message()))?;

        let access = tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Refresh("missing access_token".to_string()))?;

        Ok((access, tokens.refresh_token))
    }

    fn clear_session(&self) {
        if let Err(e) = self.session.clear_tokens() {
            log::warn!("failed to clear tokens: {}", e);
        }
    }

    fn end_session(&self, reason: &str) -> ApiError {
        self.clear_session();
        self.redirect.redirect_to_login();
        ApiError::Unauthorized(reason.to_string())
    }
}
