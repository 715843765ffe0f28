//! The authenticated client.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::refresh::{RefreshCoordinator, RefreshExchange};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::session::{SessionEvent, EVENT_CAPACITY};
use crate::store::{CredentialStore, MemoryCredentialStore, TokenKey, TokenPair};
use futures::FutureExt;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, debug_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

/// HTTP client that attaches bearer tokens and recovers from expired ones.
///
/// Cloning is cheap; clones share the credential store, the in-flight
/// refresh and the session event channel.
///
/// # Example
///
/// ```ignore
/// use gigmarket_client::{AuthClient, ClientConfig, FileCredentialStore};
/// use std::sync::Arc;
///
/// let client = AuthClient::new(
///     ClientConfig::from_env("GIGMARKET")?,
///     Arc::new(FileCredentialStore::new("tokens.json")),
/// )?;
///
/// let gigs: serde_json::Value = client.get_json("gigs/my-gigs").await?;
/// ```
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    config: ClientConfig,
    refresh_url: Url,
    store: Arc<dyn CredentialStore>,
    refresh: RefreshCoordinator,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("refresh_url", &self.inner.refresh_url.as_str())
            .field("refreshing", &self.is_refreshing())
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Create a client from a config and a credential store.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        AuthClientBuilder::new().config(config).store(store).build()
    }

    /// Start building a client.
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::new()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Whether a refresh exchange is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Current access token.
    pub async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.inner.store.get(TokenKey::Access).await?)
    }

    /// Current refresh token.
    pub async fn refresh_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.inner.store.get(TokenKey::Refresh).await?)
    }

    /// Overwrite the stored tokens.
    pub async fn set_tokens(&self, pair: TokenPair) -> Result<(), ApiError> {
        Ok(self.inner.store.set(pair).await?)
    }

    /// Remove both stored tokens.
    pub async fn clear_tokens(&self) -> Result<(), ApiError> {
        Ok(self.inner.store.clear().await?)
    }

    /// Clear the stored tokens and broadcast [`SessionEvent::LoggedOut`].
    pub async fn end_session(&self) -> Result<(), ApiError> {
        let cleared = self.clear_tokens().await;
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
        cleared
    }

    /// Send a request.
    ///
    /// The stored access token is attached as a bearer token. A 401 triggers
    /// one refresh exchange (shared with any other request failing at the
    /// same time) and one replay. If the refresh fails the original 401 is
    /// returned. Every other failure is returned untouched.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let span = debug_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            path = request.target(),
        );
        self.send_inner(request).instrument(span).await
    }

    async fn send_inner(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.inner.config.resolve(request.target())?;
        let generation = self.inner.refresh.generation();
        let mut token = self.inner.store.get(TokenKey::Access).await?;

        loop {
            let response = self.dispatch(&request, &url, token.as_deref()).await?;

            if response.is_success() {
                self.capture_tokens(&response).await;
                return Ok(response);
            }

            if response.status() != StatusCode::UNAUTHORIZED
                || request.is_retry()
                || url == self.inner.refresh_url
            {
                return Err(response.into_error());
            }

            request.mark_retry();

            match self.recover(token.as_deref(), generation).await? {
                Some(fresh) => {
                    debug!("Replaying request with refreshed token");
                    token = Some(fresh);
                }
                None => return Err(response.into_error()),
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &Url,
        token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = request.headers().clone();
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Other(e.into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self
            .inner
            .http
            .request(request.method().clone(), url.clone())
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        debug!(url = %url, retry = request.is_retry(), "Making HTTP request");
        let response = ApiResponse::read(builder.send().await?).await?;
        debug!(status = response.status().as_u16(), "Received HTTP response");

        Ok(response)
    }

    /// Persist tokens carried by a successful response.
    ///
    /// The response already succeeded on the server, so a store failure is
    /// logged rather than turned into an error that would discard it.
    async fn capture_tokens(&self, response: &ApiResponse) {
        if let Some(pair) = response.issued_tokens() {
            debug!(rotated = pair.refresh.is_some(), "Storing tokens issued by response");
            if let Err(e) = self.inner.store.set(pair).await {
                warn!(error = %e, "Failed to store tokens issued by response");
            }
        }
    }

    /// Obtain a token to replay with after a 401, or `None` if the session
    /// cannot be recovered.
    ///
    /// `generation` is the refresh generation observed before the request
    /// was dispatched.
    async fn recover(
        &self,
        sent_with: Option<&str>,
        generation: u64,
    ) -> Result<Option<String>, ApiError> {
        // Another request may have finished a refresh since this one was sent.
        if let Some(current) = self.inner.store.get(TokenKey::Access).await? {
            if sent_with != Some(current.as_str()) {
                debug!("Access token changed since dispatch");
                return Ok(Some(current));
            }
        }

        let settled = !self.is_refreshing() && self.inner.refresh.generation() == generation;
        if settled && self.inner.store.get(TokenKey::Refresh).await?.is_none() {
            debug!("No refresh token stored, passing 401 through");
            return Ok(None);
        }

        let outcome = self
            .inner
            .refresh
            .run(generation, || self.exchange().execute().boxed())
            .await;

        match outcome {
            Ok(token) => Ok(Some(token)),
            Err(failure) => {
                warn!(error = %failure, "Session could not be refreshed");
                Ok(None)
            }
        }
    }

    fn exchange(&self) -> RefreshExchange {
        RefreshExchange {
            http: self.inner.http.clone(),
            url: self.inner.refresh_url.clone(),
            store: self.inner.store.clone(),
            events: self.inner.events.clone(),
            timeout: self.inner.config.refresh_timeout,
        }
    }

    /// Execute a GET request.
    pub async fn get(&self, target: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::get(target)).await
    }

    /// Execute a POST request.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::post(target).json(body)?).await
    }

    /// Execute a PUT request.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::put(target).json(body)?).await
    }

    /// Execute a PATCH request.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        target: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::patch(target).json(body)?).await
    }

    /// Execute a DELETE request.
    pub async fn delete(&self, target: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::delete(target)).await
    }

    /// GET and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        self.get(target).await?.json()
    }

    /// POST and deserialize the JSON body.
    pub async fn post_json<B, T>(&self, target: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(target, body).await?.json()
    }
}

/// Builder for creating an [`AuthClient`].
#[derive(Default)]
pub struct AuthClientBuilder {
    config: Option<ClientConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    http: Option<Client>,
}

impl AuthClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a preconfigured HTTP client instead of building one from the config.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AuthClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let http = match self.http {
            Some(client) => client,
            None => config.build_http_client()?,
        };
        let refresh_url = config.refresh_url()?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(AuthClient {
            inner: Arc::new(ClientInner {
                http,
                config,
                refresh_url,
                store,
                refresh: RefreshCoordinator::new(),
                events,
            }),
        })
    }
}
