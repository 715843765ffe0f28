//! Buffered responses.

use crate::error::ApiError;
use crate::store::TokenPair;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ApiError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(status, headers, body))
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Tokens the server issued in this body, if any.
    ///
    /// Login, registration and refresh responses carry `access` and usually
    /// `refresh`; some auth routes spell them `access_token`/`refresh_token`.
    /// Empty strings count as absent.
    pub fn issued_tokens(&self) -> Option<TokenPair> {
        let issued: IssuedTokens = serde_json::from_slice(&self.body).ok()?;
        let access = issued.access.filter(|t| !t.is_empty())?;
        Some(TokenPair {
            access,
            refresh: issued.refresh.filter(|t| !t.is_empty()),
        })
    }

    /// Convert into an [`ApiError::Http`].
    pub fn into_error(self) -> ApiError {
        ApiError::http(self.status.as_u16(), self.text())
    }
}

#[derive(Debug, Deserialize)]
struct IssuedTokens {
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}
