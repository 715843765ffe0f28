//! Request descriptors.

use crate::error::ApiError;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

/// A request the client can send, and replay after a token refresh.
///
/// The body is serialized up front so a replay sends identical bytes.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    target: String,
    body: Option<Bytes>,
    headers: HeaderMap,
    retried: bool,
}

impl ApiRequest {
    /// Create a request for `target`, either a path below the base URL or an
    /// absolute URL.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    /// GET request.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    /// POST request.
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    /// PUT request.
    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::PUT, target)
    }

    /// PATCH request.
    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(Method::PATCH, target)
    }

    /// DELETE request.
    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Add a header. `Authorization` is overwritten when a token is stored.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path or URL this request targets.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Serialized JSON body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Caller-supplied headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether this request has already been replayed after a refresh.
    pub fn is_retry(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retry(&mut self) {
        self.retried = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT_LANGUAGE;
    use serde_json::json;

    #[test]
    fn test_constructors() {
        assert_eq!(*ApiRequest::get("gigs/").method(), Method::GET);
        assert_eq!(*ApiRequest::post("gigs/").method(), Method::POST);
        assert_eq!(*ApiRequest::put("gigs/1/").method(), Method::PUT);
        assert_eq!(*ApiRequest::patch("gigs/1/").method(), Method::PATCH);
        assert_eq!(*ApiRequest::delete("gigs/1/").method(), Method::DELETE);
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("orders/")
            .json(&json!({"gig": 7, "quantity": 1}))
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(request.body().unwrap()).unwrap();
        assert_eq!(body, json!({"gig": 7, "quantity": 1}));
    }

    #[test]
    fn test_headers_and_retry_flag() {
        let mut request = ApiRequest::get("messages/get-messages")
            .header(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        assert_eq!(request.headers().get(ACCEPT_LANGUAGE).unwrap(), "en");
        assert!(!request.is_retry());

        request.mark_retry();
        assert!(request.is_retry());
        assert!(request.clone().is_retry());
    }
}
