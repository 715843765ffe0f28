//! # gigmarket-client
//!
//! Authenticated HTTP client for the gigmarket API.
//!
//! Every request carries the stored access token as a bearer credential.
//! When the API answers 401, the client exchanges the stored refresh token
//! for a new access token and replays the request, so callers never see an
//! expired token unless the session itself is gone.
//!
//! ## Core Concepts
//!
//! - **[`AuthClient`]**: sends requests, captures issued tokens, recovers from 401s
//! - **[`CredentialStore`]**: where tokens live ([`MemoryCredentialStore`], [`FileCredentialStore`])
//! - **[`ClientConfig`]**: base URL, refresh route, timeouts
//! - **[`SessionEvent`]**: notifications when a session refreshes, expires or ends
//!
//! ## Refresh Protocol
//!
//! - Only the first 401 starts a refresh exchange; concurrent 401s wait on it
//! - Each request is replayed at most once
//! - A failed exchange clears both tokens, broadcasts [`SessionEvent::Expired`]
//!   and hands every waiting caller its original 401
//! - Other failures are returned untouched
//!
//! ## Example
//!
//! ```ignore
//! use gigmarket_client::{AuthClient, ClientConfig, FileCredentialStore, SessionEvent};
//! use std::sync::Arc;
//!
//! let client = AuthClient::new(
//!     ClientConfig::from_env("GIGMARKET")?,
//!     Arc::new(FileCredentialStore::new("tokens.json")),
//! )?;
//!
//! let mut events = client.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if event.ends_session() {
//!             // route to the login screen
//!         }
//!     }
//! });
//!
//! let orders: serde_json::Value = client.get_json("orders/get-buyer-orders").await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod refresh;
pub mod request;
pub mod response;
pub mod session;
pub mod store;

// Re-exports
pub use client::{AuthClient, AuthClientBuilder};
pub use config::ClientConfig;
pub use error::ApiError;
pub use refresh::RefreshFailure;
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use session::SessionEvent;
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError, TokenKey, TokenPair,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ApiError, ApiRequest, ApiResponse, AuthClient, ClientConfig, CredentialStore,
        MemoryCredentialStore, SessionEvent, TokenPair,
    };
}
