//! # gigmarket - Client SDK for the gigmarket marketplace API
//!
//! gigmarket talks to the marketplace backend (gigs, orders, messages,
//! seller onboarding) over its JSON REST API with JWT bearer tokens.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gigmarket::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AuthClient::new(
//!         ClientConfig::from_env("GIGMARKET")?,
//!         Arc::new(FileCredentialStore::new("tokens.json")),
//!     )?;
//!     let auth = AuthApi::new(client.clone());
//!
//!     auth.login(&LoginRequest::new("sam@example.com", "hunter22")).await?;
//!     let gigs: serde_json::Value = client.get_json("gigs/my-gigs").await?;
//!     println!("{gigs:#}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`gigmarket_client`] - authenticated client, credential stores, token refresh
//! - [`gigmarket_auth`] - login, registration, password reset, logout, profile and
//!   seller onboarding routes

// ============================================================================
// Module Re-exports
// ============================================================================

pub use gigmarket_auth as auth;
pub use gigmarket_client as client;

// ============================================================================
// Type Re-exports
// ============================================================================

pub use gigmarket_client::{
    ApiError, ApiRequest, ApiResponse, AuthClient, AuthClientBuilder, ClientConfig,
    CredentialStore, FileCredentialStore, MemoryCredentialStore, RefreshFailure, SessionEvent,
    StoreError, TokenKey, TokenPair,
};

pub use gigmarket_auth::{
    AccountApi, AuthApi, AuthError, AuthResponse, AuthResult, Detail, LoginRequest,
    PasswordResetConfirm, ProfileUpdate, RegisterRequest, Role, RoleChange, SellerProfile,
    SellerProfileSetup, User,
};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```ignore
/// use gigmarket::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{
        ApiError, ApiRequest, ApiResponse, AuthClient, ClientConfig, CredentialStore,
        FileCredentialStore, MemoryCredentialStore, SessionEvent, TokenPair,
    };

    // Auth
    pub use crate::auth::{AccountApi, AuthApi, AuthError, LoginRequest, RegisterRequest, Role, User};
}

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of gigmarket.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
