//! Request and response bodies for the authentication routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials for [`AuthApi::login`](crate::AuthApi::login).
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body for [`AuthApi::register`](crate::AuthApi::register).
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password1: String,
    /// Confirmation of the chosen password.
    pub password2: String,
}

impl RegisterRequest {
    /// Create a registration request with the password entered twice.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            password1: password.clone(),
            password2: password,
        }
    }
}

/// Body for [`AuthApi::reset_password`](crate::AuthApi::reset_password).
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    /// Encoded user id from the reset link.
    pub uid: String,
    /// Reset token from the reset link.
    pub token: String,
    /// New password.
    pub new_password1: String,
    /// Confirmation of the new password.
    pub new_password2: String,
}

/// Response of the login, registration and Google login routes.
///
/// The client stores `access`/`refresh` itself; they are kept here so a
/// caller can tell whether the backend issued tokens at all.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    /// Issued access token.
    #[serde(default, alias = "access_token")]
    pub access: Option<String>,
    /// Issued refresh token.
    #[serde(default, alias = "refresh_token")]
    pub refresh: Option<String>,
    /// The authenticated user.
    #[serde(default)]
    pub user: Option<User>,
    /// Informational message, e.g. "Verification e-mail sent."
    #[serde(default)]
    pub detail: Option<String>,
}

impl AuthResponse {
    /// Whether the backend issued an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Which side of the marketplace the user is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browsing and ordering gigs.
    Buyer,
    /// Publishing gigs and fulfilling orders.
    Seller,
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    #[serde(alias = "id")]
    pub pk: u64,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the user has a seller profile.
    #[serde(default)]
    pub is_seller: bool,
    /// Role the user is currently acting as.
    #[serde(default)]
    pub current_role: Option<Role>,
    /// Avatar URL.
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Whether the email address has been confirmed.
    #[serde(default)]
    pub is_email_verified: bool,
    /// Whether onboarding is complete.
    #[serde(default)]
    pub is_profile_set: bool,
    /// Account creation time.
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

/// Body for [`AccountApi::update_profile`](crate::AccountApi::update_profile).
///
/// Only the fields that are `Some` are sent. Changing `email` marks the
/// address unverified until it is confirmed again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Answer of the role switch and become-seller routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoleChange {
    /// Role the user acts as after the change, when the backend reports it.
    #[serde(default)]
    pub current_role: Option<Role>,
    /// Whether the account can act as a seller.
    #[serde(default)]
    pub is_seller: Option<bool>,
    /// Server message.
    #[serde(default, alias = "message")]
    pub detail: Option<String>,
}

/// Generic `{"detail": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Detail {
    /// Server message.
    #[serde(default)]
    pub detail: String,
}
