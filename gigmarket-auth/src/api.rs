//! Typed calls for the authentication routes.

use crate::error::{AuthError, AuthResult};
use crate::routes;
use crate::types::{AuthResponse, Detail, LoginRequest, PasswordResetConfirm, RegisterRequest, User};
use gigmarket_client::{ApiResponse, AuthClient};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

/// Authentication endpoints on top of an [`AuthClient`].
///
/// Tokens issued by login, registration and Google login are stored by the
/// client's response handling; nothing here writes them directly.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: AuthClient,
}

impl AuthApi {
    /// Wrap a client.
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Log in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        let response: AuthResponse = self.client.post_json(routes::LOGIN, request).await?;
        info!(authenticated = response.is_authenticated(), "Login completed");
        Ok(response)
    }

    /// Create an account. The backend usually answers with a verification
    /// notice rather than tokens.
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse> {
        let response: AuthResponse = self.client.post_json(routes::REGISTRATION, request).await?;
        info!(authenticated = response.is_authenticated(), "Registration completed");
        Ok(response)
    }

    /// Confirm an email address.
    pub async fn verify_email(&self, key: &str) -> AuthResult<Detail> {
        let response = self
            .client
            .post(routes::VERIFY_EMAIL, &json!({ "key": key }))
            .await?;
        json_or_default(response)
    }

    /// Send the verification mail again.
    pub async fn resend_verification_email(&self, email: &str) -> AuthResult<Detail> {
        let response = self
            .client
            .post(routes::RESEND_VERIFICATION_EMAIL, &json!({ "email": email }))
            .await?;
        json_or_default(response)
    }

    /// Mail a password reset link.
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<Detail> {
        let response = self
            .client
            .post(routes::PASSWORD_RESET, &json!({ "email": email }))
            .await?;
        json_or_default(response)
    }

    /// Set a new password from a reset link.
    pub async fn reset_password(&self, request: &PasswordResetConfirm) -> AuthResult<Detail> {
        let response = self
            .client
            .post(routes::PASSWORD_RESET_CONFIRM, request)
            .await?;
        json_or_default(response)
    }

    /// Log in with a Google OAuth access token.
    pub async fn google_login(&self, access_token: &str) -> AuthResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post_json(routes::GOOGLE_LOGIN, &json!({ "access_token": access_token }))
            .await?;
        info!(authenticated = response.is_authenticated(), "Google login completed");
        Ok(response)
    }

    /// Fetch the authenticated user.
    pub async fn current_user(&self) -> AuthResult<User> {
        if self.client.access_token().await?.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(self.client.get_json(routes::USER).await?)
    }

    /// Log out.
    ///
    /// The stored refresh token is sent so the backend can blacklist it.
    /// Local tokens are cleared and [`SessionEvent::LoggedOut`] is broadcast
    /// even when the logout call fails; that failure is still returned.
    ///
    /// [`SessionEvent::LoggedOut`]: gigmarket_client::SessionEvent::LoggedOut
    pub async fn logout(&self) -> AuthResult<()> {
        let remote = match self.client.refresh_token().await {
            Ok(Some(refresh)) => self
                .client
                .post(routes::LOGOUT, &json!({ "refresh": refresh }))
                .await
                .map(|_| ()),
            Ok(None) => self.client.post(routes::LOGOUT, &json!({})).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = &remote {
            warn!(error = %e, "Logout call failed, clearing local session anyway");
        }

        self.client.end_session().await?;
        debug!("Local session cleared");

        Ok(remote?)
    }
}

/// Parse a JSON body, treating an empty body as `T::default()`.
pub(crate) fn json_or_default<T: DeserializeOwned + Default>(
    response: ApiResponse,
) -> AuthResult<T> {
    if response.bytes().is_empty() {
        return Ok(T::default());
    }
    Ok(response.json()?)
}
