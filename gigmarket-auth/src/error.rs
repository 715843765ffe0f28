//! Authentication errors.

use gigmarket_client::ApiError;
use thiserror::Error;

/// Errors returned by [`AuthApi`](crate::AuthApi).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The underlying API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call needs a session but no access token is stored.
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    /// Message suitable for showing next to a form.
    pub fn message(&self) -> String {
        match self {
            AuthError::Api(err) => err.message(),
            AuthError::NotAuthenticated => self.to_string(),
        }
    }

    /// Whether the caller should send the user to the login screen.
    pub fn requires_login(&self) -> bool {
        match self {
            AuthError::Api(err) => err.is_unauthorized(),
            AuthError::NotAuthenticated => true,
        }
    }
}

/// Result type for authentication calls.
pub type AuthResult<T> = Result<T, AuthError>;
