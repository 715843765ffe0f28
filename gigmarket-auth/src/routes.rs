//! Authentication routes, relative to the API base URL.

/// Obtain a token pair with email and password.
pub const LOGIN: &str = "auth/login/";
/// Blacklist the refresh token server-side.
pub const LOGOUT: &str = "auth/logout/";
/// Create an account.
pub const REGISTRATION: &str = "auth/registration/";
/// Confirm an email address with the key from the verification mail.
pub const VERIFY_EMAIL: &str = "auth/registration/verify-email/";
/// Send the verification mail again.
pub const RESEND_VERIFICATION_EMAIL: &str = "auth/registration/resend-email/";
/// Mail a password reset link.
pub const PASSWORD_RESET: &str = "auth/password/reset/";
/// Set a new password using the uid/token from the reset link.
pub const PASSWORD_RESET_CONFIRM: &str = "auth/password/reset/confirm/";
/// Exchange a Google access token for a token pair.
pub const GOOGLE_LOGIN: &str = "auth/google/";
/// Details of the authenticated user.
pub const USER: &str = "auth/user/";
/// Exchange a refresh token for a new access token.
pub const TOKEN_REFRESH: &str = gigmarket_client::config::DEFAULT_REFRESH_PATH;

/// Toggle the authenticated user between buyer and seller.
pub const SWITCH_ROLE: &str = "accounts/user/switch-role/";
/// Turn a buyer account into a seller account.
pub const BECOME_SELLER: &str = "accounts/seller/become/";
/// Create or replace the seller profile.
pub const SELLER_PROFILE_SETUP: &str = "accounts/seller/profile/setup/";
/// The authenticated seller's profile.
pub const SELLER_PROFILE_DETAIL: &str = "accounts/seller/profile/detail/";
/// Remove the seller profile.
pub const SELLER_PROFILE_DELETE: &str = "accounts/seller/profile/delete/";
