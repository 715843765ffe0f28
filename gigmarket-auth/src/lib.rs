//! Authentication endpoints for the gigmarket API.
//!
//! This crate provides typed wrappers for the backend's `/auth/*` routes:
//!
//! - [`AuthApi`]: login, registration, email verification, password reset,
//!   Google login, current user and logout
//! - [`AccountApi`]: profile edits, buyer/seller role switch and seller
//!   onboarding
//! - [`LoginRequest`], [`RegisterRequest`], [`PasswordResetConfirm`]: request bodies
//! - [`AuthResponse`], [`User`], [`Detail`]: response bodies
//! - [`SellerProfile`], [`SellerProfileSetup`]: seller profile bodies
//! - [`routes`]: route constants
//!
//! Token storage and refresh are handled by [`gigmarket_client::AuthClient`];
//! this crate only shapes requests and responses.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod account;
mod api;
mod error;
pub mod routes;
mod seller;
mod types;

pub use account::AccountApi;
pub use api::AuthApi;
pub use error::{AuthError, AuthResult};
pub use seller::{
    Education, Language, LanguageLevel, PortfolioItem, SellerProfile, SellerProfileSetup, Skill,
    SkillLevel,
};
pub use types::{
    AuthResponse, Detail, LoginRequest, PasswordResetConfirm, ProfileUpdate, RegisterRequest,
    Role, RoleChange, User,
};
