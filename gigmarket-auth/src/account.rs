//! Typed calls for the account and seller onboarding routes.

use crate::api::json_or_default;
use crate::error::{AuthError, AuthResult};
use crate::routes;
use crate::seller::{SellerProfile, SellerProfileSetup};
use crate::types::{Detail, ProfileUpdate, RoleChange, User};
use gigmarket_client::AuthClient;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Profile edits come back either bare or wrapped in `{"user": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl From<UserEnvelope> for User {
    fn from(envelope: UserEnvelope) -> Self {
        match envelope {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

/// Account management and seller onboarding on top of an [`AuthClient`].
///
/// Every call needs a session and fails with
/// [`AuthError::NotAuthenticated`] when no access token is stored.
#[derive(Debug, Clone)]
pub struct AccountApi {
    client: AuthClient,
}

impl AccountApi {
    /// Wrap a client.
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    async fn require_session(&self) -> AuthResult<()> {
        match self.client.access_token().await? {
            Some(_) => Ok(()),
            None => Err(AuthError::NotAuthenticated),
        }
    }

    /// Edit the user's own details.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<User> {
        self.require_session().await?;
        let envelope: UserEnvelope = self.client.patch(routes::USER, update).await?.json()?;
        Ok(envelope.into())
    }

    /// Toggle between buyer and seller.
    ///
    /// Only accounts that are already sellers can switch; others go through
    /// [`become_seller`](Self::become_seller) first.
    pub async fn switch_role(&self) -> AuthResult<RoleChange> {
        self.require_session().await?;
        let response = self.client.post(routes::SWITCH_ROLE, &json!({})).await?;
        let change: RoleChange = json_or_default(response)?;
        info!(role = ?change.current_role, "Role switched");
        Ok(change)
    }

    /// Turn the account into a seller account.
    pub async fn become_seller(&self) -> AuthResult<RoleChange> {
        self.require_session().await?;
        let response = self.client.post(routes::BECOME_SELLER, &json!({})).await?;
        let change: RoleChange = json_or_default(response)?;
        info!("Seller account created");
        Ok(change)
    }

    /// Fetch the seller profile.
    pub async fn seller_profile(&self) -> AuthResult<SellerProfile> {
        self.require_session().await?;
        Ok(self.client.get_json(routes::SELLER_PROFILE_DETAIL).await?)
    }

    /// Create or update the seller profile.
    ///
    /// The backend recomputes [`SellerProfile::is_profile_complete`] on
    /// every update.
    pub async fn setup_seller_profile(
        &self,
        setup: &SellerProfileSetup,
    ) -> AuthResult<SellerProfile> {
        self.require_session().await?;
        let profile: SellerProfile = self
            .client
            .put(routes::SELLER_PROFILE_SETUP, setup)
            .await?
            .json()?;
        info!(complete = profile.is_profile_complete, "Seller profile saved");
        Ok(profile)
    }

    /// Delete the seller profile.
    pub async fn delete_seller_profile(&self) -> AuthResult<Detail> {
        self.require_session().await?;
        let response = self.client.delete(routes::SELLER_PROFILE_DELETE).await?;
        json_or_default(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seller::{Education, Language, LanguageLevel, PortfolioItem, Skill, SkillLevel};
    use crate::types::Role;
    use gigmarket_client::{ClientConfig, MemoryCredentialStore, TokenPair};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn account_for(server: &MockServer, store: MemoryCredentialStore) -> AccountApi {
        let config = ClientConfig::with_base_url(&format!("{}/api/", server.uri())).unwrap();
        AccountApi::new(AuthClient::new(config, Arc::new(store)).unwrap())
    }

    fn signed_in() -> MemoryCredentialStore {
        MemoryCredentialStore::with_tokens(TokenPair::new("A1", "R1"))
    }

    #[tokio::test]
    async fn test_update_profile() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/auth/user/"))
            .and(header("authorization", "Bearer A1"))
            .and(body_json(json!({"first_name": "Dana", "last_name": "Reyes"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pk": 4,
                "email": "dana@example.com",
                "first_name": "Dana",
                "last_name": "Reyes",
                "is_profile_set": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let user = account
            .update_profile(&ProfileUpdate {
                first_name: Some("Dana".into()),
                last_name: Some("Reyes".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.first_name.as_deref(), Some("Dana"));
        assert_eq!(user.last_name.as_deref(), Some("Reyes"));
    }

    #[tokio::test]
    async fn test_update_profile_wrapped_user() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/auth/user/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"pk": 4, "email": "dana@example.com", "username": "dana"}
            })))
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let user = account
            .update_profile(&ProfileUpdate {
                username: Some("dana".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.pk, 4);
        assert_eq!(user.username.as_deref(), Some("dana"));
    }

    #[tokio::test]
    async fn test_update_profile_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/auth/user/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "non_field_errors": ["This email is already in use."]
            })))
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let err = account
            .update_profile(&ProfileUpdate {
                email: Some("taken@example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "This email is already in use.");
        assert!(!err.requires_login());
    }

    #[tokio::test]
    async fn test_switch_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/accounts/user/switch-role/"))
            .and(header("authorization", "Bearer A1"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Switched to seller mode",
                "current_role": "seller"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let change = account.switch_role().await.unwrap();

        assert_eq!(change.current_role, Some(Role::Seller));
        assert_eq!(change.detail.as_deref(), Some("Switched to seller mode"));
    }

    #[tokio::test]
    async fn test_switch_role_for_buyer_only_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/accounts/user/switch-role/"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"detail": "You must be a seller to switch roles."})),
            )
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let err = account.switch_role().await.unwrap_err();

        assert_eq!(err.message(), "You must be a seller to switch roles.");
        assert_eq!(
            account.client().access_token().await.unwrap().as_deref(),
            Some("A1")
        );
    }

    #[tokio::test]
    async fn test_become_seller_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/accounts/seller/become/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        assert_eq!(account.become_seller().await.unwrap(), RoleChange::default());
    }

    #[tokio::test]
    async fn test_setup_and_fetch_seller_profile() {
        let server = MockServer::start().await;
        let education = json!({
            "institution_name": "TU Delft",
            "degree_title": "MSc CS",
            "start_year": 2012,
            "end_year": 2014
        });
        let portfolio = json!({
            "title": "Ledger",
            "description": "Double-entry ledger service.",
            "url_link": "https://github.com/dana/ledger"
        });
        let stored = json!({
            "profile_title": "Rust backend developer",
            "bio": "Ten years of building services that stay up at three in the morning.",
            "portfolio_link": "https://dana.dev",
            "is_profile_complete": true,
            "educations": [education],
            "skills": [
                {"id": 1, "name": "Rust", "level": "expert"},
                {"id": 2, "name": "SQL", "level": "advanced"}
            ],
            "languages": [{"id": 1, "name": "English", "level": "fluent"}],
            "portfolio_items": [portfolio]
        });
        Mock::given(method("PUT"))
            .and(path("/api/accounts/seller/profile/setup/"))
            .and(body_json(json!({
                "profile_title": "Rust backend developer",
                "educations": [education],
                "skills": [
                    {"name": "Rust", "level": "expert"},
                    {"name": "SQL", "level": "advanced"}
                ],
                "languages": [{"name": "English", "level": "fluent"}],
                "portfolio_items": [portfolio]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/accounts/seller/profile/detail/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored))
            .expect(1)
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        let saved = account
            .setup_seller_profile(&SellerProfileSetup {
                profile_title: Some("Rust backend developer".into()),
                educations: Some(vec![Education::new("TU Delft", "MSc CS", 2012, Some(2014))]),
                skills: Some(vec![
                    Skill::new("Rust", SkillLevel::Expert),
                    Skill::new("SQL", SkillLevel::Advanced),
                ]),
                languages: Some(vec![Language::new("English", LanguageLevel::Fluent)]),
                portfolio_items: Some(vec![PortfolioItem::link(
                    "Ledger",
                    "Double-entry ledger service.",
                    "https://github.com/dana/ledger",
                )]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(saved.is_profile_complete);
        assert_eq!(saved.skills.len(), 2);
        assert_eq!(account.seller_profile().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_delete_seller_profile() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/accounts/seller/profile/delete/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let account = account_for(&server, signed_in());
        assert_eq!(account.delete_seller_profile().await.unwrap(), Detail::default());
    }

    #[tokio::test]
    async fn test_calls_require_session() {
        let server = MockServer::start().await;
        let account = account_for(&server, MemoryCredentialStore::new());

        assert!(matches!(account.switch_role().await, Err(AuthError::NotAuthenticated)));
        assert!(matches!(account.seller_profile().await, Err(AuthError::NotAuthenticated)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
