//! Session example.
//!
//! Logs in, keeps the tokens in a file, shows the seller profile, lists
//! the seller's gigs and reacts to session events. Expired access tokens
//! are refreshed transparently.
//!
//! Run with:
//! ```bash
//! GIGMARKET_BASE_URL=http://127.0.0.1:8000/api \
//! GIGMARKET_EMAIL=sam@example.com GIGMARKET_PASSWORD=hunter22 \
//! RUST_LOG=gigmarket_client=debug cargo run --example session
//! ```

use gigmarket::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(FileCredentialStore::new(
        std::env::temp_dir().join("gigmarket").join("tokens.json"),
    ));
    let client = AuthClient::new(ClientConfig::from_env("GIGMARKET")?, store)?;
    let auth = AuthApi::new(client.clone());

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if event.ends_session() {
                tracing::warn!(?event, "Session ended, log in again");
            } else {
                tracing::info!(?event, "Session event");
            }
        }
    });

    if client.access_token().await?.is_none() {
        let email = std::env::var("GIGMARKET_EMAIL")?;
        let password = std::env::var("GIGMARKET_PASSWORD")?;
        auth.login(&LoginRequest::new(email, password)).await?;
    }

    let user = auth.current_user().await?;
    println!("Logged in as {} (#{})", user.email, user.pk);

    if user.is_seller {
        let account = AccountApi::new(client.clone());
        let profile = account.seller_profile().await?;
        println!(
            "Seller profile: {} (complete: {})",
            profile.profile_title.as_deref().unwrap_or("untitled"),
            profile.is_profile_complete
        );
    }

    match client.get_json::<serde_json::Value>("gigs/my-gigs").await {
        Ok(gigs) => println!("My gigs: {gigs:#}"),
        Err(err) => println!("Could not load gigs: {}", err.message()),
    }

    Ok(())
}
