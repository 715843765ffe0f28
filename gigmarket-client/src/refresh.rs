//! Single-flight token refresh.
//!
//! When several requests hit a 401 at once, only the first one starts a
//! refresh exchange. Everyone else awaits the same [`Shared`] future and
//! receives a clone of its outcome, so the exchange runs once and its side
//! effects (store update, session event) happen once.
//!
//! The exchange runs on its own task, so it completes even if every caller
//! is cancelled. Each completion bumps a generation counter; a request that
//! reaches recovery after the exchange it should have joined has finished
//! gets that exchange's outcome instead of starting another one.

use crate::session::SessionEvent;
use crate::store::{CredentialStore, TokenKey, TokenPair};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

/// Result of one refresh exchange: the new access token.
pub type RefreshOutcome = Result<String, RefreshFailure>;

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Why a refresh exchange failed.
///
/// Every failure ends the session. Cloned to each waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    /// No refresh token was stored.
    #[error("No refresh token stored")]
    MissingRefreshToken,

    /// The refresh endpoint answered with a non-success status.
    #[error("Refresh rejected with HTTP {0}")]
    Rejected(u16),

    /// The refresh endpoint answered 2xx without an access token.
    #[error("Refresh response carried no access token")]
    MissingAccessToken,

    /// The exchange exceeded the configured bound.
    #[error("Refresh timed out")]
    Timeout,

    /// Network failure.
    #[error("Refresh transport error: {0}")]
    Transport(String),

    /// Reading or writing the credential store failed.
    #[error("Credential store error: {0}")]
    Store(String),

    /// The refresh task panicked or was cancelled by the runtime.
    #[error("Refresh task aborted")]
    Aborted,
}

#[derive(Default)]
struct RefreshState {
    in_flight: Option<SharedRefresh>,
    generation: u64,
    last: Option<RefreshOutcome>,
}

/// Holds the outstanding refresh, if any, and the outcome of the last one.
///
/// `in_flight` is `Some` exactly while an exchange is running. The lock is
/// never held across an await.
#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether an exchange is currently outstanding.
    pub(crate) fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Number of exchanges completed so far.
    ///
    /// Read before dispatching a request and hand it back to [`run`](Self::run).
    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Join the outstanding exchange, reuse one that completed after
    /// generation `seen`, or start a new one with `start`.
    pub(crate) async fn run<F>(&self, seen: u64, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
    {
        let shared = {
            let mut state = self.state.lock();
            if let Some(existing) = state.in_flight.clone() {
                debug!("Joining in-flight token refresh");
                existing
            } else {
                if state.generation != seen {
                    if let Some(outcome) = state.last.clone() {
                        debug!("Token refresh completed since dispatch");
                        return outcome;
                    }
                }
                let fresh = Self::spawn(Arc::clone(&self.state), start());
                state.in_flight = Some(fresh.clone());
                fresh
            }
        };

        shared.await
    }

    fn spawn(
        state: Arc<Mutex<RefreshState>>,
        exchange: BoxFuture<'static, RefreshOutcome>,
    ) -> SharedRefresh {
        let handle = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(exchange)
                .catch_unwind()
                .await
                .unwrap_or(Err(RefreshFailure::Aborted));

            let mut state = state.lock();
            state.in_flight = None;
            state.generation += 1;
            state.last = Some(outcome.clone());
            outcome
        });

        async move { handle.await.unwrap_or(Err(RefreshFailure::Aborted)) }
            .boxed()
            .shared()
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}

/// Everything one refresh exchange needs, detached from the client so the
/// shared future does not keep the client alive.
pub(crate) struct RefreshExchange {
    pub(crate) http: Client,
    pub(crate) url: Url,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) events: broadcast::Sender<SessionEvent>,
    pub(crate) timeout: Option<Duration>,
}

impl RefreshExchange {
    /// Run the exchange and apply its outcome to the store.
    ///
    /// On success the new tokens are persisted and `Refreshed` is broadcast.
    /// On any failure both tokens are cleared and `Expired` is broadcast.
    pub(crate) async fn execute(self) -> RefreshOutcome {
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange())
                .await
                .unwrap_or(Err(RefreshFailure::Timeout)),
            None => self.exchange().await,
        };

        match &outcome {
            Ok(_) => {
                info!("Access token refreshed");
                let _ = self.events.send(SessionEvent::Refreshed);
            }
            Err(failure) => {
                warn!(error = %failure, "Token refresh failed, clearing session");
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Failed to clear credentials after refresh failure");
                }
                let _ = self.events.send(SessionEvent::Expired);
            }
        }

        outcome
    }

    async fn exchange(&self) -> RefreshOutcome {
        let refresh = self
            .store
            .get(TokenKey::Refresh)
            .await
            .map_err(|e| RefreshFailure::Store(e.to_string()))?
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        debug!(url = %self.url, "Exchanging refresh token");

        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshFailure::Rejected(status.as_u16()));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

        let access = body
            .access
            .filter(|t| !t.is_empty())
            .ok_or(RefreshFailure::MissingAccessToken)?;

        let pair = TokenPair {
            access: access.clone(),
            refresh: body.refresh.filter(|t| !t.is_empty()),
        };
        self.store
            .set(pair)
            .await
            .map_err(|e| RefreshFailure::Store(e.to_string()))?;

        Ok(access)
    }
}
