//! Session lifecycle notifications.

use serde::{Deserialize, Serialize};

/// Capacity of the session event channel.
pub(crate) const EVENT_CAPACITY: usize = 16;

/// Changes to the client's credential set.
///
/// Subscribe with [`AuthClient::subscribe`](crate::AuthClient::subscribe).
/// `Expired` is the signal to send the user back to a login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// A refresh exchange produced a new access token.
    Refreshed,
    /// The refresh exchange failed; stored tokens were cleared.
    Expired,
    /// The user logged out; stored tokens were cleared.
    LoggedOut,
}

impl SessionEvent {
    /// Whether the session can no longer make authenticated calls.
    pub fn ends_session(&self) -> bool {
        matches!(self, SessionEvent::Expired | SessionEvent::LoggedOut)
    }
}
