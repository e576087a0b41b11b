//! Verification session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single verification session.
///
/// `Idle → Starting → AwaitingUser → Completed | Failed | Cancelled`.
/// Scoped to one controller instance and never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No session has been started.
    #[default]
    Idle,
    /// Loading the widget and issuing the start request.
    Starting,
    /// The session pointer is presented; waiting for the user's app.
    AwaitingUser,
    /// The session finished and its result was parsed.
    Completed,
    /// The session could not be started or its result could not be read.
    Failed,
    /// The session was aborted before it finished.
    Cancelled,
}

impl SessionState {
    /// Whether no further transitions happen for this session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether a widget may currently own the mount anchor.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::AwaitingUser)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::AwaitingUser => "awaiting_user",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Starting.is_terminal());
        assert!(!SessionState::AwaitingUser.is_terminal());
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
    }

    #[test]
    fn active_states() {
        assert!(SessionState::Starting.is_active());
        assert!(SessionState::AwaitingUser.is_active());
        assert!(!SessionState::Idle.is_active());
        assert!(!SessionState::Completed.is_active());
    }
}
