use serde_json::Value;
use thiserror::Error;

/// Failure of a verification session, as surfaced to the front end.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    #[error("no pending ticket to bind the verification session to")]
    MissingTicket,

    #[error("verification client unavailable: {0}")]
    ClientUnavailable(String),

    #[error("verification session failed to start: {0}")]
    SessionStart(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Classification of a [`SessionError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required prior ticket data is absent; the user should create a ticket.
    MissingTicket,
    /// The widget capability failed to load; retry by reloading.
    ClientUnavailable,
    /// The backend rejected the start or the network failed; retry by starting again.
    SessionStartError,
    /// The disclosure result was malformed.
    ParseError,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTicket => ErrorKind::MissingTicket,
            Self::ClientUnavailable(_) => ErrorKind::ClientUnavailable,
            Self::SessionStart(_) => ErrorKind::SessionStartError,
            Self::Parse(_) => ErrorKind::ParseError,
        }
    }

    /// The single user-facing error string for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingTicket => "Ticket details missing. Please create a ticket again.",
            Self::ClientUnavailable(_) => "Unable to load verification client.",
            Self::SessionStart(_) => "Verification failed to start.",
            Self::Parse(_) => "Verification result could not be read.",
        }
    }
}

/// A disclosure result that could not be read.
///
/// Carries the offending payload for diagnostics.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("malformed disclosure result: {reason}")]
pub struct ParseError {
    pub reason: String,
    pub raw: Value,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, raw: Value) -> Self {
        Self {
            reason: reason.into(),
            raw,
        }
    }
}

/// Failures reported by a widget implementation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("widget unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned HTTP status {0}")]
    Status(u16),

    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("session ended with status {0}")]
    SessionEnded(String),

    #[error("session timed out")]
    Timeout,

    #[error("session aborted")]
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(SessionError::MissingTicket.kind(), ErrorKind::MissingTicket);
        assert_eq!(
            SessionError::ClientUnavailable("x".into()).kind(),
            ErrorKind::ClientUnavailable
        );
        assert_eq!(
            SessionError::SessionStart("x".into()).kind(),
            ErrorKind::SessionStartError
        );
        let parse = SessionError::from(ParseError::new("bad", json!(null)));
        assert_eq!(parse.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn parse_failures_surface_a_generic_message() {
        let err = SessionError::from(ParseError::new("bad", json!({"secret": 1})));
        assert_eq!(err.user_message(), "Verification result could not be read.");
        assert!(!err.user_message().contains("secret"));
    }
}
