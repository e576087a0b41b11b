use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("ticket request missing required fields")]
    IncompleteTicket,

    #[error("HTTP request to backend failed: {0}")]
    RequestFailed(String),

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),
}
