use reqwest::StatusCode;
use shared::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Decode(serde_json::Error),
    #[error("could not encode request parameters: {0}")]
    Encode(serde_json::Error),
}

/// Why an operation produced no data. Every variant collapses to `None` in the
/// plain call path; the detailed path hands it back to the caller.
#[derive(Debug, Error)]
pub enum CallFailure {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("login required")]
    Unauthenticated,
    #[error("session expired, login required")]
    AuthRequired,
    #[error("backend reported success without a payload")]
    EmptyPayload,
    #[error("{message} (code {code})")]
    Rejected { code: String, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}
