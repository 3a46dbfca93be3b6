use async_trait::async_trait;
use thiserror::Error;

use crate::core::links::InvalidLinkError;

/// OAuth scopes, one set per remote service.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const SLIDES_SCOPE: &str = "https://www.googleapis.com/auth/presentations";

/// Errors that can be raised by the remote document gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("remote API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Link(#[from] InvalidLinkError),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl GatewayError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Capability to mint bearer tokens for a remote service.
///
/// Each API client receives one of these by injection instead of owning the
/// credential flow itself, so the same service-account authenticator can
/// back several clients, and tests can supply a canned token.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, GatewayError>;
}
