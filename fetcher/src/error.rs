//! Error taxonomy surfaced to consumers.

use payloads::ClientError;

/// Coarse classification of a failed call, used to pick the user-facing
/// treatment (re-login prompt, connectivity banner, inline message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Expired or missing credential. Never retried.
    Auth,
    /// Transport-level failure before a response was produced.
    Network,
    /// The server returned a structured error with a status code.
    Api,
    /// Anything else, e.g. a response body that failed to decode.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    /// Ready to display to the user as-is.
    pub message: String,
    pub status: Option<u16>,
}

impl FetchError {
    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}

/// The one place a caught client error is classified. Pure: no state is
/// touched here.
impl From<ClientError> for FetchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Unauthorized => Self {
                kind: ErrorKind::Auth,
                message: error.to_string(),
                status: Some(401),
            },
            ClientError::Api(status, text) => Self {
                kind: ErrorKind::Api,
                message: text,
                status: Some(status.as_u16()),
            },
            ClientError::Network(source) if source.is_decode() => Self {
                kind: ErrorKind::Unknown,
                message: "Received an unexpected response from the server."
                    .to_string(),
                status: source.status().map(|status| status.as_u16()),
            },
            ClientError::Network(_) => Self {
                kind: ErrorKind::Network,
                message: "Network error. Please check your connection."
                    .to_string(),
                status: None,
            },
        }
    }
}
