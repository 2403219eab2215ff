//! Error types shared across the protocol crates.

use thiserror::Error;

/// Errors returned by the external collaborators (ledger, bundler, index, gateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request did not produce a response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service refused the request.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The client is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Transport status code, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced by the document codec.
///
/// Decoding never fails outright: these travel inside a
/// [`DecodedDocument`](crate::DecodedDocument) next to the recovered body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input has no opening and closing delimiter lines.
    #[error("no valid front matter")]
    NoFrontMatter,

    /// The delimited block is not a valid YAML mapping.
    #[error("malformed front matter: {0}")]
    MalformedMetadata(String),

    /// Metadata could not be serialized.
    #[error("failed to encode front matter: {0}")]
    Encode(String),
}
