//! TCP adapter error types.

use devicehub_domain::error::{DeviceHubError, ValidationError};

/// Reasons a request cannot be answered with a success envelope.
///
/// The `Display` text becomes the response's `error_message`.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// `request_type` is missing, not an integer, or not 1, 2 or 3.
    #[error("Invalid request type.")]
    InvalidRequestType,

    /// The payload is not valid JSON or not a JSON object.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A domain-level error (validation, not-found, etc.).
    #[error(transparent)]
    Domain(#[from] DeviceHubError),
}

impl From<ValidationError> for ProtocolError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

/// Socket-level failures. These end the connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Reading from or writing to the socket failed.
    #[error("socket I/O failed")]
    Io(#[from] std::io::Error),

    /// The peer sent a line that is not a response envelope.
    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),

    /// The peer closed the connection before answering.
    #[error("connection closed by peer")]
    Closed,
}
