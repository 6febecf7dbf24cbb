//! Error types for the remote API client.

/// Errors from talking to the scheme navigator backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint could not be reached or the connection failed mid-request.
    #[error("API {method} {path} unreachable: {message}")]
    Network {
        method: &'static str,
        path: String,
        message: String,
    },
    /// The endpoint answered with a non-success status.
    #[error("API {method} {path} failed ({status}): {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },
    /// The endpoint answered successfully but the body was not what we expect.
    #[error("API {method} {path} returned a malformed body: {message}")]
    Malformed {
        method: &'static str,
        path: String,
        message: String,
    },
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Malformed bodies count as failures to reach a working server.
    pub fn is_network_failure(&self) -> bool {
        !matches!(self, ClientError::Config(_))
    }
}
