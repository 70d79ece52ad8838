//! Error types for gateway calls.

use thiserror::Error;

use bucket_model::ArrayId;

/// The one message shown for every transport-class failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while loading data.";

/// Errors that can occur when talking to the array store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The store has no array with this id.
    #[error("array {id} not found")]
    NotFound {
        /// Requested id.
        id: ArrayId,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with an unexpected status.
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(String),

    /// The request could not be built from the given arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// Returns a user-friendly error message suitable for display.
    ///
    /// Transport-class failures all share [`GENERIC_FAILURE_MESSAGE`]; the
    /// detail belongs in the logs.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotFound { .. } => "No array with this ID was found.",
            Self::InvalidConfig(_) => "The client configuration is invalid.",
            Self::Network(_)
            | Self::Status { .. }
            | Self::Decode(_)
            | Self::InvalidRequest(_) => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Whether the store reported that the requested array does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for gateway calls.
pub type Result<T> = std::result::Result<T, GatewayError>;
