use thiserror::Error;

use crate::provider::ProviderId;

/// Failure of a tool's domain operation.
///
/// None of these end the protocol request: the dispatcher turns them into a tool result
/// flagged with `isError` so the caller can read the message.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid latitude {0}: must be between -90 and 90.")]
    InvalidLatitude(f64),

    #[error("Invalid longitude {0}: must be between -180 and 180.")]
    InvalidLongitude(f64),

    #[error("Location name must not be empty.")]
    EmptyName,

    #[error("A location named \"{0}\" already exists. Delete it first to replace it.")]
    DuplicateName(String),

    #[error("No location named \"{0}\" found. Use list_locations to see saved locations.")]
    LocationNotFound(String),

    #[error("No places found matching \"{0}\". Try a more specific search.")]
    NoSearchResults(String),

    #[error("{provider} request failed with status {status}: {body}")]
    Provider {
        provider: ProviderId,
        status: u16,
        body: String,
    },

    #[error("Failed to reach {provider}: {source}")]
    Network {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {provider}: {message}")]
    InvalidResponse {
        provider: ProviderId,
        message: String,
    },

    #[error("Failed to save locations: {0}")]
    Storage(String),
}

/// Failure of the invocation itself, before any tool logic ran.
///
/// These map onto JSON-RPC error objects rather than tool results.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_carries_status() {
        let err = ToolError::Provider {
            provider: ProviderId::Forecast,
            status: 503,
            body: "unavailable".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("forecast"));
    }
}
