use thiserror::Error;

use crate::model::LocationId;

/// Why a city name could not be added to the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("City name is empty")]
    EmptyName,

    #[error("City '{name}' not found. Try: {supported}")]
    NotFound { name: String, supported: String },
}

/// A failed current-conditions request for a single location.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Weather request timed out")]
    Timeout,

    #[error("Failed to send weather request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather fetch task did not complete")]
    Aborted,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err)
        }
    }
}

/// A location whose fetch failed during a poll cycle.
#[derive(Debug)]
pub struct FetchFailure {
    pub location_id: LocationId,
    pub location_name: String,
    pub error: FetchError,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    #[error("Poll cycle cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_supported_cities() {
        let err = LocationError::NotFound {
            name: "Atlantis".into(),
            supported: "Oxford, Cambridge".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Atlantis' not found"));
        assert!(msg.contains("Try: Oxford, Cambridge"));
    }

    #[test]
    fn status_error_mentions_code() {
        let err = FetchError::Status {
            status: 503,
            body: "unavailable".into(),
        };
        assert!(err.to_string().contains("503"));
    }
}
