use thiserror::Error;

/// Errors raised while talking to the odds or language providers
#[derive(Error, Debug)]
pub enum GatewayError {
    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned error: {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    // Payload errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown sport: {0}")]
    UnknownSport(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<GatewayError>,
    },

    // Fatal errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client construction failed: {0}")]
    ClientBuild(String),
}

impl GatewayError {
    /// Recoverable errors resolve to the mock fallback; the rest are fatal
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GatewayError::Config(_) | GatewayError::ClientBuild(_))
    }
}

/// Reasons a leg is refused by the bet slip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LegError {
    #[error("Leg id must not be empty")]
    EmptyId,

    #[error("Invalid odds {0}: decimal odds must be finite and at least 1.0")]
    InvalidOdds(f64),

    #[error("Odds {0} exceed the maximum of {max}", max = crate::models::MAX_DECIMAL_ODDS)]
    OddsTooLong(f64),

    #[error("Invalid confidence {0}: must lie in [0, 100]")]
    InvalidConfidence(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(GatewayError::MalformedPayload("no braces".into()).is_recoverable());
        assert!(GatewayError::UnknownSport("curling".into()).is_recoverable());
        assert!(GatewayError::RetriesExhausted {
            attempts: 6,
            last: Box::new(GatewayError::MalformedPayload("x".into())),
        }
        .is_recoverable());
        assert!(!GatewayError::Config("bad".into()).is_recoverable());
        assert!(!GatewayError::ClientBuild("tls".into()).is_recoverable());
    }

    #[test]
    fn test_retries_exhausted_message_keeps_cause() {
        let err = GatewayError::RetriesExhausted {
            attempts: 3,
            last: Box::new(GatewayError::MalformedPayload("no braces".into())),
        };
        assert_eq!(
            err.to_string(),
            "Gave up after 3 attempts: Malformed payload: no braces"
        );
    }
}
