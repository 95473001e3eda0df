use thiserror::Error;

/// Why a fetch from the data source produced no candidates.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connect, timeout, reset.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    /// The endpoint answered with a non-success status.
    #[error("API responded with status {status}")]
    SourceError { status: u16, body: String },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    /// The source could not be built from the configuration.
    #[error("invalid source configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let err = FetchError::SourceError {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "API responded with status 503");

        let err: FetchError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
        assert!(err.to_string().starts_with("malformed payload"));
    }
}
