use thiserror::Error;

/// Every fatal or surfaced error in the engine, tagged with a stable category
/// string for structured logging (see `EngineError::category`).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Illegal option: {0}")]
    IllegalOption(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Not configured: no host given (set --host or CNS_HOST)")]
    NotConfigured,

    #[error("Not connected: store operation attempted before connect()")]
    NotConnected,

    #[error("Failed to watch {prefix}: {source}")]
    FailedToWatch {
        prefix: String,
        source: anyhow::Error,
    },

    #[error("Failed to get all keys under {prefix}: {source}")]
    FailedToGetAll {
        prefix: String,
        source: anyhow::Error,
    },

    #[error("Failed to get {key}: {source}")]
    FailedToGet { key: String, source: anyhow::Error },

    #[error("Failed to put {key}: {source}")]
    FailedToPut { key: String, source: anyhow::Error },
}

impl EngineError {
    /// Stable category tag, independent of the interpolated message, for
    /// log correlation and tests.
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::IllegalOption(_) => "illegal_option",
            EngineError::MissingArgument(_) => "missing_argument",
            EngineError::NotConfigured => "not_configured",
            EngineError::NotConnected => "not_connected",
            EngineError::FailedToWatch { .. } => "failed_to_watch",
            EngineError::FailedToGetAll { .. } => "failed_to_get_all",
            EngineError::FailedToGet { .. } => "failed_to_get",
            EngineError::FailedToPut { .. } => "failed_to_put",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_stable_per_variant() {
        assert_eq!(
            EngineError::IllegalOption("--bogus".into()).category(),
            "illegal_option"
        );
        assert_eq!(EngineError::NotConfigured.category(), "not_configured");
        assert_eq!(EngineError::NotConnected.category(), "not_connected");
    }

    #[test]
    fn messages_match_cli_contract() {
        assert_eq!(
            EngineError::IllegalOption("--bogus".into()).to_string(),
            "Illegal option: --bogus"
        );
        assert_eq!(
            EngineError::MissingArgument("--host".into()).to_string(),
            "Missing argument: --host"
        );
    }
}
