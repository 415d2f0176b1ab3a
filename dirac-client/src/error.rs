use thiserror::Error;

/// Errors returned by [`ProcessorClient`](crate::ProcessorClient).
///
/// Network failures and non-2xx statuses share the `Transport` variant;
/// the client does not interpret status codes individually.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from '{endpoint}': {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ProcessorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProcessorError::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ProcessorError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ProcessorError::Decode { .. })
    }

    /// HTTP status of a transport failure, if the processor answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ProcessorError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Endpoint the failing request targeted.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            ProcessorError::Transport { endpoint, .. } | ProcessorError::Decode { endpoint, .. } => {
                Some(*endpoint)
            }
            ProcessorError::Configuration(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
