use thiserror::Error;

/// Why a collaborator call did not produce a value.
#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {function} failed: {source}")]
    Transport {
        function: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{function} returned HTTP {status}: {body}")]
    Status {
        function: &'static str,
        status: u16,
        body: String,
    },
    #[error("{function} failed: {message}")]
    Backend {
        function: &'static str,
        message: String,
    },
    #[error("unexpected response from {function}: {reason}")]
    Decode {
        function: &'static str,
        reason: String,
    },
    #[error("no waitlist endpoint is configured")]
    NotConfigured,
}

impl WaitlistError {
    /// Function path the failed call targeted, if it reached the request stage.
    #[must_use]
    pub fn function(&self) -> Option<&'static str> {
        match self {
            Self::Transport { function, .. }
            | Self::Status { function, .. }
            | Self::Backend { function, .. }
            | Self::Decode { function, .. } => Some(function),
            Self::Client(_) | Self::NotConfigured => None,
        }
    }
}
