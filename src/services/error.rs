use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("provider did not answer within the timeout")]
    Timeout,

    #[error("provider returned no data for {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Client-side timeouts become `Timeout`; other transport failures stay `Http`
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(error)
        }
    }

    /// Transport failures, 429 and 5xx are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_connect() || e.is_request(),
            ProviderError::Status(code) => *code == 429 || *code >= 500,
            ProviderError::Timeout => true,
            ProviderError::Decode(_) | ProviderError::EmptyResponse(_) => false,
        }
    }
}
