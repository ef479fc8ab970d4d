use thiserror::Error;

/// Transport-level failures only. A non-2xx status is not an error at this layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Http(err) }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }
}
