use thiserror::Error;

/// Errors that can occur while talking to the listings API
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
