use std::time::Duration;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// Timeout or connection failure that persisted through every retry.
    #[error(
        "request to {url} timed out or could not connect after {attempts} attempt(s) \
         (read timeout {timeout:?}): {source}"
    )]
    NetworkTimeout {
        /// Endpoint that was being requested.
        url: String,
        /// Configured read timeout of the request.
        timeout: Duration,
        /// Total attempts made, including the first one.
        attempts: usize,
        /// Transport error of the last attempt.
        #[source]
        source: reqwest::Error,
    },
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Application error embedded in a successful response body.
    #[error("service error: {message}")]
    Service {
        /// `error.message` from the upstream payload.
        message: String,
        /// `error.details` from the upstream payload.
        details: Vec<String>,
        /// `error.code` from the upstream payload, if any.
        code: Option<i64>,
    },
    /// Response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    JsonParse(String),
    /// Transport failure that is not a timeout or connect error.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Valid JSON that does not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Caller input rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SpatialError {
    /// Returns `true` when retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkTimeout { .. })
    }
}
