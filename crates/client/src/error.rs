/// All errors a record source or mutation call can return.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status other than 404.
    #[error("backend returned status {status}: {message}")]
    Http { status: u16, message: String },

    /// 404 -- the requested record does not exist.
    #[error("not found")]
    NotFound,

    /// The request never produced an HTTP response (connect, DNS, TLS,
    /// runtime plumbing).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape the caller expected.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The call's token was cancelled; any payload was discarded.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound)
    }
}
