use thiserror::Error;

/// Errors from [`crate::travel_time::TravelTimeProvider::get_travel_time_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    /// No points were provided.
    ///
    /// Providers require at least one point to compute a matrix. Callers
    /// should pre-filter input to avoid this condition.
    #[error("at least one point is required")]
    EmptyInput,
    /// The request to a routing service timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The routing service could not be reached.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The routing service rejected the request.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `NoTable`.
        code: String,
        /// Service message.
        message: String,
    },
    /// The routing service response could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
}
