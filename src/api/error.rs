use thiserror::Error;

/// Failures talking to the property listing endpoint.
///
/// The dashboard collapses all of these into one user-facing message; the
/// variants only exist so the log can say what actually went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure, etc.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned HTTP {code}")]
    Status { code: u16 },

    /// Body was not a property envelope.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Configured base URL could not be joined with the endpoint path.
    #[error("invalid API url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The client could not be set up at startup
    #[error("property API unavailable: {0}")]
    Unavailable(String),
}
