//! Error types for the API client.

/// Errors that can occur when fetching from the St. Louis Fed APIs.
///
/// Every variant is terminal for the fetch that produced it: pages fetched
/// before the failure are discarded.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered with an XML error envelope (GeoFRED, FRASER).
    #[error("Received error code \"{code}\" and message \"{message}\" for URL {url}")]
    RemoteProtocol {
        code: String,
        message: String,
        url: String,
    },
    /// The response was neither JSON nor an XML error envelope.
    #[error("Unexpected content-type \"{content_type}\" for URL {url}")]
    UnexpectedContentType { content_type: String, url: String },
    /// The JSON body carried an `error_code`/`error_message` pair.
    #[error("Received error code \"{code}\" and message \"{message}\" for URL {url}")]
    RemoteApi {
        status: u16,
        code: i64,
        message: String,
        url: String,
    },
    /// Any other non-success HTTP status.
    #[error("Received status code \"{status}\" for URL {url}")]
    RemoteStatus { status: u16, url: String },
    /// Caller input was rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The fetch was aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,
    /// The body could not be decoded into the expected shape.
    #[error("Failed to decode response for URL {url}: {reason}")]
    Decode { url: String, reason: String },
    /// Transport failure: connect, TLS, timeout, body read.
    #[error("Network error")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// The URL of the request that failed, when the failure came from the server.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::RemoteProtocol { url, .. }
            | Error::UnexpectedContentType { url, .. }
            | Error::RemoteApi { url, .. }
            | Error::RemoteStatus { url, .. }
            | Error::Decode { url, .. } => Some(url),
            Error::Validation(_) | Error::Cancelled | Error::Network(_) => None,
        }
    }

    /// Shorthand used by the validation layer.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
