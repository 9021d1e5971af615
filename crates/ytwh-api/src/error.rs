use thiserror::Error;

/// Errors returned by [`crate::YoutubeClient`] for a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client. The request URL
    /// is stripped before wrapping so the API key never reaches a log line.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {resource}")]
    UnexpectedStatus { status: u16, resource: &'static str },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// A raw API record that cannot become a warehouse row.
///
/// Fatal to that one record only; callers log the raw JSON and skip it.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("malformed {resource} record: {source}")]
    Deserialize {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource} {id} is missing the `{part}` part")]
    MissingPart {
        resource: &'static str,
        id: String,
        part: &'static str,
    },

    #[error("{resource} {id} has an invalid {field}: \"{value}\"")]
    InvalidValue {
        resource: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },
}
