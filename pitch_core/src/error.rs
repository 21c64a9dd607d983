//! Error types for the event store boundary.
//!
//! Aggregation itself never fails: empty input produces empty output and
//! degenerate statistical input produces a flagged sentinel. The only
//! fallible layer is the store, and every `StoreError` is recovered at the
//! session boundary by substituting an empty result set.

/// All errors that can occur while fetching from the event store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read or decode the response body as JSON.
    #[error("failed to decode response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response decoded but did not have the expected shape.
    #[error("malformed payload from {url}: {context}")]
    MalformedPayload { url: String, context: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
