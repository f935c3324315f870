//! Error types for the `mf-admin` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, AdminError>`.
//!
//! [`AdminError`] covers:
//! - **API errors**: Structured error responses from the admin service
//! - **HTTP status errors**: Unexpected status codes with response body
//! - **HTTP transport errors**: Network, TLS, timeout failures
//! - **JSON / CSV errors**: Decoding failures (responses, storage, imports)
//! - **Validation errors**: Form, console and import input problems
//! - **Not found**: Missing records in the local store
//!
//! The gateway methods in [`crate::api`] never return these for transport
//! problems; they log them and fall back to an empty value. The variants are
//! still surfaced by the strict helpers on
//! [`AdminClient`](crate::client::AdminClient) and by the local store.

use std::fmt;

/// Error response returned by the admin service.
///
/// The service answers failures with a Spring-style body
/// (`{"status": 404, "error": "Not Found", "message": "..."}`).
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// HTTP status echoed in the body.
    #[serde(default)]
    pub status: Option<u16>,
    /// Short reason phrase (e.g. "Not Found").
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable description of the error.
    #[serde(default)]
    pub message: Option<String>,
    /// Request path that failed.
    #[serde(default)]
    pub path: Option<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.status.map_or_else(|| "???".to_owned(), |s| s.to_string()),
            self.error.as_deref().unwrap_or("Unknown Error"),
            self.message.as_deref().unwrap_or("No message"),
        )
    }
}

/// All possible errors produced by the admin client and local store.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// An error response returned by the admin REST API.
    #[error("API error: {0}")]
    Api(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to (de)serialize JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Reading or writing the local storage directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV import file could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A form, import record or console action failed validation.
    #[error("{0}")]
    Validation(String),

    /// No record with the given id exists in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"fund"`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The console could not derive any action from the instruction.
    #[error("I couldn't identify a clear action from your instruction.")]
    NoActionRecognized,

    /// A `CREATE_SCHEME` action named a fund that does not exist.
    #[error("no fund matches \"{0}\"")]
    FundNotResolved(String),

    /// The requested operation is already running for this key.
    #[error("already in progress: {0}")]
    Busy(String),
}

impl AdminError {
    /// Shorthand for a [`AdminError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdminError>;
