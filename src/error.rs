//! Error types for administrative API calls.
//!
//! Every failure carries enough context to debug it without re-running the
//! request: the final URL that was hit, the HTTP status when one was
//! received, and either the server's own error report or the transport-level
//! detail.

use http::StatusCode;

/// The main error type for administrative API calls.
///
/// Failures fall into three groups matching the server's numeric error
/// taxonomy: configuration errors caught at build time, transport errors
/// (connection failures, non-200 statuses, bodies that are not a JSON status
/// object), and application errors reported by the server itself.
///
/// # Examples
///
/// ```no_run
/// use ptt_admin::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let mut client = Client::builder()
///     .host("ptt.example.com")
///     .api_key("secret")
///     .build()?;
///
/// match client.auth("admin", "hunter2").await {
///     Ok(_) => println!("session: {:?}", client.session_id()),
///     Err(Error::Api { code, status, .. }) => {
///         eprintln!("server rejected login: {} (code {})", status, code);
///     }
///     Err(e) => eprintln!("request failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid client configuration.
    ///
    /// Returned by [`ClientBuilder::build`](crate::ClientBuilder::build) when
    /// required settings are missing or the host does not parse as a URL.
    /// Configuration problems are surfaced eagerly at construction rather
    /// than on first use.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The API could not be reached or did not answer in the expected shape.
    ///
    /// Covers connection failures, timeouts, non-200 HTTP statuses, and
    /// response bodies that are not a JSON object carrying a `status` field.
    /// An unparseable body and a parsed body with no `status` discriminator
    /// are the same case.
    #[error("API is not available: {detail}")]
    Transport {
        /// Human-readable detail, including the HTTP status or the
        /// underlying transport error when available.
        detail: String,
        /// The HTTP status code, when a response was received at all.
        status: Option<StatusCode>,
        /// The full URL of the failed request.
        url: String,
    },

    /// The server processed the request and reported an application error.
    ///
    /// The `code`/`status` pair is passed through verbatim; the code space is
    /// owned by the remote server and not validated locally.
    #[error("server returned \"{status}\" (code {code})")]
    Api {
        /// Server-supplied numeric error code.
        code: i64,
        /// Server-supplied error message (the non-`OK` value of the
        /// response's `status` field).
        status: String,
        /// The full URL of the failed request.
        url: String,
    },
}

impl Error {
    /// Returns the numeric error code for this failure.
    ///
    /// Configuration errors map to `1000`, transport errors to `1010`, and
    /// application errors carry the server's own code.
    pub fn code(&self) -> i64 {
        match self {
            Error::Configuration(_) => 1000,
            Error::Transport { .. } => 1010,
            Error::Api { code, .. } => *code,
        }
    }

    /// Returns the HTTP status code if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Transport { status, .. } => *status,
            Error::Api { .. } => Some(StatusCode::OK),
            Error::Configuration(_) => None,
        }
    }

    /// Returns the URL of the failed request, if one was issued.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. } | Error::Api { url, .. } => Some(url),
            Error::Configuration(_) => None,
        }
    }

    pub(crate) fn transport(
        url: impl Into<String>,
        status: Option<StatusCode>,
        detail: impl Into<String>,
    ) -> Self {
        Error::Transport {
            detail: detail.into(),
            status,
            url: url.into(),
        }
    }
}

/// A specialized `Result` type for administrative API calls.
pub type Result<T> = std::result::Result<T, Error>;
