//! Response wrapper returned by every successful operation.
//!
//! Rather than stashing "the last payload" on the client, each call returns
//! its own [`ApiResponse`] carrying the parsed payload together with the
//! request metadata useful for diagnostics.

use http::StatusCode;
use serde_json::{Map, Value};
use std::time::Duration;

/// A successful administrative API response.
///
/// The payload is the full JSON object the server returned, including its
/// `"status": "OK"` discriminator, exposed as a map of operation-specific
/// fields (`users`, `channels`, `token`, ...). Payload schemas are owned by
/// the server and intentionally not modeled as fixed structs here.
///
/// # Examples
///
/// ```no_run
/// use ptt_admin::{Client, types::UserFilter};
///
/// # async fn example() -> Result<(), ptt_admin::Error> {
/// # let client = Client::builder().host("h").api_key("k").build()?;
/// let response = client.get_users(&UserFilter::default()).await?;
///
/// if let Some(users) = response.field("users").and_then(|v| v.as_array()) {
///     println!("{} users ({:?} over {})", users.len(), response.latency, response.url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The parsed response payload.
    pub data: Map<String, Value>,

    /// The raw response body, for debugging and logging.
    pub raw_body: String,

    /// The HTTP status of the response (always 200 for a success).
    pub status: StatusCode,

    /// The full URL the request was sent to, including the `rnd` and `sid`
    /// query parameters.
    pub url: String,

    /// Wall-clock duration of the HTTP exchange.
    pub latency: Duration,
}

impl ApiResponse {
    pub(crate) fn new(
        data: Map<String, Value>,
        raw_body: String,
        status: StatusCode,
        url: String,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            url,
            latency,
        }
    }

    /// Returns a payload field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns a payload field as a string slice, if it is a JSON string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name)?.as_str()
    }
}

impl std::ops::Deref for ApiResponse {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
