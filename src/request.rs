//! Structured request construction.
//!
//! The remote API addresses operations with slash-delimited command paths
//! (`user/get/login/alice`), form-encoded POST bodies with repeated fields
//! (`login[]=a&login[]=b`), and occasionally plain query parameters. Rather
//! than concatenating strings, [`ApiRequest`] keeps path segments, form
//! fields, and query parameters as structured data and encodes each exactly
//! once when the request is dispatched.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use url::form_urlencoded;

/// Characters escaped in command path segments.
///
/// Everything outside `[A-Za-z0-9_.~-]` is percent-encoded, so a username
/// containing `/` or `?` can never break the path structure.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A single administrative API request before dispatch.
///
/// Built from a base command (`user/get`, `channel/add`, ...) plus optional
/// key/value path segments, repeated form fields, and query parameters.
/// Requests with form fields are sent as `application/x-www-form-urlencoded`
/// POSTs; everything else goes out as a GET.
///
/// Most callers never construct one directly; the [`Client`](crate::Client)
/// operation methods build them internally. The type is public so the raw
/// escape hatch ([`Client::call_raw`](crate::Client::call_raw)) can reach
/// endpoints this crate has no dedicated method for.
///
/// # Examples
///
/// ```
/// use ptt_admin::ApiRequest;
///
/// let request = ApiRequest::new("user/get")
///     .segment("login", "alice smith")
///     .segment("max", "10");
/// assert_eq!(request.command_path(), "user/get/login/alice%20smith/max/10");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    command: String,
    segments: Vec<(Option<String>, String)>,
    form: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for the given base command.
    ///
    /// The command itself is trusted (it comes from this crate, not from
    /// user input) and is not percent-encoded.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            segments: Vec::new(),
            form: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Appends a `/key/<value>` pair to the command path.
    ///
    /// The value is percent-encoded when the path is rendered; the key is a
    /// literal from the API's vocabulary (`login`, `name`, `max`, ...).
    pub fn segment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.segments.push((Some(key.into()), value.into()));
        self
    }

    /// Appends a bare `/<value>` segment with no key.
    ///
    /// A few commands take their first argument positionally
    /// (`user/addto/<channel>`) instead of behind a key.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.segments.push((None, value.into()));
        self
    }

    /// Adds one form field to the POST body.
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Adds a repeated form field (`key` once per value, in order).
    ///
    /// The API's batch operations take lists as repeated `name[]`-style
    /// fields, so the key normally ends in `[]`.
    pub fn form_fields<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.form.push((key.to_string(), value.as_ref().to_string()));
        }
        self
    }

    /// Adds a query parameter, appended after the `rnd`/`sid` pair.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Renders the command path with every segment value encoded.
    pub fn command_path(&self) -> String {
        let mut path = self.command.clone();
        for (key, value) in &self.segments {
            if let Some(key) = key {
                path.push('/');
                path.push_str(key);
            }
            path.push('/');
            path.push_str(&utf8_percent_encode(value, SEGMENT).to_string());
        }
        path
    }

    /// Whether this request carries a POST body.
    pub fn has_body(&self) -> bool {
        !self.form.is_empty()
    }

    /// Encodes the form fields as an `application/x-www-form-urlencoded` body.
    pub(crate) fn encode_form(&self) -> String {
        let mut body = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.form {
            body.append_pair(key, value);
        }
        body.finish()
    }

    pub(crate) fn query_params(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Generates the cache-busting token appended to every request URL.
///
/// 32 characters over `a-z0-9`. This only needs to make near-simultaneous
/// requests distinct so intermediaries cannot serve a cached response; it is
/// not a security token.
pub(crate) fn cache_token() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    const LEN: usize = 32;

    let mut rng = rand::thread_rng();
    (0..LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
