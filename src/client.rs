//! The administrative API client.
//!
//! [`Client`] is the main entry point. Use [`ClientBuilder`] to configure
//! and create one, authenticate with [`Client::auth`], then call the
//! per-operation methods. Every operation is one blocking-until-complete
//! HTTP exchange; there is no retry logic and no background work.

use crate::{
    digest,
    request::{self, ApiRequest},
    types::{ChannelFilter, LocationQuery, RoleSettings, UserAttributes, UserFilter},
    ApiResponse, Error, Result,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use url::{form_urlencoded, Url};

/// A client for a push-to-talk server's administrative HTTP API.
///
/// The client holds the connection configuration and the current session id.
/// Each operation returns its own [`ApiResponse`] or [`Error`]; nothing is
/// accumulated on the client besides the session. One client instance is one
/// logical session used by one logical caller at a time: methods that touch
/// the session take `&mut self`, and the type is deliberately not built for
/// concurrent sharing. Callers that want parallel requests should create
/// independent clients.
///
/// # Examples
///
/// ```no_run
/// use ptt_admin::{Client, types::UserFilter};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), ptt_admin::Error> {
/// let mut client = Client::builder()
///     .host("ptt.example.com")
///     .api_key("shared-secret")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// client.auth("admin", "hunter2").await?;
///
/// let users = client.get_users(&UserFilter::default().max(50)).await?;
/// if let Some(list) = users.field("users").and_then(|v| v.as_array()) {
///     println!("{} users", list.len());
/// }
///
/// client.logout().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: String,
    api_key: String,
    sid: Option<String>,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    token: String,
    sid: String,
}

impl Client {
    /// Creates a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The current session id, if authenticated.
    ///
    /// Session ids are reusable across client instances: store this value
    /// and hand it to [`ClientBuilder::session_id`] later to skip the login
    /// handshake.
    pub fn session_id(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Authenticates the session.
    ///
    /// Two-step handshake: `user/gettoken` issues a one-time token and a
    /// session id, then `user/login` is called with the username and the
    /// digest `md5(md5(password) + token + api_key)`. On success the session
    /// id is attached to every subsequent request until [`Client::logout`].
    pub async fn auth(&mut self, username: &str, password: &str) -> Result<ApiResponse> {
        let grant = self.call(ApiRequest::new("user/gettoken")).await?;
        let url = grant.url.clone();
        let grant: TokenGrant = serde_json::from_value(Value::Object(grant.data))
            .map_err(|e| {
                Error::transport(
                    url,
                    Some(StatusCode::OK),
                    format!("gettoken payload missing token/sid: {e}"),
                )
            })?;
        self.sid = Some(grant.sid);

        let password = digest::password_digest(password, &grant.token, &self.api_key);
        self.call(
            ApiRequest::new("user/login")
                .form_field("username", username)
                .form_field("password", password),
        )
        .await
    }

    /// Ends the session.
    ///
    /// The local session id is cleared even when the remote call fails;
    /// best-effort cleanup is intentional so a dead session is never reused.
    pub async fn logout(&mut self) -> Result<ApiResponse> {
        let result = self.call(ApiRequest::new("user/logout")).await;
        self.sid = None;
        result
    }

    /// Lists users, or fetches one user's details.
    ///
    /// The success payload carries the `users` list.
    pub async fn get_users(&self, filter: &UserFilter) -> Result<ApiResponse> {
        self.call(user_get_request(filter)).await
    }

    /// Lists channels, or fetches one channel's details.
    ///
    /// The success payload carries the `channels` list.
    pub async fn get_channels(&self, filter: &ChannelFilter) -> Result<ApiResponse> {
        self.call(channel_get_request(filter)).await
    }

    /// Adds users to a single channel.
    pub async fn add_to_channel<I, S>(&self, channel: &str, users: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(
            ApiRequest::new("user/addto")
                .arg(channel)
                .form_fields("login[]", users),
        )
        .await
    }

    /// Removes users from a single channel.
    pub async fn remove_from_channel<I, S>(&self, channel: &str, users: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(
            ApiRequest::new("user/removefrom")
                .arg(channel)
                .form_fields("login[]", users),
        )
        .await
    }

    /// Adds every listed user to every listed channel in one call.
    pub async fn add_to_channels<I, S, J, T>(&self, channels: I, users: J) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.call(
            ApiRequest::new("user/addtochannels")
                .form_fields("users[]", users)
                .form_fields("channels[]", channels),
        )
        .await
    }

    /// Removes every listed user from every listed channel in one call.
    pub async fn remove_from_channels<I, S, J, T>(
        &self,
        channels: I,
        users: J,
    ) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.call(
            ApiRequest::new("user/removefromchannels")
                .form_fields("users[]", users)
                .form_fields("channels[]", channels),
        )
        .await
    }

    /// Creates or updates a user (upsert by name).
    ///
    /// See [`UserAttributes`] for the field semantics and the server's
    /// required-field rules, which are not validated locally.
    pub async fn save_user(&self, user: &UserAttributes) -> Result<ApiResponse> {
        let mut request = ApiRequest::new("user/save");
        for (key, value) in user.form_fields() {
            request = request.form_field(key, value);
        }
        self.call(request).await
    }

    /// Deletes users in one batch.
    pub async fn delete_users<I, S>(&self, users: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(ApiRequest::new("user/delete").form_fields("login[]", users))
            .await
    }

    /// Creates a channel.
    ///
    /// `is_group` selects a group channel over a dynamic one; `is_hidden`
    /// together with `is_group` creates a hidden group. Both booleans go out
    /// as literal `true`/`false` path segments.
    pub async fn add_channel(
        &self,
        name: &str,
        is_group: bool,
        is_hidden: bool,
    ) -> Result<ApiResponse> {
        self.call(channel_add_request(name, is_group, is_hidden))
            .await
    }

    /// Deletes channels in one batch.
    pub async fn delete_channels<I, S>(&self, names: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(ApiRequest::new("channel/delete").form_fields("name[]", names))
            .await
    }

    /// Lists the roles defined on a channel.
    pub async fn channel_roles(&self, channel: &str) -> Result<ApiResponse> {
        self.call(ApiRequest::new("channel/roleslist").segment("name", channel))
            .await
    }

    /// Creates or updates a channel role.
    ///
    /// `settings` accepts either structured JSON or a pre-encoded string;
    /// see [`RoleSettings`].
    pub async fn save_channel_role(
        &self,
        channel: &str,
        role: &str,
        settings: impl Into<RoleSettings>,
    ) -> Result<ApiResponse> {
        self.call(
            ApiRequest::new("channel/saverole")
                .segment("channel", channel)
                .segment("name", role)
                .form_field("settings", settings.into().encode()),
        )
        .await
    }

    /// Deletes channel roles in one batch.
    pub async fn delete_channel_role<I, S>(&self, channel: &str, roles: I) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(
            ApiRequest::new("channel/deleterole")
                .segment("channel", channel)
                .form_fields("roles[]", roles),
        )
        .await
    }

    /// Adds users to a channel role.
    pub async fn add_to_channel_role<I, S>(
        &self,
        channel: &str,
        role: &str,
        users: I,
    ) -> Result<ApiResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.call(
            ApiRequest::new("channel/addtorole")
                .segment("channel", channel)
                .segment("name", role)
                .form_fields("login[]", users),
        )
        .await
    }

    /// Queries last known locations inside a bounding box.
    ///
    /// Unlike the other operations this sends its arguments as GET query
    /// parameters; see [`LocationQuery`].
    pub async fn get_locations(&self, query: &LocationQuery) -> Result<ApiResponse> {
        self.call(location_get_request(query)).await
    }

    /// Fetches one user's location history between two Unix timestamps.
    pub async fn location_user(&self, user: &str, from: i64, to: i64) -> Result<ApiResponse> {
        self.call(
            ApiRequest::new("location/get")
                .segment("login", user)
                .segment("from", from.to_string())
                .segment("to", to.to_string()),
        )
        .await
    }

    /// Dispatches a request and returns the unparsed response body.
    ///
    /// Escape hatch for endpoints without a dedicated method, or for
    /// responses that are not the usual JSON status object. The session id
    /// and cache-busting token are still attached.
    pub async fn call_raw(&self, request: ApiRequest) -> Result<String> {
        let (raw, _, _, _) = self.send(&request).await?;
        Ok(raw)
    }

    /// Shared dispatch: send, then classify the JSON response.
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse> {
        let (raw, status, url, latency) = self.send(&request).await?;

        let parsed: Option<Value> = serde_json::from_str(&raw).ok();
        let Some(Value::Object(data)) = parsed else {
            tracing::error!(url = %url, "response is not a JSON object");
            return Err(Error::transport(
                url,
                Some(status),
                "response is not a JSON status object",
            ));
        };

        // A missing or non-string status discriminator is a transport-level
        // problem, same as an unparseable body.
        match data.get("status").and_then(Value::as_str) {
            Some("OK") => Ok(ApiResponse::new(data, raw, status, url, latency)),
            Some(message) => {
                let message = message.to_string();
                let code = data.get("code").map(server_code).unwrap_or(0);
                tracing::warn!(code, status = %message, url = %url, "server reported an error");
                Err(Error::Api {
                    code,
                    status: message,
                    url,
                })
            }
            None => Err(Error::transport(
                url,
                Some(status),
                "response is not a JSON status object",
            )),
        }
    }

    /// Performs the HTTP exchange: URL assembly, method selection, timeouts.
    async fn send(&self, request: &ApiRequest) -> Result<(String, StatusCode, String, Duration)> {
        let url = self.request_url(request);
        let method = if request.has_body() { "POST" } else { "GET" };
        tracing::debug!(method, url = %url, "executing API request");

        let started = Instant::now();
        let mut builder = if request.has_body() {
            self.http
                .post(url.as_str())
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(request.encode_form())
        } else {
            self.http.get(url.as_str())
        };
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "transport failure");
            Error::transport(url.as_str(), None, format!("transport failure: {e}"))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(status = status.as_u16(), url = %url, "unexpected HTTP status");
            return Err(Error::transport(
                url.as_str(),
                Some(status),
                format!("HTTP status {status}"),
            ));
        }

        let raw = response.text().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "failed to read response body");
            Error::transport(url.as_str(), Some(status), format!("failed to read body: {e}"))
        })?;
        let latency = started.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            url = %url,
            "received API response"
        );
        Ok((raw, status, url, latency))
    }

    /// Builds the final URL: base, command path, then the `rnd` cache-buster,
    /// the session id when one is active, and any extra query parameters.
    fn request_url(&self, request: &ApiRequest) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("rnd", &request::cache_token());
        if let Some(sid) = &self.sid {
            query.append_pair("sid", sid);
        }
        for (key, value) in request.query_params() {
            query.append_pair(key, value);
        }
        format!("{}/{}?{}", self.base, request.command_path(), query.finish())
    }
}

fn user_get_request(filter: &UserFilter) -> ApiRequest {
    let mut request = ApiRequest::new("user/get");
    if let Some(username) = &filter.username {
        request = request.segment("login", username);
    }
    if let Some(channel) = &filter.channel {
        request = request.segment("channel", channel);
    }
    if filter.gateways {
        request = request.segment("gateway", "1");
    }
    if filter.max > 0 {
        request = request.segment("max", filter.max.to_string());
    }
    if filter.start > 0 {
        request = request.segment("start", filter.start.to_string());
    }
    request
}

fn channel_get_request(filter: &ChannelFilter) -> ApiRequest {
    let mut request = ApiRequest::new("channel/get");
    if let Some(name) = &filter.name {
        request = request.segment("name", name);
    }
    if filter.max > 0 {
        request = request.segment("max", filter.max.to_string());
    }
    if filter.start > 0 {
        request = request.segment("start", filter.start.to_string());
    }
    request
}

fn channel_add_request(name: &str, is_group: bool, is_hidden: bool) -> ApiRequest {
    fn flag(value: bool) -> &'static str {
        if value {
            "true"
        } else {
            "false"
        }
    }
    ApiRequest::new("channel/add")
        .segment("name", name)
        .segment("shared", flag(is_group))
        .segment("invisible", flag(is_hidden))
}

fn location_get_request(query: &LocationQuery) -> ApiRequest {
    let mut request = ApiRequest::new("location/get");
    for (key, value) in query.query_params() {
        request = request.query_param(key, value);
    }
    request
}

/// Server error codes arrive as JSON numbers or numeric strings; both are
/// accepted, anything else collapses to 0.
fn server_code(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use ptt_admin::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), ptt_admin::Error> {
/// let client = ClientBuilder::new()
///     .host("https://ptt.example.com")
///     .api_key("shared-secret")
///     .connect_timeout(Duration::from_secs(5))
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    host: Option<String>,
    api_key: Option<String>,
    session_id: Option<String>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a builder with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// The server hostname or address. `http://` is assumed unless the value
    /// already starts with `http://` or `https://`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The API key, the shared secret folded into the login digest.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Resumes a previously issued session instead of authenticating again.
    pub fn session_id(mut self, sid: impl Into<String>) -> Self {
        self.session_id = Some(sid.into());
        self
    }

    /// Connection establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Whole-request execution timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured [`Client`].
    ///
    /// # Errors
    ///
    /// Fails fast with [`Error::Configuration`] when the host or API key is
    /// missing, the host does not parse as a URL, or the HTTP transport
    /// cannot be initialized.
    pub fn build(self) -> Result<Client> {
        let host = self
            .host
            .ok_or_else(|| Error::Configuration("host is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Configuration("API key is required".to_string()))?;

        let base = normalize_host(&host);
        Url::parse(&base)
            .map_err(|e| Error::Configuration(format!("invalid host \"{host}\": {e}")))?;

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.connect_timeout {
            http = http.connect_timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Client {
            http,
            base,
            api_key,
            sid: self.session_id,
            timeout: self.timeout,
        })
    }
}

/// Prefixes the default scheme and strips a trailing slash so URL assembly
/// can always join with exactly one `/`.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
