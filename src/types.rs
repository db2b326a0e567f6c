//! Parameter types for the administrative operations.
//!
//! These are thin, owned argument bundles: the client turns them into path
//! segments, form fields, or query parameters at dispatch. None of them
//! validate the remote API's own rules (required fields, value ranges);
//! that contract is owned by the server.

use crate::digest;

/// Filters for [`Client::get_users`](crate::Client::get_users).
///
/// Unset fields are simply omitted from the command path. The path segment
/// order is fixed by the wire contract: `login`, `channel`, `gateway`,
/// `max`, `start`.
///
/// # Examples
///
/// ```
/// use ptt_admin::types::UserFilter;
///
/// // Gateways on channel "ops", first page of 50.
/// let filter = UserFilter::default()
///     .channel("ops")
///     .gateways_only()
///     .max(50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub(crate) username: Option<String>,
    pub(crate) channel: Option<String>,
    pub(crate) gateways: bool,
    pub(crate) max: u32,
    pub(crate) start: u32,
}

impl UserFilter {
    /// Restricts the query to a single user, returning its details.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Restricts the query to members of the given channel.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Returns gateway accounts instead of human users.
    pub fn gateways_only(mut self) -> Self {
        self.gateways = true;
        self
    }

    /// Maximum number of results to fetch (0 = server default).
    pub fn max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    /// Start index for paging (0 = from the beginning).
    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }
}

/// Filters for [`Client::get_channels`](crate::Client::get_channels).
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    pub(crate) name: Option<String>,
    pub(crate) max: u32,
    pub(crate) start: u32,
}

impl ChannelFilter {
    /// Restricts the query to a single channel, returning its details.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Maximum number of results to fetch (0 = server default).
    pub fn max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    /// Start index for paging (0 = from the beginning).
    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }
}

/// User attributes for [`Client::save_user`](crate::Client::save_user).
///
/// `user/save` is an upsert: an existing user of the same name is updated,
/// otherwise a new one is created. The server requires `name` plus a
/// password when creating and only `name` when updating; this type does not
/// enforce that locally. Set fields are form-encoded verbatim, booleans as
/// literal `"true"`/`"false"` strings.
///
/// # Examples
///
/// ```
/// use ptt_admin::types::UserAttributes;
///
/// let user = UserAttributes::new("bob")
///     .password("hunter2")
///     .full_name("Bob Jones")
///     .admin(true);
/// ```
#[derive(Debug, Clone)]
pub struct UserAttributes {
    pub(crate) name: String,
    pub(crate) password_md5: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) full_name: Option<String>,
    pub(crate) job: Option<String>,
    pub(crate) admin: Option<bool>,
    pub(crate) limited_access: Option<bool>,
    pub(crate) gateway: Option<bool>,
    pub(crate) add_only: Option<bool>,
}

impl UserAttributes {
    /// Creates an attribute set for the named user.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password_md5: None,
            email: None,
            full_name: None,
            job: None,
            admin: None,
            limited_access: None,
            gateway: None,
            add_only: None,
        }
    }

    /// Sets the password from its plain text.
    ///
    /// The wire field carries the password's MD5 hash; this hashes for you.
    pub fn password(mut self, plain: impl AsRef<str>) -> Self {
        self.password_md5 = Some(digest::md5_hex(plain.as_ref().as_bytes()));
        self
    }

    /// Sets the password from a precomputed MD5 hex hash.
    pub fn password_md5(mut self, hash: impl Into<String>) -> Self {
        self.password_md5 = Some(hash.into());
        self
    }

    /// E-mail address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display alias.
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Job title / position.
    pub fn job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Whether the user may access the admin console.
    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Whether the user is barred from starting 1-on-1 conversations.
    pub fn limited_access(mut self, limited: bool) -> Self {
        self.limited_access = Some(limited);
        self
    }

    /// Marks the account as a gateway (a non-human endpoint such as a radio
    /// bridge) rather than a normal user.
    pub fn gateway(mut self, gateway: bool) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Create-only mode: when set, saving over an existing user fails with a
    /// server error instead of updating it.
    pub fn add_only(mut self, add_only: bool) -> Self {
        self.add_only = Some(add_only);
        self
    }

    /// The fields in wire order, booleans rendered as `"true"`/`"false"`.
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        fn flag(value: bool) -> String {
            let word = if value { "true" } else { "false" };
            word.to_string()
        }

        let mut fields = vec![("name", self.name.clone())];
        if let Some(hash) = &self.password_md5 {
            fields.push(("password", hash.clone()));
        }
        if let Some(email) = &self.email {
            fields.push(("email", email.clone()));
        }
        if let Some(full_name) = &self.full_name {
            fields.push(("full_name", full_name.clone()));
        }
        if let Some(job) = &self.job {
            fields.push(("job", job.clone()));
        }
        if let Some(admin) = self.admin {
            fields.push(("admin", flag(admin)));
        }
        if let Some(limited) = self.limited_access {
            fields.push(("limited_access", flag(limited)));
        }
        if let Some(gateway) = self.gateway {
            fields.push(("gateway", flag(gateway)));
        }
        if let Some(add_only) = self.add_only {
            fields.push(("add", flag(add_only)));
        }
        fields
    }
}

/// Role settings for [`Client::save_channel_role`](crate::Client::save_channel_role).
///
/// The server expects the `settings` form field to be a JSON document like
/// `{"listen_only": false, "no_disconnect": true, "to": ["dispatchers"]}`.
/// Callers can hand over a structured [`serde_json::Value`] (encoded here)
/// or a string they have already encoded themselves (passed through
/// unchanged).
#[derive(Debug, Clone)]
pub enum RoleSettings {
    /// Structured settings, JSON-encoded before transmission.
    Json(serde_json::Value),
    /// A pre-encoded JSON string, passed through verbatim.
    Raw(String),
}

impl RoleSettings {
    pub(crate) fn encode(&self) -> String {
        match self {
            RoleSettings::Json(value) => value.to_string(),
            RoleSettings::Raw(raw) => raw.clone(),
        }
    }
}

impl From<serde_json::Value> for RoleSettings {
    fn from(value: serde_json::Value) -> Self {
        RoleSettings::Json(value)
    }
}

impl From<String> for RoleSettings {
    fn from(raw: String) -> Self {
        RoleSettings::Raw(raw)
    }
}

impl From<&str> for RoleSettings {
    fn from(raw: &str) -> Self {
        RoleSettings::Raw(raw.to_string())
    }
}

/// Bounding-box query for [`Client::get_locations`](crate::Client::get_locations).
///
/// Coordinates are `[latitude, longitude]` pairs for the northeast and
/// southwest corners of the box. This is the one operation that sends its
/// arguments as GET query parameters instead of a form body.
///
/// # Examples
///
/// ```
/// use ptt_admin::types::LocationQuery;
///
/// let query = LocationQuery::new([-30.708945, -70.89936], [-30.720996, -70.916227])
///     .name("truck-7")
///     .max(100);
/// ```
#[derive(Debug, Clone)]
pub struct LocationQuery {
    pub(crate) northeast: [f64; 2],
    pub(crate) southwest: [f64; 2],
    pub(crate) name: Option<String>,
    pub(crate) filter: Option<String>,
    pub(crate) start: Option<u32>,
    pub(crate) max: Option<u32>,
}

impl LocationQuery {
    /// Creates a query over the given bounding box.
    pub fn new(northeast: [f64; 2], southwest: [f64; 2]) -> Self {
        Self {
            northeast,
            southwest,
            name: None,
            filter: None,
            start: None,
            max: None,
        }
    }

    /// Restricts results to a single user or gateway name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Free-text filter applied by the server.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Start index for paging.
    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// Maximum number of results to fetch.
    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    /// Query parameters in wire order: the repeated coordinate pairs first,
    /// then the optional scalar filters.
    pub(crate) fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(8);
        for coord in self.northeast {
            params.push(("northeast[]".to_string(), coord.to_string()));
        }
        for coord in self.southwest {
            params.push(("southwest[]".to_string(), coord.to_string()));
        }
        if let Some(name) = &self.name {
            params.push(("name".to_string(), name.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.clone()));
        }
        if let Some(start) = self.start {
            params.push(("start".to_string(), start.to_string()));
        }
        if let Some(max) = self.max {
            params.push(("max".to_string(), max.to_string()));
        }
        params
    }
}
