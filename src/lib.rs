//! # ptt-admin - push-to-talk server administration client
//!
//! A typed async client for a push-to-talk server's administrative HTTP/JSON
//! API: user management, channel management, channel roles, and location
//! queries. The client authenticates a session, builds the command URLs for
//! each remote operation, issues the HTTP requests via `reqwest`, and
//! normalizes JSON responses into per-call results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptt_admin::{Client, types::{ChannelFilter, UserAttributes}};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ptt_admin::Error> {
//!     let mut client = Client::builder()
//!         .host("ptt.example.com")
//!         .api_key("shared-secret")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     // Two-step token/login handshake; the session id sticks to the
//!     // client until logout.
//!     client.auth("admin", "hunter2").await?;
//!
//!     // Create a user and drop them into a channel.
//!     client
//!         .save_user(&UserAttributes::new("bob").password("pw").full_name("Bob Jones"))
//!         .await?;
//!     client.add_to_channel("dispatch", ["bob"]).await?;
//!
//!     // Payloads are JSON maps; schemas are owned by the server.
//!     let channels = client.get_channels(&ChannelFilter::default()).await?;
//!     if let Some(list) = channels.field("channels").and_then(|v| v.as_array()) {
//!         println!("{} channels", list.len());
//!     }
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Wire contract
//!
//! Every request goes to `<scheme><host>/<command>?rnd=<token>[&sid=<sid>]`,
//! with `http://` assumed when the configured host carries no scheme. The
//! `rnd` token is a 32-character cache-buster regenerated per call. Bodies,
//! when present, are `application/x-www-form-urlencoded` POSTs; list
//! arguments travel as repeated `name[]`-style fields. The server answers
//! every request with a JSON object whose `status` field is `"OK"` on
//! success or an error message (plus a numeric `code`) on failure.
//!
//! Authentication is a two-step handshake: `user/gettoken` issues a one-time
//! token and the session id, then `user/login` proves possession of the
//! password with `md5(md5(password) + token + api_key)`. The digest formula
//! is fixed by the server; see [`Client::auth`].
//!
//! ## Error handling
//!
//! Every operation returns `Result<ApiResponse, Error>`; there is no shared
//! "last result" state and no retry logic. Transport problems (connection
//! failures, non-200 statuses, malformed bodies) surface as
//! [`Error::Transport`]; errors the server itself reports pass through
//! verbatim as [`Error::Api`]:
//!
//! ```no_run
//! use ptt_admin::{Client, Error, types::UserFilter};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().host("h").api_key("k").build()?;
//! match client.get_users(&UserFilter::default()).await {
//!     Ok(response) => println!("{:?}", response.field("users")),
//!     Err(Error::Api { code, status, .. }) => {
//!         eprintln!("server error {}: {}", code, status);
//!     }
//!     Err(e) => eprintln!("request failed (code {}): {}", e.code(), e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sessions and concurrency
//!
//! One [`Client`] is one logical session for one logical caller: `auth` and
//! `logout` take `&mut self`, and per-instance state is not meant for
//! concurrent mutation. Session ids are reusable: persist
//! [`Client::session_id`] and restore it with
//! [`ClientBuilder::session_id`] to skip the handshake. For parallel
//! requests, build independent clients.

mod client;
mod digest;
mod error;
mod request;
mod response;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use request::ApiRequest;
pub use response::ApiResponse;
