//! The login password digest.
//!
//! The server's authentication handshake expects
//! `md5(md5(password) + token + api_key)` with both MD5 outputs rendered as
//! lowercase hex. The formula is part of the wire contract and must match the
//! server bit-for-bit; MD5's cryptographic weakness is not at issue here.

use md5::{Digest, Md5};

/// Lowercase hex MD5 of `input`.
pub(crate) fn md5_hex(input: &[u8]) -> String {
    hex::encode(Md5::digest(input))
}

/// Computes the password digest sent to `user/login`.
///
/// `token` is the one-time value returned by `user/gettoken`; `api_key` is
/// the shared secret configured on the client.
pub(crate) fn password_digest(password: &str, token: &str, api_key: &str) -> String {
    let inner = md5_hex(password.as_bytes());
    md5_hex(format!("{inner}{token}{api_key}").as_bytes())
}
