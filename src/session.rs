//! Session credential bundles.
//!
//! A [`Session`] is whatever a vendor's card hands back at login: a set of
//! session cookies, or a basic-auth pair re-sent on every request. Each
//! adapter owns exactly one session for exactly one device; it is created by
//! `login`, read by every later call, and implicitly invalidated when the
//! card starts rejecting it (surfaced as an error, never retried here).

use md5::{Digest, Md5};

/// Vendor-specific credential bundle attached to each request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Not authenticated yet (or session cleared).
    #[default]
    None,
    /// Session cookies returned by the login endpoint, as name/value pairs.
    Cookies(Vec<(String, String)>),
    /// HTTP basic-auth credentials, re-sent with every request.
    Basic {
        /// Username.
        user: String,
        /// Password.
        password: String,
    },
}

impl Session {
    /// Whether a login has produced usable credentials.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Session::None)
    }

    /// Render the cookie pairs as a `Cookie` header value.
    pub(crate) fn cookie_header(&self) -> Option<String> {
        match self {
            Session::Cookies(pairs) if !pairs.is_empty() => Some(
                pairs
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }

    /// Basic-auth pair, if this is a basic-auth session.
    pub(crate) fn basic_auth(&self) -> Option<(&str, &str)> {
        match self {
            Session::Basic { user, password } => Some((user, password)),
            _ => None,
        }
    }
}

/// Keyed digest for the challenge/response login handshake: the MD5 hex
/// digest of `user + password + challenge`.
pub(crate) fn challenge_digest(user: &str, password: &str, challenge: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(user.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(challenge.as_bytes());
    hex::encode(hasher.finalize())
}
