//! Transport layer abstraction.
//!
//! Provides the blocking [`Transport`] trait, the reqwest-backed
//! [`HttpTransport`], and a programmable [`MockTransport`] for tests.
//!
//! The cards speak plain form-encoded HTTP: every operation is a single GET
//! or POST carrying the current [`Session`] credentials. TLS verification is
//! a scoped, per-transport setting ([`TlsMode`]) because most shipped cards
//! present self-signed certificates; it is never a process-wide switch.

mod http;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use http::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use std::time::Duration;

use crate::error::Result;
use crate::session::Session;

/// Default request timeout applied by [`TransportConfig::default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS certificate verification policy for a transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Verify server certificates against the system trust store.
    #[default]
    System,
    /// Accept any certificate. Required for cards shipping self-signed
    /// certificates; scoped to the one transport it is configured on.
    DangerAccept,
}

/// Configuration for constructing an HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Certificate verification policy.
    pub tls: TlsMode,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }
}

impl TransportConfig {
    /// Set the per-request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the certificate verification policy (default: verify).
    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }
}

/// An HTTP response as the adapters consume it.
///
/// Carries the status code rather than failing on non-success so that the
/// callers decide which statuses are fatal for which operation (a rejected
/// login POST is a login failure, not a generic transport failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded as text.
    pub body: String,
    /// Cookies set by the response, as name/value pairs.
    pub cookies: Vec<(String, String)>,
}

impl Response {
    /// Whether the status is in the success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error out on a non-success status.
    pub fn ensure_success(self, url: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(crate::error::Error::Http {
                url: url.into(),
                status: self.status,
            })
        }
    }
}

/// Blocking client-side transport abstraction.
///
/// One implementation talks real HTTP ([`HttpTransport`]); the mock records
/// requests and replays canned pages for tests. Every request carries the
/// adapter's current [`Session`] so cookie and basic-auth vendors go through
/// the same interface.
pub trait Transport: Send {
    /// Perform a GET request.
    fn get(&self, url: &str, session: &Session) -> Result<Response>;

    /// Perform a POST request with a form-encoded body.
    fn post_form(&self, url: &str, form: &[(String, String)], session: &Session)
        -> Result<Response>;
}
