//! Error types for upsconf.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type covering all failure modes
//! - [`Result`] - Crate-wide result alias
//!
//! # Error Handling
//!
//! Every adapter call is fail-fast: a failed request surfaces immediately,
//! with no retry and no automatic re-login. Resilience (retry, backoff,
//! re-login after the card drops a session) belongs to the caller.
//!
//! ```rust
//! use upsconf::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &e {
//!             Error::Login { host, .. } => {
//!                 println!("{} rejected our credentials", host);
//!             }
//!             Error::Http { url, status } => {
//!                 println!("{} answered {}", url, status);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

/// Result type alias using the library's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Source error type for network-level failures.
///
/// Boxed trait object rather than a concrete client error so that mock
/// transports can produce network failures without an HTTP stack behind them.
pub type NetworkSource = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for all upsconf operations.
///
/// The variants follow the failure taxonomy of the adapters: login failures,
/// transport failures (non-success HTTP status or network error), parse
/// failures on pages missing a mandatory element, and caller-side
/// configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Login handshake failed: challenge missing, credentials rejected, or
    /// no session established.
    #[error("login to {host} failed: {reason}")]
    Login {
        /// Device host.
        host: Box<str>,
        /// Human-readable reason.
        reason: Box<str>,
    },

    /// A request returned a non-success HTTP status. Surfaced, never retried.
    #[error("request to {url} failed with HTTP status {status}")]
    Http {
        /// Full request URL.
        url: Box<str>,
        /// HTTP status code.
        status: u16,
    },

    /// Network failure beneath the HTTP layer (connect, IO, TLS).
    #[error("network error talking to {url}: {source}")]
    Network {
        /// Full request URL.
        url: Box<str>,
        #[source]
        source: NetworkSource,
    },

    /// HTTP transport could not be constructed (TLS backend initialization).
    #[error("failed to build HTTP transport: {source}")]
    Transport {
        #[source]
        source: NetworkSource,
    },

    /// A mandatory structural element was absent from a parsed page.
    #[error("failed to parse {url}: {what}")]
    Parse {
        /// Full request URL of the page.
        url: Box<str>,
        /// What was expected and missing.
        what: Box<str>,
    },

    /// The device pages do not expose a serial number.
    #[error("serial number not found on {host}")]
    SerialNotFound {
        /// Device host.
        host: Box<str>,
    },

    /// Caller-side canonical configuration error (missing mandatory key).
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    pub(crate) fn login(host: &str, reason: impl Into<Box<str>>) -> Self {
        Error::Login {
            host: host.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(url: &str, what: impl Into<Box<str>>) -> Self {
        Error::Parse {
            url: url.into(),
            what: what.into(),
        }
    }

    pub(crate) fn config(msg: impl Into<Box<str>>) -> Self {
        Error::Config(msg.into())
    }
}
