//! # upsconf
//!
//! Read and configure SNMP settings on UPS network management cards that
//! only expose a vendor-specific web administration interface.
//!
//! ## Features
//!
//! - Uniform, vendor-independent configuration model (client access rules,
//!   trap receivers, device identity)
//! - Adapters for Socomec NetVision, Socomec Masterys and Riello Netman 204
//!   cards, each speaking its card's login protocol and form layout
//! - Read-modify-write updates: partial configurations are merged into the
//!   card's live state, so untouched slots keep their values
//! - Blocking, fail-fast calls with a typed error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upsconf::{Access, Slot, SnmpAccessEntry, SnmpConfig, Vendor};
//!
//! fn main() -> upsconf::Result<()> {
//!     let mut ups = Vendor::SocomecNetvision.adapter("10.0.0.10", "admin", "secret")?;
//!     ups.login()?;
//!
//!     println!("serial: {}", ups.get_serial()?);
//!
//!     // Grant a management station read-only access; every other slot on
//!     // the card keeps its current settings.
//!     let change: SnmpConfig = [(
//!         Slot::Index(1),
//!         SnmpAccessEntry {
//!             ip: Some("10.8.7.6".to_string()),
//!             community: "public".to_string(),
//!             access: Access::ReadOnly,
//!         },
//!     )]
//!     .into_iter()
//!     .collect();
//!     ups.set_snmp_config(&change)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions and failure
//!
//! Each adapter owns one session for one device. Calls are synchronous and
//! fail-fast: transport, parse and authentication errors surface immediately
//! and nothing is retried. When a card drops a session, the next call fails
//! and the caller decides whether to [`login`](UpsAdapter::login) again.

pub mod adapter;
pub mod error;
pub mod model;
pub mod session;
pub mod transport;

pub(crate) mod lookup;
pub(crate) mod scrape;

// Re-exports for convenience
pub use adapter::{MasterysAdapter, NetmanAdapter, NetvisionAdapter, UpsAdapter, Vendor};
pub use error::{Error, Result};
pub use model::{
    Access, DeviceInfo, Severity, Slot, SnmpAccessEntry, SnmpConfig, TrapConfig, TrapKind,
    TrapReceiverEntry, TrapVersion,
};
pub use session::Session;
pub use transport::{HttpTransport, Response, TlsMode, Transport, TransportConfig};
