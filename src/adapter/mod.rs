//! Vendor adapters.
//!
//! One adapter per management-card family, all implementing the uniform
//! [`UpsAdapter`] operation set. Each adapter owns the field codec for its
//! card's HTML forms (field-name templates, index schemes, enum tables) and
//! the session protocol its card speaks.
//!
//! Reads are a single fetch-parse-decode pass. Writes are read-modify-write:
//! fetch the live state, overwrite the slots the caller supplied, encode the
//! merged result back into the card's full field set, submit. Slots and
//! fields the caller did not touch keep their live values.

mod masterys;
mod netman;
mod netvision;

pub use masterys::MasterysAdapter;
pub use netman::NetmanAdapter;
pub use netvision::NetvisionAdapter;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{DeviceInfo, SnmpConfig, TrapConfig};
use crate::transport::TransportConfig;

/// Uniform operation set over one UPS management card.
///
/// Implementations are blocking and fail-fast: every call surfaces transport,
/// parse and authentication failures immediately, with no retry and no
/// automatic re-login. One instance owns one session for one device; callers
/// wanting parallelism across devices use independent instances.
pub trait UpsAdapter: Send {
    /// Device host this adapter talks to.
    fn host(&self) -> &str;

    /// Authenticate against the card and establish the session.
    fn login(&mut self) -> Result<()>;

    /// Current SNMP client access configuration.
    fn get_snmp_config(&self) -> Result<SnmpConfig>;

    /// Apply a partial SNMP client access configuration. Slots absent from
    /// `new_config` keep their live values.
    fn set_snmp_config(&self, new_config: &SnmpConfig) -> Result<()>;

    /// Current trap receiver configuration.
    fn get_trap_config(&self) -> Result<TrapConfig>;

    /// Apply a partial trap receiver configuration. Slots absent from
    /// `new_config` keep their live values.
    fn set_trap_config(&self, new_config: &TrapConfig) -> Result<()>;

    /// Identity and rating information.
    fn get_info(&self) -> Result<DeviceInfo>;

    /// Device serial number.
    fn get_serial(&self) -> Result<String> {
        match self.get_info()?.serial {
            Some(serial) if !serial.is_empty() => Ok(serial),
            _ => Err(Error::SerialNotFound {
                host: self.host().into(),
            }),
        }
    }
}

/// Supported management-card families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Vendor {
    /// Socomec cards running the NetVision agent (Netys family).
    SocomecNetvision,
    /// Socomec Masterys/Modulys cards.
    SocomecMasterys,
    /// Riello cards running the Netman 204 agent (Sentinel family).
    RielloNetman,
}

impl Vendor {
    /// Construct the adapter for this card family with default transport
    /// settings.
    pub fn adapter(
        self,
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Box<dyn UpsAdapter>> {
        let (host, user, password) = (host.into(), user.into(), password.into());
        Ok(match self {
            Vendor::SocomecNetvision => Box::new(NetvisionAdapter::new(host, user, password)?),
            Vendor::SocomecMasterys => Box::new(MasterysAdapter::new(host, user, password)?),
            Vendor::RielloNetman => Box::new(NetmanAdapter::new(host, user, password)?),
        })
    }

    /// Construct the adapter with explicit transport settings.
    pub fn adapter_with_config(
        self,
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        config: TransportConfig,
    ) -> Result<Box<dyn UpsAdapter>> {
        let (host, user, password) = (host.into(), user.into(), password.into());
        Ok(match self {
            Vendor::SocomecNetvision => {
                Box::new(NetvisionAdapter::with_config(host, user, password, config)?)
            }
            Vendor::SocomecMasterys => {
                Box::new(MasterysAdapter::with_config(host, user, password, config)?)
            }
            Vendor::RielloNetman => {
                Box::new(NetmanAdapter::with_config(host, user, password, config)?)
            }
        })
    }

    /// Stable identifier (`socomec-netvision`, `socomec-masterys`,
    /// `riello-netman`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::SocomecNetvision => "socomec-netvision",
            Vendor::SocomecMasterys => "socomec-masterys",
            Vendor::RielloNetman => "riello-netman",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "socomec-netvision" => Ok(Vendor::SocomecNetvision),
            "socomec-masterys" => Ok(Vendor::SocomecMasterys),
            "riello-netman" => Ok(Vendor::RielloNetman),
            other => Err(Error::config(format!("unknown vendor: {other:?}"))),
        }
    }
}
