//! Canonical, vendor-independent configuration model.
//!
//! These types are pure data: every vendor adapter decodes device pages into
//! them and encodes them back into vendor form fields. Optional fields a
//! vendor does not support are silently dropped on write and omitted on read.
//!
//! Configurations are keyed by [`Slot`]: the literal `default` entry (all
//! otherwise-unmatched management stations) or a numbered entry `1..N`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifier of an entry within a configuration snapshot.
///
/// `Default` sorts before all numbered slots, so iteration always yields the
/// catch-all entry first. Slot identifiers are unique per snapshot by
/// construction (map key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum Slot {
    /// The catch-all entry covering all other management stations.
    Default,
    /// A numbered entry, `1..N`.
    Index(u8),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Default => write!(f, "default"),
            Slot::Index(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Slot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "default" {
            return Ok(Slot::Default);
        }
        match s.parse::<u8>() {
            Ok(n) if n >= 1 => Ok(Slot::Index(n)),
            _ => Err(Error::config(format!("invalid slot identifier: {s:?}"))),
        }
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for Slot {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// SNMP client access level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Access {
    /// No access.
    #[default]
    None,
    /// Read-only access.
    #[cfg_attr(feature = "serde", serde(rename = "ro"))]
    ReadOnly,
    /// Read-write access.
    #[cfg_attr(feature = "serde", serde(rename = "rw"))]
    ReadWrite,
}

impl Access {
    /// Canonical string token (`none`, `ro`, `rw`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::None => "none",
            Access::ReadOnly => "ro",
            Access::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version of SNMP traps sent to a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapVersion {
    /// SNMPv1 traps.
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    V1,
    /// SNMPv2c notifications.
    #[cfg_attr(feature = "serde", serde(rename = "2"))]
    V2,
}

impl Default for TrapVersion {
    fn default() -> Self {
        TrapVersion::V2
    }
}

/// Minimum severity of events forwarded to a trap receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Send nothing.
    None,
    /// Informational and above.
    Info,
    /// Warnings and above.
    Warn,
    /// Critical only.
    Crit,
}

/// MIB family the traps are sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrapKind {
    /// Standard RFC 1628 UPS MIB traps.
    Rfc,
    /// Vendor-proprietary MIB traps.
    Proprietary,
}

/// One SNMP client access rule.
///
/// `ip` is the address or subnet of the client station; it is mandatory for
/// numbered slots and absent for the `default` slot. `"0.0.0.0"` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnmpAccessEntry {
    /// Client address or subnet. `None` for the `default` slot.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub ip: Option<String>,
    /// Community string.
    pub community: String,
    /// Access level.
    pub access: Access,
}

/// One SNMP trap receiver.
///
/// `ip` and `community` are mandatory; the remaining fields are optional and
/// dropped by vendors that do not support them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapReceiverEntry {
    /// Receiver address.
    pub ip: String,
    /// Community string sent with traps.
    pub community: String,
    /// Trap protocol version.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub version: Option<TrapVersion>,
    /// Minimum forwarded severity.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub severity: Option<Severity>,
    /// Source MIB family.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub kind: Option<TrapKind>,
    /// Display name for the receiver.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub alias: Option<String>,
}

/// SNMP client access configuration: slot to access rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SnmpConfig(pub BTreeMap<Slot, SnmpAccessEntry>);

/// SNMP trap receiver configuration: slot to receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrapConfig(pub BTreeMap<Slot, TrapReceiverEntry>);

impl SnmpConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a slot, if present.
    pub fn get(&self, slot: &Slot) -> Option<&SnmpAccessEntry> {
        self.0.get(slot)
    }

    /// Insert or replace a slot.
    pub fn insert(&mut self, slot: Slot, entry: SnmpAccessEntry) {
        self.0.insert(slot, entry);
    }

    /// Overwrite every slot present in `partial`, wholesale. Slots absent
    /// from `partial` keep their current entry.
    pub fn merge(&mut self, partial: &SnmpConfig) {
        for (slot, entry) in &partial.0 {
            self.0.insert(*slot, entry.clone());
        }
    }

    /// Key-set validation for a write: every numbered slot must carry an
    /// address. The `default` slot never needs one.
    pub fn validate(&self) -> Result<()> {
        for (slot, entry) in &self.0 {
            if matches!(slot, Slot::Index(_)) && entry.ip.is_none() {
                return Err(Error::config(format!(
                    "snmp access slot {slot} is missing the mandatory ip field"
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<(Slot, SnmpAccessEntry)> for SnmpConfig {
    fn from_iter<I: IntoIterator<Item = (Slot, SnmpAccessEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TrapConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a slot, if present.
    pub fn get(&self, slot: &Slot) -> Option<&TrapReceiverEntry> {
        self.0.get(slot)
    }

    /// Insert or replace a slot.
    pub fn insert(&mut self, slot: Slot, entry: TrapReceiverEntry) {
        self.0.insert(slot, entry);
    }

    /// Overwrite every slot present in `partial`, wholesale. Slots absent
    /// from `partial` keep their current entry.
    pub fn merge(&mut self, partial: &TrapConfig) {
        for (slot, entry) in &partial.0 {
            self.0.insert(*slot, entry.clone());
        }
    }
}

impl FromIterator<(Slot, TrapReceiverEntry)> for TrapConfig {
    fn from_iter<I: IntoIterator<Item = (Slot, TrapReceiverEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity and rating information scraped from the device pages.
///
/// A field the source page does not expose stays `None`; values are never
/// fabricated. Ratings are plain VA/W/Ah strings as rendered by the card
/// (normalized where the page uses kVA/kW).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// UPS manufacturer.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub manufacturer: Option<String>,
    /// UPS model name.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub model: Option<String>,
    /// UPS serial number.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub serial: Option<String>,
    /// UPS firmware revision.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub firmware: Option<String>,
    /// Management card family.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub agent_type: Option<String>,
    /// Management card firmware revision.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub agent_firmware: Option<String>,
    /// Management card serial number.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub agent_serial: Option<String>,
    /// Management card MAC address.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mac_address: Option<String>,
    /// Apparent power rating, VA.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating_va: Option<String>,
    /// Active power rating, W.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating_w: Option<String>,
    /// Battery capacity, Ah.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub battery_capacity_ah: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parse_and_display() {
        assert_eq!("default".parse::<Slot>().unwrap(), Slot::Default);
        assert_eq!("1".parse::<Slot>().unwrap(), Slot::Index(1));
        assert_eq!("7".parse::<Slot>().unwrap(), Slot::Index(7));
        assert_eq!(Slot::Default.to_string(), "default");
        assert_eq!(Slot::Index(3).to_string(), "3");

        assert!("0".parse::<Slot>().is_err());
        assert!("".parse::<Slot>().is_err());
        assert!("first".parse::<Slot>().is_err());
    }

    #[test]
    fn default_slot_sorts_first() {
        let mut cfg = SnmpConfig::new();
        cfg.insert(Slot::Index(2), SnmpAccessEntry::default());
        cfg.insert(Slot::Default, SnmpAccessEntry::default());
        cfg.insert(Slot::Index(1), SnmpAccessEntry::default());

        let order: Vec<Slot> = cfg.0.keys().copied().collect();
        assert_eq!(order, [Slot::Default, Slot::Index(1), Slot::Index(2)]);
    }

    #[test]
    fn merge_overwrites_whole_slots() {
        let mut current: SnmpConfig = [
            (
                Slot::Default,
                SnmpAccessEntry {
                    ip: None,
                    community: "public".into(),
                    access: Access::ReadOnly,
                },
            ),
            (
                Slot::Index(1),
                SnmpAccessEntry {
                    ip: Some("10.1.1.1".into()),
                    community: "old".into(),
                    access: Access::ReadWrite,
                },
            ),
        ]
        .into_iter()
        .collect();

        let partial: SnmpConfig = [(
            Slot::Index(1),
            SnmpAccessEntry {
                ip: Some("10.2.2.2".into()),
                community: "new".into(),
                access: Access::ReadOnly,
            },
        )]
        .into_iter()
        .collect();

        current.merge(&partial);

        // Slot 1 replaced wholesale, default untouched.
        let one = current.get(&Slot::Index(1)).unwrap();
        assert_eq!(one.ip.as_deref(), Some("10.2.2.2"));
        assert_eq!(one.community, "new");
        assert_eq!(one.access, Access::ReadOnly);
        assert_eq!(current.get(&Slot::Default).unwrap().community, "public");
    }

    #[test]
    fn validate_requires_ip_on_numbered_slots() {
        let cfg: SnmpConfig = [(
            Slot::Index(2),
            SnmpAccessEntry {
                ip: None,
                community: "public".into(),
                access: Access::ReadOnly,
            },
        )]
        .into_iter()
        .collect();
        assert!(cfg.validate().is_err());

        let cfg: SnmpConfig = [(
            Slot::Default,
            SnmpAccessEntry {
                ip: None,
                community: "public".into(),
                access: Access::ReadOnly,
            },
        )]
        .into_iter()
        .collect();
        assert!(cfg.validate().is_ok());
    }
}
