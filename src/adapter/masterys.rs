//! Socomec Masterys adapter (Masterys/Modulys families).
//!
//! These cards have no login handshake at all: every request carries HTTP
//! basic-auth credentials, and "login" is a single probe against an
//! authenticated page to confirm the pair is accepted.
//!
//! Form fields are named `XAAAAAAA{L}AAD…` (access page) and
//! `XAAAAAAA{L}AAF…` (trap page) with an alphabetic index `L` running over
//! the fixed letter range `B..I`. On the access page the last letter `I` is
//! the catch-all entry: decode first builds eight numbered entries and then
//! relabels the eighth as `default`, dropping its address. The trap page is
//! flat: letters `B..I` are receivers `1..8`.
//!
//! The trap form folds severity and MIB family into one selector: `1` mutes
//! the receiver, `2` selects proprietary traps, `3` selects RFC traps.

use scraper::Html;

use super::UpsAdapter;
use crate::error::{Error, Result};
use crate::lookup::EnumTable;
use crate::model::{
    Access, DeviceInfo, Severity, Slot, SnmpAccessEntry, SnmpConfig, TrapConfig, TrapKind,
    TrapReceiverEntry,
};
use crate::scrape;
use crate::session::Session;
use crate::transport::{HttpTransport, Transport, TransportConfig};

const ACCESS_RAW: EnumTable<Access> = EnumTable::new(&[
    (Access::ReadOnly, "1"),
    (Access::ReadWrite, "2"),
    (Access::None, "3"),
]);

/// Letter range indexing both form pages. The last letter doubles as the
/// access page's catch-all entry.
const LETTERS: std::ops::RangeInclusive<char> = 'B'..='I';

/// Letters holding numbered access entries (the final letter is the
/// catch-all and encoded separately).
const NUMBERED_LETTERS: std::ops::RangeInclusive<char> = 'B'..='H';

const CATCH_ALL_LETTER: char = 'I';

fn access_field(letter: char, suffix: char) -> String {
    format!("XAAAAAAA{letter}AAD{suffix}")
}

fn trap_field(letter: char, suffix: char) -> String {
    format!("XAAAAAAA{letter}AAF{suffix}")
}

/// Adapter for Socomec Masterys cards.
pub struct MasterysAdapter<T: Transport = HttpTransport> {
    host: String,
    user: String,
    password: String,
    transport: T,
    session: Session,
}

impl MasterysAdapter<HttpTransport> {
    /// Adapter with default transport settings (plain HTTP, 10 s timeout).
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(host, user, password, TransportConfig::default())
    }

    /// Adapter with explicit transport settings.
    pub fn with_config(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        config: TransportConfig,
    ) -> Result<Self> {
        Ok(Self::with_transport(
            host,
            user,
            password,
            HttpTransport::new(config)?,
        ))
    }
}

impl<T: Transport> MasterysAdapter<T> {
    /// Adapter over an arbitrary transport.
    pub fn with_transport(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            transport,
            session: Session::None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.host, path)
    }

    fn fetch(&self, path: &str) -> Result<(String, Html)> {
        let url = self.url(path);
        let response = self
            .transport
            .get(&url, &self.session)?
            .ensure_success(&url)?;
        Ok((url, scrape::parse(&response.body)))
    }
}

impl<T: Transport> UpsAdapter for MasterysAdapter<T> {
    fn host(&self) -> &str {
        &self.host
    }

    fn login(&mut self) -> Result<()> {
        let candidate = Session::Basic {
            user: self.user.clone(),
            password: self.password.clone(),
        };
        let url = self.url("PageMonComprehensive.html");
        let response = self.transport.get(&url, &candidate)?;
        if !response.is_success() {
            tracing::warn!(target: "upsconf::adapter::masterys", host = %self.host, status = response.status, "login rejected");
            return Err(Error::login(
                &self.host,
                format!("credentials rejected (HTTP {})", response.status),
            ));
        }
        self.session = candidate;
        Ok(())
    }

    fn get_snmp_config(&self) -> Result<SnmpConfig> {
        let (url, doc) = self.fetch("PageAdmAgentAccess.html")?;
        decode_access_page(&doc, &url)
    }

    fn set_snmp_config(&self, new_config: &SnmpConfig) -> Result<()> {
        new_config.validate()?;
        let mut merged = self.get_snmp_config()?;
        merged.merge(new_config);

        let url = self.url("PageAdmAgentAccess.html");
        self.transport
            .post_form(&url, &encode_access_form(&merged), &self.session)?
            .ensure_success(&url)?;
        Ok(())
    }

    fn get_trap_config(&self) -> Result<TrapConfig> {
        let (url, doc) = self.fetch("PageAdmAgentTrap.html")?;
        decode_trap_page(&doc, &url)
    }

    fn set_trap_config(&self, new_config: &TrapConfig) -> Result<()> {
        let mut merged = self.get_trap_config()?;
        merged.merge(new_config);

        let url = self.url("PageAdmAgentTrap.html");
        self.transport
            .post_form(&url, &encode_trap_form(&merged), &self.session)?
            .ensure_success(&url)?;
        Ok(())
    }

    fn get_info(&self) -> Result<DeviceInfo> {
        let (url, doc) = self.fetch("PageMonIdentification.html")?;

        let cell = |label: &str| -> Result<Option<String>> {
            let value = scrape::cell_after_label(&doc, label)
                .ok_or_else(|| Error::parse(&url, format!("missing {label:?} row")))?;
            Ok(Some(value).filter(|v| !v.is_empty()))
        };

        let mut info = DeviceInfo {
            manufacturer: Some("Socomec".to_string()),
            agent_type: Some("NetVision".to_string()),
            model: cell("UPS Model")?,
            serial: cell("UPS Serial Number")?,
            firmware: cell("UPS Firmware Release")?,
            agent_firmware: cell("UPS Agent Version")?,
            ..Default::default()
        };
        if let Some(raw) = &info.agent_firmware {
            if let Some((firmware, serial)) = split_agent_version(raw) {
                info.agent_firmware = Some(firmware);
                info.agent_serial = Some(serial);
            }
        }
        Ok(info)
    }
}

/// Split an agent version string like `v2.0h (SN D1111)` into the firmware
/// revision and the card serial. Strings without the parenthesized part are
/// left alone.
fn split_agent_version(raw: &str) -> Option<(String, String)> {
    use std::sync::OnceLock;
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        regex::Regex::new(r"v(\d\S+)(?:\s\(\S*\s*(\S+)\))").expect("fixed pattern")
    });
    let captures = re.captures(raw)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

fn decode_access_page(doc: &Html, url: &str) -> Result<SnmpConfig> {
    let mut config = SnmpConfig::new();
    for (idx, letter) in LETTERS.enumerate() {
        let slot = Slot::Index(idx as u8 + 1);
        let ip = scrape::input_value(doc, &access_field(letter, 'E')).unwrap_or_default();
        let community = scrape::input_value(doc, &access_field(letter, 'F')).ok_or_else(|| {
            Error::parse(url, format!("missing {} community field", access_field(letter, 'F')))
        })?;
        let access_raw =
            scrape::selected_option(doc, &access_field(letter, 'G')).ok_or_else(|| {
                Error::parse(url, format!("missing {} access selector", access_field(letter, 'G')))
            })?;
        config.insert(
            slot,
            SnmpAccessEntry {
                ip: Some(ip),
                community,
                access: ACCESS_RAW.decode_or(&access_raw, Access::None),
            },
        );
    }

    // The final numbered entry is the catch-all: relabel it and drop its
    // address.
    let last = Slot::Index(LETTERS.count() as u8);
    if let Some(mut entry) = config.0.remove(&last) {
        entry.ip = None;
        config.insert(Slot::Default, entry);
    }
    Ok(config)
}

fn encode_access_form(config: &SnmpConfig) -> Vec<(String, String)> {
    let mut form = Vec::new();
    for (idx, letter) in NUMBERED_LETTERS.enumerate() {
        let Some(entry) = config.get(&Slot::Index(idx as u8 + 1)) else {
            continue;
        };
        form.push((
            access_field(letter, 'E'),
            entry.ip.clone().unwrap_or_default(),
        ));
        form.push((access_field(letter, 'F'), entry.community.clone()));
        form.push((
            access_field(letter, 'G'),
            ACCESS_RAW.raw(entry.access).unwrap_or("3").to_string(),
        ));
    }
    if let Some(default) = config.get(&Slot::Default) {
        form.push((access_field(CATCH_ALL_LETTER, 'E'), String::new()));
        form.push((access_field(CATCH_ALL_LETTER, 'F'), default.community.clone()));
        form.push((
            access_field(CATCH_ALL_LETTER, 'G'),
            ACCESS_RAW.raw(default.access).unwrap_or("3").to_string(),
        ));
    }
    form
}

fn decode_trap_page(doc: &Html, url: &str) -> Result<TrapConfig> {
    let mut config = TrapConfig::new();
    for (idx, letter) in LETTERS.enumerate() {
        let ip = scrape::input_value(doc, &trap_field(letter, 'E')).unwrap_or_default();
        let community = scrape::input_value(doc, &trap_field(letter, 'F')).ok_or_else(|| {
            Error::parse(url, format!("missing {} community field", trap_field(letter, 'F')))
        })?;
        let combined = scrape::selected_option(doc, &trap_field(letter, 'J'))
            .unwrap_or_else(|| "2".to_string());
        let (severity, kind) = match combined.as_str() {
            "3" => (Severity::Info, TrapKind::Rfc),
            "2" => (Severity::Info, TrapKind::Proprietary),
            _ => (Severity::None, TrapKind::Rfc),
        };
        let alias = scrape::input_value(doc, &trap_field(letter, 'G')).unwrap_or_default();

        config.insert(
            Slot::Index(idx as u8 + 1),
            TrapReceiverEntry {
                ip,
                community,
                version: None,
                severity: Some(severity),
                kind: Some(kind),
                alias: Some(alias),
            },
        );
    }
    Ok(config)
}

fn encode_trap_form(config: &TrapConfig) -> Vec<(String, String)> {
    let mut form = Vec::new();
    for (idx, letter) in LETTERS.enumerate() {
        let Some(entry) = config.get(&Slot::Index(idx as u8 + 1)) else {
            continue;
        };
        form.push((trap_field(letter, 'E'), entry.ip.clone()));
        form.push((trap_field(letter, 'F'), entry.community.clone()));
        let combined = if entry.severity == Some(Severity::None) {
            "1"
        } else if entry.kind == Some(TrapKind::Proprietary) {
            "2"
        } else {
            "3"
        };
        form.push((trap_field(letter, 'J'), combined.to_string()));
        form.push((
            trap_field(letter, 'G'),
            entry.alias.clone().unwrap_or_default(),
        ));
    }
    form
}
