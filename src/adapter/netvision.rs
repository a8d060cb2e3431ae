//! Socomec NetVision adapter (Netys family).
//!
//! The NetVision agent serves plain-HTTP pages and authenticates with a
//! challenge/response handshake: the login page carries a per-session
//! challenge token, and the card expects the MD5 digest of
//! `user + password + challenge` instead of the password itself.
//!
//! The SNMP access form indexes its fields `NM`/`CO`/`PE` with a numeric
//! suffix `1..8`, where raw index 1 is the catch-all entry for all other
//! management stations (it has no `NM1` address field) and raw indices
//! `2..8` hold the numbered client entries. The trap form uses a flat
//! `NMS`/`COM`/`PER`/`TTT`/`TYP` suffix `1..8` with no catch-all.

use scraper::Html;

use super::UpsAdapter;
use crate::error::{Error, Result};
use crate::lookup::EnumTable;
use crate::model::{
    Access, DeviceInfo, Severity, Slot, SnmpAccessEntry, SnmpConfig, TrapConfig, TrapKind,
    TrapReceiverEntry, TrapVersion,
};
use crate::scrape;
use crate::session::{challenge_digest, Session};
use crate::transport::{HttpTransport, Transport, TransportConfig};

const ACCESS_RAW: EnumTable<Access> = EnumTable::new(&[
    (Access::None, "none"),
    (Access::ReadOnly, "ro"),
    (Access::ReadWrite, "rw"),
]);

const SEVERITY_RAW: EnumTable<Severity> = EnumTable::new(&[
    (Severity::None, "non"),
    (Severity::Info, "inf"),
    (Severity::Warn, "war"),
    (Severity::Crit, "sec"),
]);

const VERSION_RAW: EnumTable<TrapVersion> =
    EnumTable::new(&[(TrapVersion::V1, "0"), (TrapVersion::V2, "1")]);

const KIND_RAW: EnumTable<TrapKind> =
    EnumTable::new(&[(TrapKind::Proprietary, "v4"), (TrapKind::Rfc, "rfc")]);

/// Raw field indices on the SNMP access page. Index 1 is the catch-all
/// entry; `2..=8` map to canonical slots `1..=7`.
const ACCESS_RAW_INDICES: std::ops::RangeInclusive<u8> = 2..=8;

/// Trap receiver slots on the trap page, flat `1..=8`.
const RECEIVER_SLOTS: std::ops::RangeInclusive<u8> = 1..=8;

/// Adapter for Socomec cards running the NetVision agent.
pub struct NetvisionAdapter<T: Transport = HttpTransport> {
    host: String,
    user: String,
    password: String,
    transport: T,
    session: Session,
}

impl NetvisionAdapter<HttpTransport> {
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

impl<T: Transport> NetvisionAdapter<T> {
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

impl<T: Transport> UpsAdapter for NetvisionAdapter<T> {
    fn host(&self) -> &str {
        &self.host
    }

    fn login(&mut self) -> Result<()> {
        let (_, doc) = self.fetch("")?;
        let challenge = scrape::input_value(&doc, "Challenge")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::login(&self.host, "challenge token not found on login page"))?;

        let digest = challenge_digest(&self.user, &self.password, &challenge);
        let form = vec![
            ("Username".to_string(), self.user.clone()),
            ("Password".to_string(), String::new()),
            ("Challenge".to_string(), String::new()),
            ("Response".to_string(), digest),
        ];

        let response = self
            .transport
            .post_form(&self.url("tgi/login.tgi"), &form, &Session::None)?;
        if !response.is_success() {
            tracing::warn!(target: "upsconf::adapter::netvision", host = %self.host, status = response.status, "login rejected");
            return Err(Error::login(
                &self.host,
                format!("credentials rejected (HTTP {})", response.status),
            ));
        }
        if response.cookies.is_empty() {
            return Err(Error::login(&self.host, "no session cookie returned"));
        }
        self.session = Session::Cookies(response.cookies);
        Ok(())
    }

    fn get_snmp_config(&self) -> Result<SnmpConfig> {
        let (url, doc) = self.fetch("net_snmpaccess1.htm")?;
        decode_access_page(&doc, &url)
    }

    fn set_snmp_config(&self, new_config: &SnmpConfig) -> Result<()> {
        new_config.validate()?;
        let mut merged = self.get_snmp_config()?;
        merged.merge(new_config);

        let url = self.url("tgi/net_snmpaccess1.tgi");
        self.transport
            .post_form(&url, &encode_access_form(&merged), &self.session)?
            .ensure_success(&url)?;
        Ok(())
    }

    fn get_trap_config(&self) -> Result<TrapConfig> {
        let (url, doc) = self.fetch("net_snmptrap.htm")?;
        decode_trap_page(&doc, &url)
    }

    fn set_trap_config(&self, new_config: &TrapConfig) -> Result<()> {
        let mut merged = self.get_trap_config()?;
        merged.merge(new_config);

        let url = self.url("tgi/net_trapaccess.tgi");
        self.transport
            .post_form(&url, &encode_trap_form(&merged), &self.session)?
            .ensure_success(&url)?;
        Ok(())
    }

    fn get_info(&self) -> Result<DeviceInfo> {
        let (url, doc) = self.fetch("info_ident.htm")?;

        let cell = |label: &str| -> Result<Option<String>> {
            let value = scrape::cell_after_label(&doc, label)
                .ok_or_else(|| Error::parse(&url, format!("missing {label:?} row")))?;
            Ok(Some(value).filter(|v| !v.is_empty()))
        };

        let mut info = DeviceInfo {
            manufacturer: Some("Socomec".to_string()),
            agent_type: Some("NetVision".to_string()),
            model: cell("Model:")?,
            serial: cell("Serial Number:")?,
            firmware: cell("UPS Firmware:")?,
            agent_firmware: cell("Web Firmware:")?,
            rating_va: cell("Rating VA:")?,
            ..Default::default()
        };
        // The rating cell reads like "2200 VA"; keep the number.
        if let Some(rating) = &info.rating_va {
            info.rating_va = rating.split_whitespace().next().map(str::to_string);
        }
        Ok(info)
    }
}

fn decode_access_page(doc: &Html, url: &str) -> Result<SnmpConfig> {
    let mut config = SnmpConfig::new();

    let community = scrape::input_value(doc, "CO1")
        .ok_or_else(|| Error::parse(url, "missing CO1 community field"))?;
    let access_raw = scrape::selected_option(doc, "PE1")
        .ok_or_else(|| Error::parse(url, "missing PE1 access selector"))?;
    config.insert(
        Slot::Default,
        SnmpAccessEntry {
            ip: None,
            community,
            access: ACCESS_RAW.decode_or(&access_raw, Access::None),
        },
    );

    for raw_index in ACCESS_RAW_INDICES {
        let ip = scrape::input_value(doc, &format!("NM{raw_index}"))
            .ok_or_else(|| Error::parse(url, format!("missing NM{raw_index} address field")))?;
        let community = scrape::input_value(doc, &format!("CO{raw_index}"))
            .ok_or_else(|| Error::parse(url, format!("missing CO{raw_index} community field")))?;
        let access_raw = scrape::selected_option(doc, &format!("PE{raw_index}"))
            .ok_or_else(|| Error::parse(url, format!("missing PE{raw_index} access selector")))?;
        config.insert(
            Slot::Index(raw_index - 1),
            SnmpAccessEntry {
                ip: Some(scrape::norm_ip(&ip)),
                community,
                access: ACCESS_RAW.decode_or(&access_raw, Access::None),
            },
        );
    }
    Ok(config)
}

fn encode_access_form(config: &SnmpConfig) -> Vec<(String, String)> {
    let mut form = Vec::new();
    if let Some(default) = config.get(&Slot::Default) {
        form.push(("CO1".to_string(), default.community.clone()));
        form.push((
            "PE1".to_string(),
            ACCESS_RAW.raw(default.access).unwrap_or("none").to_string(),
        ));
    }
    for raw_index in ACCESS_RAW_INDICES {
        let Some(entry) = config.get(&Slot::Index(raw_index - 1)) else {
            continue;
        };
        form.push((
            format!("NM{raw_index}"),
            entry.ip.clone().unwrap_or_else(|| "0.0.0.0".to_string()),
        ));
        form.push((format!("CO{raw_index}"), entry.community.clone()));
        form.push((
            format!("PE{raw_index}"),
            ACCESS_RAW.raw(entry.access).unwrap_or("none").to_string(),
        ));
    }
    form
}

fn decode_trap_page(doc: &Html, url: &str) -> Result<TrapConfig> {
    let mut config = TrapConfig::new();
    for slot in RECEIVER_SLOTS {
        let ip = scrape::input_value(doc, &format!("NMS{slot}"))
            .ok_or_else(|| Error::parse(url, format!("missing NMS{slot} address field")))?;
        let community = scrape::input_value(doc, &format!("COM{slot}"))
            .ok_or_else(|| Error::parse(url, format!("missing COM{slot} community field")))?;
        let severity_raw = scrape::selected_option(doc, &format!("PER{slot}"))
            .ok_or_else(|| Error::parse(url, format!("missing PER{slot} severity selector")))?;
        let version_raw = scrape::selected_option(doc, &format!("TTT{slot}"))
            .ok_or_else(|| Error::parse(url, format!("missing TTT{slot} version selector")))?;
        let kind_raw = scrape::selected_option(doc, &format!("TYP{slot}"))
            .ok_or_else(|| Error::parse(url, format!("missing TYP{slot} type selector")))?;

        config.insert(
            Slot::Index(slot),
            TrapReceiverEntry {
                ip,
                community,
                severity: SEVERITY_RAW.decode(&severity_raw),
                version: VERSION_RAW.decode(&version_raw),
                kind: KIND_RAW.decode(&kind_raw),
                alias: None,
            },
        );
    }
    Ok(config)
}

fn encode_trap_form(config: &TrapConfig) -> Vec<(String, String)> {
    let mut form = vec![("Submit".to_string(), "Submit".to_string())];
    for slot in RECEIVER_SLOTS {
        let Some(entry) = config.get(&Slot::Index(slot)) else {
            continue;
        };
        form.push((format!("NMS{slot}"), entry.ip.clone()));
        form.push((format!("COM{slot}"), entry.community.clone()));
        form.push((
            format!("PER{slot}"),
            entry
                .severity
                .and_then(|s| SEVERITY_RAW.raw(s))
                .unwrap_or("non")
                .to_string(),
        ));
        form.push((
            format!("TTT{slot}"),
            entry
                .version
                .and_then(|v| VERSION_RAW.raw(v))
                .unwrap_or("1")
                .to_string(),
        ));
        form.push((
            format!("TYP{slot}"),
            entry
                .kind
                .and_then(|k| KIND_RAW.raw(k))
                .unwrap_or("rfc")
                .to_string(),
        ));
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_page() -> Html {
        let mut page = String::from("<html><body><form>");
        page.push_str(r#"<input name="CO1" value="public">"#);
        page.push_str(
            r#"<select name="PE1"><option value="none">-</option><option value="ro" selected>-</option></select>"#,
        );
        for i in 2..=8u8 {
            page.push_str(&format!(
                r#"<input name="NM{i}" value="010.000.000.{:03}">"#,
                i
            ));
            page.push_str(&format!(r#"<input name="CO{i}" value="comm{i}">"#));
            page.push_str(&format!(
                r#"<select name="PE{i}"><option value="rw" selected>-</option></select>"#
            ));
        }
        page.push_str("</form></body></html>");
        scrape::parse(&page)
    }

    #[test]
    fn access_decode_shifts_raw_indices() {
        let config = decode_access_page(&access_page(), "http://h/net_snmpaccess1.htm").unwrap();

        // One catch-all plus seven numbered entries.
        assert_eq!(config.0.len(), 8);
        let default = config.get(&Slot::Default).unwrap();
        assert_eq!(default.community, "public");
        assert_eq!(default.access, Access::ReadOnly);
        assert_eq!(default.ip, None);

        // Raw field 2 is canonical slot 1, leading zeros dropped.
        let one = config.get(&Slot::Index(1)).unwrap();
        assert_eq!(one.ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(one.community, "comm2");
        let seven = config.get(&Slot::Index(7)).unwrap();
        assert_eq!(seven.ip.as_deref(), Some("10.0.0.8"));
        assert!(config.get(&Slot::Index(8)).is_none());
    }

    #[test]
    fn access_decode_missing_field_is_parse_error() {
        let doc = scrape::parse("<html><body></body></html>");
        let err = decode_access_page(&doc, "http://h/net_snmpaccess1.htm").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn access_encode_reverses_the_shift() {
        let config = decode_access_page(&access_page(), "http://h/p").unwrap();
        let form = encode_access_form(&config);

        let field = |name: &str| {
            form.iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(field("CO1"), Some("public"));
        assert_eq!(field("PE1"), Some("ro"));
        assert_eq!(field("NM2"), Some("10.0.0.2"));
        assert_eq!(field("PE8"), Some("rw"));
        assert_eq!(field("NM1"), None);
        assert_eq!(field("NM9"), None);
    }

    #[test]
    fn trap_encode_uses_vendor_tokens() {
        let config: TrapConfig = [(
            Slot::Index(1),
            TrapReceiverEntry {
                ip: "10.1.1.1".into(),
                community: "public".into(),
                version: Some(TrapVersion::V2),
                severity: Some(Severity::Crit),
                kind: Some(TrapKind::Rfc),
                alias: None,
            },
        )]
        .into_iter()
        .collect();

        let form = encode_trap_form(&config);
        let field = |name: &str| {
            form.iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(field("Submit"), Some("Submit"));
        assert_eq!(field("NMS1"), Some("10.1.1.1"));
        assert_eq!(field("PER1"), Some("sec"));
        assert_eq!(field("TTT1"), Some("1"));
        assert_eq!(field("TYP1"), Some("rfc"));
    }

    #[test]
    fn trap_encode_defaults_for_absent_optionals() {
        let config: TrapConfig = [(
            Slot::Index(3),
            TrapReceiverEntry {
                ip: "10.3.3.3".into(),
                community: "c3".into(),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect();

        let form = encode_trap_form(&config);
        let field = |name: &str| {
            form.iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(field("PER3"), Some("non"));
        assert_eq!(field("TTT3"), Some("1"));
        assert_eq!(field("TYP3"), Some("rfc"));
    }
}
