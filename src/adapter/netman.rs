//! Riello Netman 204 adapter (Sentinel family).
//!
//! The Netman agent serves its CGI pages over HTTPS with a self-signed
//! certificate and uses a cookie session: a plain username/password POST to
//! `login.cgi` that must answer success *and* hand back at least one cookie.
//!
//! One page (`snmp_config.cgi`) carries both the SNMP communities and the
//! trap receivers. The card exposes a single shared read community (rendered
//! as the canonical `default` entry), a write community, and seven receiver
//! addresses in flat `snmp_config0..6` fields sharing one trap community.
//! Writes re-submit the whole form, so the current field values are fetched
//! raw and only the requested fields are replaced before posting.

use scraper::Html;

use super::UpsAdapter;
use crate::error::{Error, Result};
use crate::model::{
    Access, DeviceInfo, Slot, SnmpAccessEntry, SnmpConfig, TrapConfig, TrapReceiverEntry,
};
use crate::scrape;
use crate::session::Session;
use crate::transport::{HttpTransport, TlsMode, Transport, TransportConfig};

/// Receiver slots on the combined SNMP/trap page; slot `n` lives in the raw
/// `snmp_config{n-1}` field.
const RECEIVER_SLOTS: std::ops::RangeInclusive<u8> = 1..=7;

/// Form fields submitted back verbatim unless a write replaces them.
const PASSTHROUGH_FIELDS: [&str; 7] = [
    "snmp_cconfig0",
    "snmp_cconfig1",
    "snmp_cconfig2",
    "snmp_sysC",
    "snmp_sysN",
    "snmp_sysL",
    "session",
];

/// Adapter for Riello cards running the Netman 204 agent.
pub struct NetmanAdapter<T: Transport = HttpTransport> {
    host: String,
    user: String,
    password: String,
    transport: T,
    session: Session,
}

impl NetmanAdapter<HttpTransport> {
    /// Adapter with the card's stock transport settings: HTTPS with
    /// certificate verification off, since shipped cards present self-signed
    /// certificates. Use [`with_config`](Self::with_config) to verify.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(
            host,
            user,
            password,
            TransportConfig::default().tls(TlsMode::DangerAccept),
        )
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

impl<T: Transport> NetmanAdapter<T> {
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
        format!("https://{}/{}", self.host, path)
    }

    fn fetch(&self, path: &str) -> Result<Html> {
        let url = self.url(path);
        let response = self
            .transport
            .get(&url, &self.session)?
            .ensure_success(&url)?;
        Ok(scrape::parse(&response.body))
    }

    /// Current values of every field the configuration form submits, fetched
    /// raw so that a write only replaces the fields it means to change.
    fn fetch_form_state(&self) -> Result<Vec<(String, String)>> {
        let doc = self.fetch("cgi-bin/snmp_config.cgi")?;
        let mut form = vec![("enable_snmp".to_string(), "on".to_string())];
        for name in PASSTHROUGH_FIELDS {
            form.push((
                name.to_string(),
                scrape::input_value(&doc, name).unwrap_or_default(),
            ));
        }
        for slot in RECEIVER_SLOTS {
            let name = format!("snmp_config{}", slot - 1);
            let value = scrape::input_value(&doc, &name).unwrap_or_default();
            form.push((name, value));
        }
        Ok(form)
    }

    fn submit_form(&self, form: &[(String, String)]) -> Result<()> {
        let url = self.url("cgi-bin/snmp_config_w.cgi");
        self.transport
            .post_form(&url, form, &self.session)?
            .ensure_success(&url)?;
        Ok(())
    }

    /// End the session on the card. The card forgets the cookies; so does
    /// the adapter.
    pub fn logout(&mut self) -> Result<()> {
        let url = self.url("cgi-bin/logout.cgi");
        self.transport.get(&url, &self.session)?;
        self.session = Session::None;
        Ok(())
    }

    /// Reboot the management card (not the UPS). The session does not
    /// survive the reboot.
    pub fn reboot_agent(&mut self) -> Result<()> {
        let url = self.url("cgi-bin/reboot_2.cgi");
        self.transport.get(&url, &self.session)?;
        self.session = Session::None;
        Ok(())
    }
}

fn set_field(form: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(field) = form.iter_mut().find(|(n, _)| n == name) {
        field.1 = value;
    } else {
        form.push((name.to_string(), value));
    }
}

impl<T: Transport> UpsAdapter for NetmanAdapter<T> {
    fn host(&self) -> &str {
        &self.host
    }

    fn login(&mut self) -> Result<()> {
        let form = vec![
            ("username".to_string(), self.user.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        let response =
            self.transport
                .post_form(&self.url("cgi-bin/login.cgi"), &form, &Session::None)?;
        if !response.is_success() {
            tracing::warn!(target: "upsconf::adapter::netman", host = %self.host, status = response.status, "login rejected");
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
        let doc = self.fetch("cgi-bin/snmp_config.cgi")?;
        let mut config = SnmpConfig::new();
        config.insert(
            Slot::Default,
            SnmpAccessEntry {
                ip: None,
                community: scrape::input_value_by_id(&doc, "snmp_cconfig0").unwrap_or_default(),
                access: Access::ReadOnly,
            },
        );
        Ok(config)
    }

    fn set_snmp_config(&self, new_config: &SnmpConfig) -> Result<()> {
        new_config.validate()?;
        let mut form = self.fetch_form_state()?;
        if let Some(default) = new_config.get(&Slot::Default) {
            match default.access {
                Access::ReadOnly => {
                    set_field(&mut form, "snmp_cconfig0", default.community.clone());
                }
                Access::ReadWrite => {
                    set_field(&mut form, "snmp_cconfig1", default.community.clone());
                }
                Access::None => {}
            }
        }
        self.submit_form(&form)
    }

    fn get_trap_config(&self) -> Result<TrapConfig> {
        let doc = self.fetch("cgi-bin/snmp_config.cgi")?;
        let community = scrape::input_value_by_id(&doc, "snmp_cconfig2").unwrap_or_default();
        let mut config = TrapConfig::new();
        for slot in RECEIVER_SLOTS {
            let ip = scrape::input_value_by_id(&doc, &format!("snmp_config{}", slot - 1))
                .unwrap_or_default();
            config.insert(
                Slot::Index(slot),
                TrapReceiverEntry {
                    ip,
                    community: community.clone(),
                    ..Default::default()
                },
            );
        }
        Ok(config)
    }

    fn set_trap_config(&self, new_config: &TrapConfig) -> Result<()> {
        let mut form = self.fetch_form_state()?;
        // All receivers share one community; the first written slot wins.
        if let Some(first) = RECEIVER_SLOTS
            .filter_map(|slot| new_config.get(&Slot::Index(slot)))
            .next()
        {
            set_field(&mut form, "snmp_cconfig2", first.community.clone());
        }
        for slot in RECEIVER_SLOTS {
            if let Some(entry) = new_config.get(&Slot::Index(slot)) {
                set_field(
                    &mut form,
                    &format!("snmp_config{}", slot - 1),
                    entry.ip.clone(),
                );
            }
        }
        self.submit_form(&form)
    }

    fn get_info(&self) -> Result<DeviceInfo> {
        let doc = self.fetch("cgi-bin/view_about.cgi")?;
        let cell = |label: &str| {
            scrape::cell_after_label(&doc, label).filter(|v| !v.is_empty())
        };

        let mut info = DeviceInfo {
            manufacturer: Some("Riello".to_string()),
            agent_type: Some("Netman 204".to_string()),
            model: cell("Model"),
            serial: cell("Identification number"),
            firmware: cell("Firmware version"),
            agent_firmware: cell("Application version"),
            agent_serial: cell("Serial Number"),
            mac_address: cell("MAC Address"),
            rating_va: cell("Power [kVA]"),
            rating_w: cell("Power [kW]"),
            battery_capacity_ah: cell("Battery capacity [Ah]"),
        };
        // The about page shows kVA/kW; ratings are reported in VA/W.
        info.rating_va = info.rating_va.as_deref().and_then(scale_kilo);
        info.rating_w = info.rating_w.as_deref().and_then(scale_kilo);
        Ok(info)
    }
}

fn scale_kilo(value: &str) -> Option<String> {
    let parsed: f64 = value.trim().parse().ok()?;
    Some(((parsed * 1000.0) as i64).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilo_scaling() {
        assert_eq!(scale_kilo("2.2").as_deref(), Some("2200"));
        assert_eq!(scale_kilo("10").as_deref(), Some("10000"));
        assert_eq!(scale_kilo("n/a"), None);
    }

    #[test]
    fn set_field_replaces_or_appends() {
        let mut form = vec![("a".to_string(), "1".to_string())];
        set_field(&mut form, "a", "2".to_string());
        set_field(&mut form, "b", "3".to_string());
        assert_eq!(
            form,
            vec![
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "3".to_string())
            ]
        );
    }
}
