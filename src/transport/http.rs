//! Blocking HTTP transport over reqwest.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{COOKIE, SET_COOKIE};

use super::{Response, TlsMode, Transport, TransportConfig};
use crate::error::{Error, Result};
use crate::session::Session;

/// HTTP transport backed by a blocking reqwest client.
///
/// Redirects are not followed: the cards answer configuration POSTs with
/// redirects or refresh pages, and following them would hide the status the
/// adapters act on. Cookies are attached explicitly from the [`Session`]
/// rather than a client-wide jar, keeping the credential bundle owned by the
/// adapter.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(matches!(config.tls, TlsMode::DangerAccept))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Transport {
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }

    fn execute(&self, url: &str, request: RequestBuilder, session: &Session) -> Result<Response> {
        let mut request = request;
        if let Some(cookie) = session.cookie_header() {
            request = request.header(COOKIE, cookie);
        }
        if let Some((user, password)) = session.basic_auth() {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().map_err(|e| Error::Network {
            url: url.into(),
            source: Box::new(e),
        })?;

        let status = response.status().as_u16();
        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|raw| raw.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect();
        let body = response.text().map_err(|e| Error::Network {
            url: url.into(),
            source: Box::new(e),
        })?;

        tracing::debug!(target: "upsconf::transport", url, status, "request completed");

        Ok(Response {
            status,
            body,
            cookies,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, session: &Session) -> Result<Response> {
        self.execute(url, self.client.get(url), session)
    }

    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
        session: &Session,
    ) -> Result<Response> {
        self.execute(url, self.client.post(url).form(form), session)
    }
}
