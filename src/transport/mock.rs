//! Mock transport for testing.
//!
//! Provides a programmable transport that replays canned pages and records
//! every request, without needing a management card on the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{Response, Transport};
use crate::error::{Error, Result};
use crate::session::Session;

/// A canned reply for one request.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Return this response.
    Page(Response),
    /// Simulate a network-level failure.
    NetworkError(String),
}

/// A recorded request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// `"GET"` or `"POST"`.
    pub method: &'static str,
    /// Full request URL.
    pub url: String,
    /// Form fields of a POST, empty for GET.
    pub form: Vec<(String, String)>,
    /// `Cookie` header the session produced, if any.
    pub cookie_header: Option<String>,
    /// Basic-auth pair the session produced, if any.
    pub basic_auth: Option<(String, String)>,
}

impl RecordedRequest {
    /// Value of a form field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

struct MockTransportInner {
    replies: VecDeque<MockReply>,
    requests: Vec<RecordedRequest>,
    default_reply: Option<MockReply>,
}

/// Mock transport replaying queued replies in request order.
///
/// Clones share state, so tests keep a handle for assertions after moving a
/// clone into the adapter under test.
///
/// # Example
///
/// ```rust
/// use upsconf::transport::MockTransport;
///
/// let mock = MockTransport::new();
/// mock.queue_ok("<html><body>...</body></html>");
/// mock.queue_status(403, "");
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl Default for MockTransportInner {
    fn default() -> Self {
        Self {
            replies: VecDeque::new(),
            requests: Vec::new(),
            default_reply: None,
        }
    }
}

impl MockTransport {
    /// Create a new mock transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with the given body and no cookies.
    pub fn queue_ok(&self, body: impl Into<String>) {
        self.queue_reply(MockReply::Page(Response {
            status: 200,
            body: body.into(),
            cookies: Vec::new(),
        }));
    }

    /// Queue a response with an arbitrary status and body.
    pub fn queue_status(&self, status: u16, body: impl Into<String>) {
        self.queue_reply(MockReply::Page(Response {
            status,
            body: body.into(),
            cookies: Vec::new(),
        }));
    }

    /// Queue a 200 response carrying session cookies.
    pub fn queue_ok_with_cookies(&self, body: impl Into<String>, cookies: &[(&str, &str)]) {
        self.queue_reply(MockReply::Page(Response {
            status: 200,
            body: body.into(),
            cookies: cookies
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }));
    }

    /// Queue a network-level failure.
    pub fn queue_network_error(&self, msg: impl Into<String>) {
        self.queue_reply(MockReply::NetworkError(msg.into()));
    }

    /// Set the reply used when the queue is empty.
    pub fn set_default_reply(&self, reply: MockReply) {
        let mut inner = self.inner.lock().unwrap();
        inner.default_reply = Some(reply);
    }

    /// All recorded requests, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Number of recorded requests.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    fn queue_reply(&self, reply: MockReply) {
        let mut inner = self.inner.lock().unwrap();
        inner.replies.push_back(reply);
    }

    fn dispatch(
        &self,
        method: &'static str,
        url: &str,
        form: &[(String, String)],
        session: &Session,
    ) -> Result<Response> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            form: form.to_vec(),
            cookie_header: session.cookie_header(),
            basic_auth: session
                .basic_auth()
                .map(|(u, p)| (u.to_string(), p.to_string())),
        });

        let reply = inner
            .replies
            .pop_front()
            .or_else(|| inner.default_reply.clone());

        match reply {
            Some(MockReply::Page(response)) => Ok(response),
            Some(MockReply::NetworkError(msg)) => Err(Error::Network {
                url: url.into(),
                source: Box::new(std::io::Error::other(msg)),
            }),
            None => Err(Error::Network {
                url: url.into(),
                source: Box::new(std::io::Error::other("no reply queued")),
            }),
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, session: &Session) -> Result<Response> {
        self.dispatch("GET", url, &[], session)
    }

    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
        session: &Session,
    ) -> Result<Response> {
        self.dispatch("POST", url, form, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_drain_in_order() {
        let mock = MockTransport::new();
        mock.queue_ok("first");
        mock.queue_status(404, "second");

        let r1 = mock.get("http://h/a", &Session::None).unwrap();
        assert_eq!(r1.status, 200);
        assert_eq!(r1.body, "first");

        let r2 = mock.get("http://h/b", &Session::None).unwrap();
        assert_eq!(r2.status, 404);

        assert!(mock.get("http://h/c", &Session::None).is_err());
    }

    #[test]
    fn records_form_and_session() {
        let mock = MockTransport::new();
        mock.queue_ok("");

        let session = Session::Cookies(vec![("sid".into(), "x1".into())]);
        let form = vec![("CO1".to_string(), "public".to_string())];
        mock.post_form("http://h/tgi/net_snmpaccess1.tgi", &form, &session)
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].field("CO1"), Some("public"));
        assert_eq!(requests[0].cookie_header.as_deref(), Some("sid=x1"));
    }

    #[test]
    fn network_error_reply() {
        let mock = MockTransport::new();
        mock.queue_network_error("connection refused");

        let err = mock.get("http://h/", &Session::None).unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
    }
}
