use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    content_encoding::ContentEncoding,
    request::Request,
    status_code_registry::ReasonPhrase,
    transport::{Sent, Transport},
};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum Phase {
    Building,
    Finalized,
    Sent,
}

#[derive(Error, Debug)]
#[error("response is {actual}, expected {expected}")]
pub struct PhaseError {
    pub expected: Phase,
    pub actual: Phase,
}

#[derive(Debug)]
pub struct Response {
    status_code: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    phase: Phase,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status_code: ReasonPhrase::OK.status_code(),
            headers: vec![],
            body: vec![],
            phase: Phase::Building,
        }
    }

    /// A response for the representation at `location`. When it is not the
    /// uri the client asked for, the response advertises it and varies on
    /// the negotiation headers.
    pub fn for_location(r: &Request, location: &str) -> Self {
        let mut w = Self::new();
        if location != r.get_request_target() {
            w.add_header("Content-Location", location);
            w.add_vary("Accept");
            w.add_vary("Accept-Language");
        }
        w
    }

    pub fn get_status_code(&self) -> u16 {
        self.status_code
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = status_code;
    }

    pub fn set_reason_phrase(&mut self, reason_phrase: ReasonPhrase) {
        self.status_code = reason_phrase.status_code();
    }

    pub fn get_phase(&self) -> Phase {
        self.phase
    }

    pub fn add_header(&mut self, k: impl Into<String>, v: impl Into<String>) {
        let (k, v) = (k.into(), v.into());
        if let Some(entry) = self.headers.iter_mut().find(|entry| entry.0 == k) {
            entry.1 = v;
        } else {
            self.headers.push((k, v));
        }
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|entry| entry.0 == k)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Appends to `Vary`. Repeated names are appended again.
    pub fn add_vary(&mut self, name: &str) {
        let vary = match self.get_header("Vary") {
            Some(current) => format!("{} {}", current, name),
            None => name.to_owned(),
        };
        self.add_header("Vary", vary);
    }

    pub fn add_cache_header(&mut self, seconds: i64) {
        let value = if seconds > 0 {
            format!("max-age={}, must-revalidate", seconds)
        } else {
            "no-cache".to_owned()
        };
        self.add_header("Cache-Control", value);
    }

    pub fn add_etag(&mut self, etag: &str) {
        self.add_header("Etag", format!("\"{}\"", etag));
    }

    pub fn add_allow_header<'a>(&mut self, http_methods: impl IntoIterator<Item = &'a str>) {
        let http_methods = http_methods.into_iter().collect::<Vec<_>>().join(", ");
        self.add_header("Allow", http_methods);
    }

    pub fn get_body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>, content_type: &str) {
        self.body = body.into();
        self.add_header("Content-Type", content_type);
    }

    pub fn set_body_str(&mut self, body: &str) {
        self.set_body(body, "text/plain");
    }

    /// Encodes the body for the client and fixes `Content-Length`.
    pub fn finalize(&mut self, r: &Request) -> Result<(), PhaseError> {
        if self.phase != Phase::Building {
            return Err(PhaseError {
                expected: Phase::Building,
                actual: self.phase,
            });
        }

        if !self.body.is_empty() && !r.output_compression() {
            self.encode_body(r.get_accept_encoding());
        }
        self.add_header("Content-Length", self.body.len().to_string());
        self.phase = Phase::Finalized;
        Ok(())
    }

    fn encode_body(&mut self, accept_encoding: &[String]) {
        let Some(encoding) = ContentEncoding::select(accept_encoding) else {
            return;
        };
        debug!(%encoding, "content encoding");

        match encoding.encode(&self.body) {
            Ok(Some(encoded)) => {
                self.body = encoded;
                self.add_header("Content-Encoding", encoding.to_string());
            }
            Ok(None) => {}
            Err(err) => error!(?err, %encoding, "body left unencoded"),
        }
    }

    /// Hands the response to `transport`. HEAD requests get the headers of
    /// the full response and no body.
    pub fn send(mut self, r: &Request, transport: &mut impl Transport) -> anyhow::Result<()> {
        if self.phase == Phase::Building {
            self.finalize(r)?;
        }
        if r.is_head() {
            self.body.clear();
        }
        self.phase = Phase::Sent;

        transport.send(Sent {
            status_code: self.status_code,
            reason_phrase: ReasonPhrase::try_from(self.status_code).ok(),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
