use std::io::Write;

use crate::status_code_registry::ReasonPhrase;

/// A finalized response as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub status_code: u16,
    pub reason_phrase: Option<ReasonPhrase>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Sent {
    pub fn write(&self) -> Vec<u8> {
        let mut status_line = format!("HTTP/1.1 {}", self.status_code);
        if let Some(reason_phrase) = &self.reason_phrase {
            status_line = format!("{} {}", status_line, reason_phrase);
        }
        status_line.push_str("\r\n");

        let mut headers = self
            .headers
            .iter()
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect::<Vec<_>>()
            .join("");
        headers.push_str("\r\n");

        let mut resp = vec![];
        resp.extend(status_line.bytes());
        resp.extend(headers.bytes());
        resp.extend(&self.body);
        resp
    }
}

pub trait Transport {
    fn send(&mut self, response: Sent) -> anyhow::Result<()>;
}

/// Collects responses in memory.
impl Transport for Vec<Sent> {
    fn send(&mut self, response: Sent) -> anyhow::Result<()> {
        self.push(response);
        Ok(())
    }
}

/// Writes responses as HTTP/1.1 messages.
pub struct HttpWriter<W>(W);

impl<W: Write> HttpWriter<W> {
    pub fn new(w: W) -> Self {
        Self(w)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> Transport for HttpWriter<W> {
    fn send(&mut self, response: Sent) -> anyhow::Result<()> {
        self.0.write_all(&response.write())?;
        self.0.flush()?;
        Ok(())
    }
}
