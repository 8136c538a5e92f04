use std::sync::Arc;

use crate::resource::Fallback;

/// Construction options for a [`Request`](crate::request::Request) and a
/// [`Dispatcher`](crate::dispatcher::Dispatcher). Every option is optional.
#[derive(Clone, Default)]
pub struct Config {
    pub uri: Option<String>,
    pub base_uri: Option<String>,
    pub method: Option<String>,
    pub data: Option<Vec<u8>>,
    pub accept: Option<String>,
    pub accept_lang: Option<String>,
    pub accept_encoding: Option<String>,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    /// Extension to mimetype pairs merged into the default table.
    pub mimetypes: Vec<(String, String)>,
    /// Namespace to path prefix pairs applied when composing route keys.
    pub mounts: Vec<(String, String)>,
    pub not_found: Option<Arc<dyn Fallback>>,
    pub method_not_allowed: Option<Arc<dyn Fallback>>,
    /// The transport already compresses responses.
    pub output_compression: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn accept_lang(mut self, accept_lang: impl Into<String>) -> Self {
        self.accept_lang = Some(accept_lang.into());
        self
    }

    pub fn accept_encoding(mut self, accept_encoding: impl Into<String>) -> Self {
        self.accept_encoding = Some(accept_encoding.into());
        self
    }

    pub fn if_match(mut self, if_match: impl Into<String>) -> Self {
        self.if_match = Some(if_match.into());
        self
    }

    pub fn if_none_match(mut self, if_none_match: impl Into<String>) -> Self {
        self.if_none_match = Some(if_none_match.into());
        self
    }

    pub fn mimetype(mut self, ext: impl Into<String>, mimetype: impl Into<String>) -> Self {
        self.mimetypes.push((ext.into(), mimetype.into()));
        self
    }

    pub fn mount(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.mounts.push((namespace.into(), prefix.into()));
        self
    }

    pub fn not_found(mut self, fallback: impl Fallback + 'static) -> Self {
        self.not_found = Some(Arc::new(fallback));
        self
    }

    pub fn method_not_allowed(mut self, fallback: impl Fallback + 'static) -> Self {
        self.method_not_allowed = Some(Arc::new(fallback));
        self
    }

    pub fn output_compression(mut self, active: bool) -> Self {
        self.output_compression = active;
        self
    }
}
