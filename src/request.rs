use crate::{
    candidates::{split_path, CandidateUris},
    conditional::{self, parse_etags},
    config::Config,
    mimetypes::MimeTypes,
    negotiation::{parse_ordered, parse_weighted, PreferenceList},
};

/// A request as seen by the dispatcher: the raw options plus everything
/// negotiated from them. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct Request {
    http_method: String,
    request_target: String,
    base_uri: String,
    canonical_uri: String,
    body: Option<Vec<u8>>,
    accept: PreferenceList,
    accept_lang: PreferenceList,
    accept_encoding: Vec<String>,
    if_match: Vec<String>,
    if_none_match: Vec<String>,
    candidates: CandidateUris,
    mimetypes: MimeTypes,
    output_compression: bool,
}

impl Request {
    pub fn new(config: &Config) -> Self {
        let http_method = config
            .method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("GET")
            .to_uppercase();

        let uri = config.uri.as_deref().unwrap_or("/");
        let request_target = match uri.split_once('?') {
            Some((path, _query)) => path,
            None => uri,
        }
        .to_owned();

        let (canonical_uri, forced) = split_path(&request_target);

        let mimetypes = MimeTypes::with_overrides(config.mimetypes.iter().cloned());
        let accept = parse_weighted(config.accept.as_deref().unwrap_or_default(), |token| {
            mimetypes.extension(token).map(str::to_owned)
        })
        .with_forced(&forced);
        let accept_lang = parse_weighted(
            config.accept_lang.as_deref().unwrap_or_default(),
            |token| Some(token.to_owned()),
        )
        .with_forced(&forced);

        let formats: Vec<_> = accept.tokens().collect();
        let languages: Vec<_> = accept_lang.tokens().collect();
        let candidates = CandidateUris::generate(
            &canonical_uri,
            formats.iter().copied(),
            languages.iter().copied(),
        );

        Self {
            http_method,
            request_target,
            base_uri: config.base_uri.clone().unwrap_or_default(),
            canonical_uri,
            body: config.data.clone(),
            accept_encoding: parse_ordered(config.accept_encoding.as_deref().unwrap_or_default()),
            if_match: parse_etags(config.if_match.as_deref().unwrap_or_default()),
            if_none_match: parse_etags(config.if_none_match.as_deref().unwrap_or_default()),
            accept,
            accept_lang,
            candidates,
            mimetypes,
            output_compression: config.output_compression,
        }
    }

    pub fn get_http_method(&self) -> &str {
        &self.http_method
    }

    pub fn is_head(&self) -> bool {
        self.http_method == "HEAD"
    }

    /// The requested path, query string removed.
    pub fn get_request_target(&self) -> &str {
        &self.request_target
    }

    pub fn get_base_uri(&self) -> &str {
        &self.base_uri
    }

    /// The requested path without its format and language suffixes.
    pub fn get_canonical_uri(&self) -> &str {
        &self.canonical_uri
    }

    pub fn get_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn get_accept(&self) -> &PreferenceList {
        &self.accept
    }

    pub fn get_accept_lang(&self) -> &PreferenceList {
        &self.accept_lang
    }

    pub fn get_accept_encoding(&self) -> &[String] {
        &self.accept_encoding
    }

    pub fn get_if_match(&self) -> &[String] {
        &self.if_match
    }

    pub fn get_if_none_match(&self) -> &[String] {
        &self.if_none_match
    }

    pub fn get_candidates(&self) -> &CandidateUris {
        &self.candidates
    }

    pub fn get_mimetype(&self, ext: &str) -> Option<&str> {
        self.mimetypes.mimetype(ext)
    }

    pub fn output_compression(&self) -> bool {
        self.output_compression
    }

    pub fn if_match(&self, etag: &str) -> bool {
        conditional::if_match(&self.if_match, etag)
    }

    pub fn if_none_match(&self, etag: &str) -> bool {
        conditional::if_none_match(&self.if_match, &self.if_none_match, etag)
    }
}
