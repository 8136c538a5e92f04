use lazy_static::lazy_static;
use regex::Regex;

use crate::router::params::{ParamKey, ParameterSet};

lazy_static! {
    // `:name` up to the next slash, `{name}`, or a raw `(regex)` group.
    static ref TOKEN: Regex = Regex::new(r":[^/]+|\{[^0-9}][^}]*\}|\(.+?\)").unwrap();
}

const NAMED_CAPTURE: &str = "[^/]+";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Named(String),
    Raw,
}

/// A compiled route pattern, anchored at both ends.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    tokens: Vec<Token>,
}

impl Pattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let mut source = String::from("^");
        let mut tokens = vec![];
        let mut last = 0;

        for m in TOKEN.find_iter(pattern) {
            source.push_str(&pattern[last..m.start()]);
            last = m.end();

            let token = m.as_str();
            let group = format!("t{}", tokens.len());
            if let Some(name) = token.strip_prefix(':') {
                tokens.push(Token::Named(name.to_owned()));
                source.push_str(&format!("(?P<{}>{})", group, NAMED_CAPTURE));
            } else if let Some(name) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
                tokens.push(Token::Named(name.to_owned()));
                source.push_str(&format!("(?P<{}>{})", group, NAMED_CAPTURE));
            } else {
                tokens.push(Token::Raw);
                source.push_str(&format!("(?P<{}>{})", group, token));
            }
        }
        source.push_str(&pattern[last..]);
        source.push('$');

        Ok(Self {
            regex: Regex::new(&source)?,
            source,
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches the whole of `path`. Raw captures are keyed by their token
    /// position, named ones by name after all raw ones.
    pub fn captures(&self, path: &str) -> Option<ParameterSet> {
        let caps = self.regex.captures(path)?;

        let mut params = ParameterSet::new();
        for idx in 0..self.tokens.len() {
            let value = caps
                .name(&format!("t{}", idx))
                .map_or("", |m| m.as_str());
            params.insert(ParamKey::Index(idx), value);
        }
        for (idx, token) in self.tokens.iter().enumerate() {
            if let Token::Named(name) = token {
                let value = params.remove(&ParamKey::Index(idx)).unwrap_or_default();
                params.insert(ParamKey::Name(name.clone()), value);
            }
        }
        Some(params)
    }
}
