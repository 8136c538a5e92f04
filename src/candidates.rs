//! Canonical path and negotiated representation URIs.

/// Splits the dot separated suffixes off the last path segment.
///
/// `/items/42.json.en` yields `("/items/42", ["json", "en"])`.
pub fn split_path(path: &str) -> (String, Vec<String>) {
    let (head, last) = path.rsplit_once('/').unwrap_or(("", path));

    let mut pieces = last.split('.');
    let tail = pieces.next().unwrap_or_default();
    let forced = pieces
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.to_lowercase())
        .collect();

    let mut canonical = format!("{}/{}", head, tail);
    if canonical != "/" && canonical.ends_with('/') {
        canonical.pop();
    }
    (canonical, forced)
}

/// The alternate representation URIs of one canonical path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateUris {
    combined: Vec<String>,
    formats: Vec<String>,
    languages: Vec<String>,
}

impl CandidateUris {
    pub fn generate<'a>(
        canonical: &str,
        formats: impl IntoIterator<Item = &'a str> + Clone,
        languages: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Self {
        let mut uris = Self::default();

        for format in formats.clone() {
            for language in languages.clone() {
                if format != language {
                    push_unique(
                        &mut uris.combined,
                        format!("{}.{}.{}", canonical, format, language),
                    );
                }
            }
        }
        for format in formats {
            let uri = format!("{}.{}", canonical, format);
            push_unique(&mut uris.combined, uri.clone());
            push_unique(&mut uris.formats, uri);
        }
        for language in languages {
            let uri = format!("{}.{}", canonical, language);
            push_unique(&mut uris.combined, uri.clone());
            push_unique(&mut uris.languages, uri);
        }
        for view in [&mut uris.combined, &mut uris.formats, &mut uris.languages] {
            push_unique(view, canonical.to_owned());
        }

        uris
    }

    pub fn combined(&self) -> &[String] {
        &self.combined
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

fn push_unique(uris: &mut Vec<String>, uri: String) {
    if !uris.contains(&uri) {
        uris.push(uri);
    }
}
