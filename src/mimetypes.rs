use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_MIMETYPES: Vec<(&'static str, &'static str)> = vec![
        ("html", "text/html"),
        ("txt", "text/plain"),
        ("php", "application/php"),
        ("css", "text/css"),
        ("js", "application/javascript"),
        ("json", "application/json"),
        ("xml", "text/xml"),
        ("rss", "application/rss+xml"),
        ("atom", "application/atom+xml"),
        ("gz", "application/x-gzip"),
        ("tar", "application/x-tar"),
        ("zip", "application/zip"),
        ("gif", "image/gif"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("ico", "image/x-icon"),
        ("swf", "application/x-shockwave-flash"),
        ("flv", "video/x-flv"),
        ("avi", "video/mpeg"),
        ("mpeg", "video/mpeg"),
        ("mpg", "video/mpeg"),
        ("mov", "video/quicktime"),
        ("mp3", "audio/mpeg"),
    ];
}

/// Ordered extension to mimetype table.
///
/// Order matters for [`MimeTypes::extension`]: several extensions may share a
/// mimetype and the first one registered is the one a negotiated format
/// resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTypes(Vec<(String, String)>);

impl MimeTypes {
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (ext, mimetype) in overrides {
            table.insert(ext.into().to_lowercase(), mimetype.into().to_lowercase());
        }
        table
    }

    fn insert(&mut self, ext: String, mimetype: String) {
        if let Some(entry) = self.0.iter_mut().find(|entry| entry.0 == ext) {
            entry.1 = mimetype;
        } else {
            self.0.push((ext, mimetype));
        }
    }

    pub fn mimetype(&self, ext: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(e, _)| e == ext)
            .map(|(_, mimetype)| mimetype.as_str())
    }

    pub fn extension(&self, mimetype: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, m)| m == mimetype)
            .map(|(ext, _)| ext.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for MimeTypes {
    fn default() -> Self {
        Self(
            DEFAULT_MIMETYPES
                .iter()
                .map(|(ext, mimetype)| (ext.to_string(), mimetype.to_string()))
                .collect(),
        )
    }
}
