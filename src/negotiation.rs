//! Parsing of the `Accept` header family into preference lists.

pub const MAX_WEIGHT: u8 = 10;

/// Tokens ordered by descending weight. Tokens of equal weight keep the order
/// in which they appeared in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceList(Vec<(String, u8)>);

impl PreferenceList {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> + '_ {
        self.0.iter().map(|(token, weight)| (token.as_str(), *weight))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|(token, _)| token.as_str())
    }

    pub fn first(&self) -> Option<&str> {
        self.tokens().next()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Places `forced` ahead of everything else at the highest weight.
    pub(crate) fn with_forced(self, forced: &[String]) -> Self {
        let mut items: Vec<_> = forced
            .iter()
            .map(|token| (token.clone(), MAX_WEIGHT))
            .collect();
        items.extend(self.0);
        Self(items)
    }
}

/// Parses a quality weighted header such as `text/html;q=0.8,application/json`.
///
/// Parameters other than `q` are ignored. `resolver` maps the bare header
/// token to the token stored in the list; tokens it rejects are dropped.
pub fn parse_weighted<F>(header: &str, resolver: F) -> PreferenceList
where
    F: Fn(&str) -> Option<String>,
{
    let header = header.to_lowercase();
    let mut items: Vec<(String, u8)> = header
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| {
            let mut parts = item.split(';').map(str::trim);
            let token = parts.next().unwrap_or_default();
            let quality = parts.find_map(|param| param.strip_prefix("q="));
            resolver(token).map(|token| (token, weight(quality)))
        })
        .collect();

    // stable, so equal weights keep header order
    items.sort_by(|(_, l), (_, r)| r.cmp(l));
    PreferenceList(items)
}

/// Splits a header on `,` keeping the literal order of its tokens.
pub fn parse_ordered(header: &str) -> Vec<String> {
    header
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

fn weight(quality: Option<&str>) -> u8 {
    let Some(Ok(quality)) = quality.map(|q| q.parse::<f64>()) else {
        return MAX_WEIGHT;
    };
    if !quality.is_finite() {
        return MAX_WEIGHT;
    }
    (quality * 10.0).trunc().clamp(0.0, MAX_WEIGHT as f64) as u8
}
