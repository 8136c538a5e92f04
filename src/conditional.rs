//! `If-Match` / `If-None-Match` predicates.
//!
//! Choosing between 304 and 412 is left to the resource.

const WILDCARD: &str = "*";

/// Splits an etag list header, dropping the quotes around each etag.
pub fn parse_etags(header: &str) -> Vec<String> {
    header
        .replace('"', "")
        .split(',')
        .map(str::trim)
        .filter(|etag| !etag.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn if_match(tokens: &[String], etag: &str) -> bool {
    if starts_with_wildcard(tokens) {
        return true;
    }
    tokens.iter().any(|token| token == etag)
}

/// Note the wildcard check is made against the `If-Match` tokens: a request
/// carrying `If-Match: *` never satisfies `If-None-Match`.
pub fn if_none_match(
    if_match_tokens: &[String],
    if_none_match_tokens: &[String],
    etag: &str,
) -> bool {
    if starts_with_wildcard(if_match_tokens) {
        return false;
    }
    if_none_match_tokens.iter().any(|token| token == etag)
}

fn starts_with_wildcard(tokens: &[String]) -> bool {
    tokens.first().is_some_and(|token| token == WILDCARD)
}
