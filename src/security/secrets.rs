//! API key containment.
//!
//! # Responsibilities
//! - Reject requests that carry the key in their own path
//! - Redact the key from upstream response bodies before relay
//! - Redact the key from anything destined for the log
//!
//! # Design Decisions
//! - Detection is a literal substring scan; the key is validated at
//!   startup to be URL-safe, so no encoding variants need checking
//! - Redaction replaces every occurrence, not just the first
//! - Body scans run on raw bytes, independent of UTF-8 validity

/// Marker substituted for the API key wherever it is found.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// True when the request path (or query) contains the literal API key.
/// Such requests are rejected before any upstream contact: a key in the
/// URL would leak through logs and referrers.
pub fn path_contains_key(path_and_query: &str, api_key: &str) -> bool {
    !api_key.is_empty() && path_and_query.contains(api_key)
}

/// Replace every occurrence of the API key in `text` with the redaction
/// marker. Returns the input unchanged when the key does not occur.
pub fn redact_key<'a>(text: &'a str, api_key: &str) -> std::borrow::Cow<'a, str> {
    if api_key.is_empty() || !text.contains(api_key) {
        return std::borrow::Cow::Borrowed(text);
    }
    std::borrow::Cow::Owned(text.replace(api_key, REDACTION_MARKER))
}

/// Redact the key from a raw body. The scan runs over raw bytes, so a
/// body that is invalid UTF-8 elsewhere still has the ASCII key bytes
/// replaced. Clean bodies pass through without copying.
pub fn redact_body(body: axum::body::Bytes, api_key: &str) -> axum::body::Bytes {
    let key = api_key.as_bytes();
    if key.is_empty() || find(&body, key).is_none() {
        return body;
    }

    let mut out = Vec::with_capacity(body.len());
    let mut rest: &[u8] = &body;
    while let Some(pos) = find(rest, key) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(REDACTION_MARKER.as_bytes());
        rest = &rest[pos + key.len()..];
    }
    out.extend_from_slice(rest);
    axum::body::Bytes::from(out)
}

/// First occurrence of `needle` in `haystack`. `needle` must be non-empty.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
