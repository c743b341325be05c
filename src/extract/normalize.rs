//! Embed URL normalization
//!
//! Some players sit behind a thin wrapper page whose only payload is a
//! base64-encoded `source` query parameter holding the real destination.
//! Normalization unwraps that parameter when it decodes to an absolute
//! HTTP(S) URL and otherwise leaves the URL alone. It never fails.

use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use url::Url;

/// Query parameter carrying the encoded destination
pub const SOURCE_PARAM: &str = "source";

/// Normalize a raw embed URL.
///
/// Protocol-relative URLs get an `https:` scheme. Wrapped destinations are
/// unwrapped repeatedly, so normalizing twice is the same as normalizing once.
pub fn normalize(raw_url: &str) -> String {
    let mut current = fix_protocol_relative(raw_url.trim());

    // Each unwrap yields a strictly shorter string, so this terminates
    while let Some(decoded) = decode_source_param(&current) {
        tracing::debug!("Decoded source param: {}", decoded);
        current = decoded;
    }

    current
}

/// Prefix protocol-relative URLs with `https:`
pub fn fix_protocol_relative(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

/// Decode the `source` parameter if it holds an absolute HTTP(S) URL
fn decode_source_param(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let (_, value) = parsed.query_pairs().find(|(key, _)| key == SOURCE_PARAM)?;

    let decoded = match decode_base64(value.trim()) {
        Some(decoded) => decoded,
        None => {
            tracing::debug!("Could not decode source parameter, using original URL");
            return None;
        }
    };

    let decoded = decoded.trim();
    is_absolute_http(decoded).then(|| decoded.to_string())
}

fn decode_base64(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(value).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Whether `candidate` is a syntactically valid absolute HTTP(S) URL
pub fn is_absolute_http(candidate: &str) -> bool {
    candidate == candidate.trim()
        && Url::parse(candidate)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .unwrap_or(false)
}
