//! Default-server selection

use crate::types::ExtractionResult;
use url::Url;

/// Whether `url`'s host is, or is a subdomain of, one of `preferred_hosts`
pub fn is_preferred(url: &str, preferred_hosts: &[String]) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };

    preferred_hosts.iter().any(|signature| {
        let signature = signature.trim().to_ascii_lowercase();
        !signature.is_empty()
            && (host == signature || host.ends_with(&format!(".{}", signature)))
    })
}

/// Pick the default among successful results.
///
/// The first success on a preferred host wins; otherwise the first success
/// in request order; `None` when nothing succeeded.
pub fn select_default<'a>(
    results: &'a [ExtractionResult],
    preferred_hosts: &[String],
) -> Option<&'a ExtractionResult> {
    let mut successes = results.iter().filter(|r| r.is_success());
    let first = successes.clone().next();

    successes
        .find(|r| r.url().is_some_and(|url| is_preferred(url, preferred_hosts)))
        .or(first)
}
