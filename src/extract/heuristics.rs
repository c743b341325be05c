//! Embed URL heuristics over a rendered document
//!
//! Play-page markup differs between sites and templates, so candidates are
//! searched with an ordered list of strategies; the first strategy that
//! yields a `src` wins.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// A named, pure search over a parsed document
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub find: fn(&Html) -> Option<String>,
}

/// Strategies in priority order
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "reserved-iframe-id",
        find: reserved_iframe,
    },
    Strategy {
        name: "first-non-social-iframe",
        find: first_non_social_iframe,
    },
    Strategy {
        name: "player-container",
        find: player_container_iframe,
    },
];

/// Substrings that mark sharing widgets rather than players
pub const SOCIAL_DENYLIST: &[&str] = &["facebook", "twitter", "share"];

/// Placeholder sources that never point at a player
const NON_NAVIGABLE: &[&str] = &["about:", "javascript:", "data:"];

/// Player wrappers checked by the last-resort strategy, in order
pub const PLAYER_CONTAINERS: &[&str] = &[
    "#player iframe",
    ".player iframe",
    "#pembed iframe",
    ".video-container iframe",
    ".embed-responsive iframe",
];

static RESERVED_IFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#iframe-embed").expect("static selector"));

static ANY_IFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe").expect("static selector"));

static CONTAINER_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    PLAYER_CONTAINERS
        .iter()
        .map(|s| Selector::parse(s).expect("static selector"))
        .collect()
});

fn src_of(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter(|src| {
            let lower = src.to_ascii_lowercase();
            !NON_NAVIGABLE.iter().any(|scheme| lower.starts_with(scheme))
        })
        .map(str::to_string)
}

/// The element with the reserved `iframe-embed` id
pub fn reserved_iframe(document: &Html) -> Option<String> {
    document.select(&RESERVED_IFRAME).next().and_then(src_of)
}

/// The first iframe whose source is not a social sharing widget
pub fn first_non_social_iframe(document: &Html) -> Option<String> {
    document
        .select(&ANY_IFRAME)
        .filter_map(src_of)
        .find(|src| !SOCIAL_DENYLIST.iter().any(|deny| src.contains(deny)))
}

/// The first iframe inside a known player container
pub fn player_container_iframe(document: &Html) -> Option<String> {
    CONTAINER_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next().and_then(src_of))
}

/// Run every strategy in order, returning the first hit and its strategy name
pub fn find_embed(document: &Html) -> Option<(&'static str, String)> {
    STRATEGIES
        .iter()
        .find_map(|strategy| (strategy.find)(document).map(|src| (strategy.name, src)))
}
