//! Play target definitions
//!
//! A play target names exactly one play page: a content slug, an optional
//! episode and the server index the site should render.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Supported streaming aggregator sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rebahin,
    Kitanonton,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Rebahin, Source::Kitanonton];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Rebahin => "rebahin",
            Source::Kitanonton => "kitanonton",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rebahin" => Ok(Source::Rebahin),
            "kitanonton" => Ok(Source::Kitanonton),
            other => Err(crate::Error::invalid_request(format!(
                "Unknown source: {}",
                other
            ))),
        }
    }
}

/// One (content, episode, server) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayTarget {
    content_slug: String,
    episode: Option<u32>,
    server_index: u32,
}

impl PlayTarget {
    /// Build a validated target.
    ///
    /// Slugs are a single path segment; episode and server numbers start at 1.
    pub fn new(
        content_slug: impl Into<String>,
        episode: Option<u32>,
        server_index: u32,
    ) -> crate::Result<Self> {
        let content_slug = content_slug.into();
        validate_slug(&content_slug)?;

        if episode == Some(0) {
            return Err(crate::Error::invalid_request("Episode numbers start at 1"));
        }
        if server_index == 0 {
            return Err(crate::Error::invalid_request("Server indices start at 1"));
        }

        Ok(Self {
            content_slug,
            episode,
            server_index,
        })
    }

    pub fn content_slug(&self) -> &str {
        &self.content_slug
    }

    pub fn episode(&self) -> Option<u32> {
        self.episode
    }

    pub fn server_index(&self) -> u32 {
        self.server_index
    }

    /// Play-page URL on the given site: `<base>/nonton-<slug>/play/?ep=<n>&sv=<n>`
    pub fn play_url(&self, base_url: &str) -> crate::Result<Url> {
        let mut url = Url::parse(base_url)?;
        url.set_query(None);
        url.set_fragment(None);
        // Pushed as a segment so the slug can never be read as a scheme or host
        url.path_segments_mut()
            .map_err(|_| {
                crate::Error::invalid_request(format!("Base URL cannot carry a path: {}", base_url))
            })?
            .pop_if_empty()
            .push(&format!("nonton-{}", self.content_slug))
            .push("play")
            .push("");

        {
            let mut query = url.query_pairs_mut();
            if let Some(episode) = self.episode {
                query.append_pair("ep", &episode.to_string());
            }
            query.append_pair("sv", &self.server_index.to_string());
        }
        Ok(url)
    }
}

/// Slugs must be a non-empty single path segment
pub fn validate_slug(slug: &str) -> crate::Result<()> {
    if slug.trim().is_empty() {
        return Err(crate::Error::invalid_request("Content slug must not be empty"));
    }
    if slug.contains(['/', '?', '#', '\\']) || slug == "." || slug == ".." {
        return Err(crate::Error::invalid_request(format!(
            "Content slug is not a single path segment: {}",
            slug
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("gates-of-flesh", Some(2), 3, "https://rebahin.test/nonton-gates-of-flesh/play/?ep=2&sv=3")]
    #[case("gates-of-flesh", None, 1, "https://rebahin.test/nonton-gates-of-flesh/play/?sv=1")]
    #[case("x:y", None, 1, "https://rebahin.test/nonton-x:y/play/?sv=1")]
    #[case("a b", None, 2, "https://rebahin.test/nonton-a%20b/play/?sv=2")]
    fn test_play_url_shape(
        #[case] slug: &str,
        #[case] episode: Option<u32>,
        #[case] server: u32,
        #[case] expected: &str,
    ) {
        let target = PlayTarget::new(slug, episode, server).unwrap();
        let url = target.play_url("https://rebahin.test").unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn test_play_url_keeps_base_path() {
        let target = PlayTarget::new("movie-x", None, 2).unwrap();
        let url = target.play_url("https://mirror.test/site").unwrap();
        assert_eq!(url.as_str(), "https://mirror.test/site/nonton-movie-x/play/?sv=2");

        let url = target.play_url("https://mirror.test/site/?ref=home").unwrap();
        assert_eq!(url.as_str(), "https://mirror.test/site/nonton-movie-x/play/?sv=2");
    }

    #[rstest]
    #[case("", None, 1)]
    #[case("a/b", None, 1)]
    #[case("..", None, 1)]
    #[case("movie", Some(0), 1)]
    #[case("movie", None, 0)]
    fn test_invalid_targets(
        #[case] slug: &str,
        #[case] episode: Option<u32>,
        #[case] server: u32,
    ) {
        let err = PlayTarget::new(slug, episode, server).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidRequest(_)));
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("rebahin".parse::<Source>().unwrap(), Source::Rebahin);
        assert_eq!("Kitanonton".parse::<Source>().unwrap(), Source::Kitanonton);
        assert!("netflix".parse::<Source>().is_err());
        assert_eq!(Source::Kitanonton.to_string(), "kitanonton");
    }
}
