//! Request type definitions
//!
//! Query parameters accepted by the play endpoint.

use super::serde_helpers::deserialize_optional_u32;
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/{source}/play/{slug}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayQuery {
    /// Episode number; omitted for movies
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub ep: Option<u32>,
}

impl PlayQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_episode(mut self, episode: u32) -> Self {
        self.ep = Some(episode);
        self
    }
}
