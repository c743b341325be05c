//! Embed extraction
//!
//! Navigates a page context to a play page, waits for the player to be
//! injected, searches the rendered DOM for the embed iframe and unwraps
//! encoded redirect parameters.

pub mod extractor;
pub mod heuristics;
pub mod normalize;

pub use extractor::{EmbedExtractor, extract_from_document};
pub use normalize::normalize;
