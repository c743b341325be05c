//! Multi-server embed resolution
//!
//! Runs the embed extractor against several servers of the same play page
//! concurrently and chooses which one to offer as the default.

pub mod multi_server;
pub mod policy;

pub use multi_server::{MultiServerResolver, MultiServerResolverGeneric};
pub use policy::{is_preferred, select_default};
