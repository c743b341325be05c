//! Type definitions for the embed resolver
//!
//! This module contains the play targets, resolution reports and the
//! request/response bodies of the HTTP API.

pub mod report;
pub mod request;
pub mod response;
pub mod serde_helpers;
pub mod target;

pub use report::{ExtractionResult, Outcome, ResolutionReport};
pub use request::PlayQuery;
pub use response::{ErrorResponse, PingResponse, PlayResponse, ServerEntry};
pub use target::{PlayTarget, Source};
