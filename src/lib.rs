//! Embed Resolver
//!
//! Resolves the playable embed URL behind every streaming server of a movie
//! or episode page. Play pages inject their player iframe with client-side
//! script, so each server is rendered in a shared headless Chromium and the
//! embed is pulled out of the final DOM.
//!
//! # Architecture
//!
//! - **browser**: one lazily launched, shared browser and isolated page contexts
//! - **extract**: render a page, locate the player iframe and normalize its URL
//! - **resolver**: fan out over servers concurrently and choose a default
//! - **server**: the HTTP API in front of the resolver
//!
//! # Usage
//!
//! ```bash
//! embed-resolver --port 3000 --host 0.0.0.0
//! curl 'http://localhost:3000/api/rebahin/play/some-movie-2025?ep=2'
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use embed_resolver::{MultiServerResolver, Settings, types::Source};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let resolver = MultiServerResolver::new(&settings);
//! let report = resolver
//!     .resolve(Source::Rebahin, "some-movie-2025", Some(1), &[1, 2, 3])
//!     .await?;
//! println!("default: {:?}", report.default_url);
//! resolver.session().shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod resolver;
pub mod server;
pub mod types;
pub mod utils;

pub use browser::BrowserSession;
pub use config::Settings;
pub use error::{Error, Result};
pub use extract::{EmbedExtractor, normalize};
pub use resolver::MultiServerResolver;
pub use types::{ErrorResponse, PingResponse, PlayResponse, ResolutionReport};
