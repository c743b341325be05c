//! Configuration management for the embed resolver
//!
//! This module handles loading and managing configuration settings
//! for the HTTP server, the headless browser and the resolver.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{
    BrowserSettings, LoggingSettings, ResolverSettings, ServerSettings, Settings, SourceSettings,
};
