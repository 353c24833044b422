//! Page-Mirror: a chapter/page mirror for dynamically rendered sites
//!
//! This crate renders every page of a chapter range through a headless browser,
//! extracts the images each page references (or keeps the rendered markup
//! itself) and stores the artifacts under a deterministic folder layout.

pub mod address;
pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod retry;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Page-Mirror operations
///
/// Render and download failures never surface here; they end up as the
/// status of the page or resource they belong to.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Address template error: {0}")]
    Template(#[from] TemplateError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::ResourceStatus,
        to: state::ResourceStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid address template: {0}")]
    InvalidTemplate(#[from] TemplateError),
}

/// Address template errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("Template does not produce an absolute URL: {0}")]
    NotAbsolute(String),
}

/// Result type alias for Page-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use address::{Address, AddressTemplate};
pub use config::{Config, Mode};
pub use crawler::{run_mirror, ChapterResult, Orchestrator, TerminationReason};
pub use state::{RenderStatus, ResourceStatus};
