// src/error.rs
// =============================================================================
// Error types for the library side of the crate.
//
// Most failures during a crawl never get this far: a page that cannot be
// fetched is logged and skipped. What is left here are the failures that stop
// a whole run, like a bad base URL or a directory we cannot write to.
//
// The binary (main.rs) wraps these in anyhow::Error, the library keeps them
// typed so callers can match on them.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    /// The base URL is not an absolute http(s) origin
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Reading or writing a sitemap file (or its directory) failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A config or categories file could not be used
    #[error("Config error: {0}")]
    Config(String),

    /// A config or categories file is not valid JSON for its type
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SitemapError {
    // Helper so call sites can write .map_err(|e| SitemapError::io(&path, e))
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SitemapError::Io {
            path: path.into(),
            source,
        }
    }
}
