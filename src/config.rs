// src/config.rs
// =============================================================================
// Run configuration: where to crawl, where to write, how to categorise.
//
// Sources, lowest priority first:
// 1. Built-in defaults (output "./sitemaps", no categories)
// 2. An optional JSON config file (--config)
// 3. Command-line flags
//
// Example config file:
//   {
//     "base_url": "https://example.com",
//     "output_path": "public",
//     "categories": [
//       { "include": "/blog/", "label": "blog", "path": "blog" },
//       { "include": ".*", "exclude": "/blog/", "label": "pages", "path": "" }
//     ]
//   }
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::SitemapError;
use crate::sitemap::xml::is_valid_date_format;
use crate::sitemap::Category;

pub const DEFAULT_OUTPUT_PATH: &str = "./sitemaps";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub base_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub categories: Vec<Category>,
    /// Fixed lastmod for every page instead of today's date
    pub lastmod: Option<String>,
    /// chrono format for today's date
    pub date_format: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CrawlConfig {
    pub fn from_file(path: &Path) -> Result<Self, SitemapError> {
        read_json(path)
    }

    /// Output directory, falling back to the default
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    }

    /// The validated base URL
    pub fn base_url(&self) -> Result<String, SitemapError> {
        match &self.base_url {
            Some(url) => normalize_base_url(url),
            None => Err(SitemapError::Config("no base URL given".to_string())),
        }
    }

    /// The date format, rejected up front if chrono cannot render it
    pub fn date_format(&self) -> Result<Option<&str>, SitemapError> {
        match self.date_format.as_deref() {
            Some(format) if !is_valid_date_format(format) => Err(SitemapError::Config(format!(
                "invalid date format '{}'",
                format
            ))),
            format => Ok(format),
        }
    }
}

// Loads a JSON array of categories
pub fn load_categories(path: &Path) -> Result<Vec<Category>, SitemapError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SitemapError> {
    let text = fs::read_to_string(path).map_err(|e| SitemapError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| SitemapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// Checks that the base URL is a bare http(s) origin and drops trailing slashes
//
// Examples:
//   "https://example.com/"     -> Ok("https://example.com")
//   "example.com"              -> Err (no scheme)
//   "ftp://example.com"        -> Err (not http/https)
//   "https://example.com/blog" -> Err (links are joined onto the origin)
pub fn normalize_base_url(raw: &str) -> Result<String, SitemapError> {
    let invalid = |reason: &str| SitemapError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("URL must be an origin without path, query or fragment"));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
