// src/sitemap/xml.rs
// =============================================================================
// The sitemap protocol documents, as plain text.
//
// Every document we write is built by string concatenation from the constants
// below. The categorizer later re-reads these strings with regexes, so the
// exact tag shapes here are part of the contract between the two.
//
// Shapes produced:
//   <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//   <url>
//       <loc>https://example.com/about</loc>
//       <lastmod>14.10.2026</lastmod>
//   </url>
//   </urlset>
// =============================================================================

use anyhow::{anyhow, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt::Write;

/// File name of the index document at the root of the output directory
pub const MAIN_XML_FILE: &str = "sitemap.xml";

pub const SITEMAP_PREFIX: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n";
pub const SITEMAP_POSTFIX: &str = "</urlset>";

// The urlset opening tag on its own, as the categorizer strips it
pub const URLSET_OPEN: &str = "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n";

pub const MAIN_SITEMAP_PREFIX: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">";
pub const MAIN_SITEMAP_POSTFIX: &str = "</sitemapindex>";

/// lastmod written on every index reference
pub const INDEX_LASTMOD: &str = "2024-09-06";

/// chrono format used for <lastmod> when no date callback is supplied (day.month.year)
pub const DEFAULT_LASTMOD_FORMAT: &str = "%d.%m.%Y";

/// Name of the single fragment produced when no categories are configured
pub fn default_fragment_name() -> &'static str {
    MAIN_XML_FILE.trim_end_matches(".xml")
}

// Renders one <url> block, with its leading newline
pub fn render_url(loc: &str, lastmod: &str) -> String {
    format!(
        "\n<url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n</url>",
        loc, lastmod
    )
}

// Renders one <sitemap> reference block for the index document
pub fn render_index_ref(loc: &str, lastmod: &str) -> String {
    format!(
        "\n  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>",
        loc, lastmod
    )
}

// Today's date rendered with a chrono format string
//
// chrono only finds out a format is bad while rendering, so this goes through
// write! and turns the fmt::Error into a real error instead of a panic.
pub fn current_date(format: &str) -> Result<String> {
    let mut date = String::new();
    write!(date, "{}", Local::now().format(format))
        .map_err(|_| anyhow!("invalid date format '{}'", format))?;
    Ok(date)
}

/// True when every specifier in `format` is one chrono understands
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// The flat sitemap accumulated during a crawl.
///
/// Grows monotonically: entries are appended and never removed.
#[derive(Debug, Clone)]
pub struct FlatSitemap {
    data: String,
    entries: usize,
}

impl FlatSitemap {
    pub fn new() -> Self {
        FlatSitemap {
            data: SITEMAP_PREFIX.to_string(),
            entries: 0,
        }
    }

    pub fn push(&mut self, loc: &str, lastmod: &str) {
        self.data.push_str(&render_url(loc, lastmod));
        self.entries += 1;
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Closes the urlset envelope and hands back the document text
    pub fn finish(mut self) -> String {
        self.data.push('\n');
        self.data.push_str(SITEMAP_POSTFIX);
        self.data
    }
}

impl Default for FlatSitemap {
    fn default() -> Self {
        Self::new()
    }
}
