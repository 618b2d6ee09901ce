// src/sitemap/mod.rs
// =============================================================================
// This module turns the crawl result into sitemap files.
//
// Submodules:
// - xml: document constants and the <url> / <sitemap> block shapes
// - category: splits the flat sitemap into named fragments
// - emit: writes the fragments and the index document to disk
//
// Data flows one way: flat XML -> categorize() -> fragments -> write_sitemaps()
// =============================================================================

mod category;
mod emit;
pub mod xml;

pub use category::{categorize, CategorisedSitemap, Category};
pub use emit::{write_sitemaps, EmitSummary};
pub use xml::FlatSitemap;
