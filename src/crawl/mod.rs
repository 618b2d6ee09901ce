// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling and ties it to sitemap output.
//
// Features:
// - Sequential crawl starting from the root path "/"
// - Only internal links are followed (see extract::extract_links)
// - Every link is visited at most once, so cyclic sites terminate
// - One failing page never stops the crawl
//
// Submodules:
// - fetch: the Fetcher trait and the reqwest implementation
// - queue: frontier + visited set
// - traverse: the crawl loop and its per-page report
// =============================================================================

mod fetch;
mod queue;
mod traverse;

use std::path::PathBuf;
use tracing::error;

use crate::error::SitemapError;
use crate::sitemap::{write_sitemaps, Category, EmitSummary};

pub use fetch::{FetchedPage, Fetcher, HttpFetcher, DEFAULT_USER_AGENT};
pub use queue::{VisitQueue, ROOT_LINK};
pub use traverse::{
    traverse, traverse_with_report, CrawlOutcome, CrawlReport, DateCallback, PageOutcome,
    PageReport,
};

/// Everything one crawl-and-write run needs
pub struct CrawlOptions {
    /// Site origin without trailing slash, e.g. "https://example.com"
    pub base_url: String,
    /// Output directory, created if missing
    pub output_path: PathBuf,
    pub categories: Vec<Category>,
    pub date_callback: Option<DateCallback>,
}

impl CrawlOptions {
    pub fn new(base_url: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        CrawlOptions {
            base_url: base_url.into(),
            output_path: output_path.into(),
            categories: Vec::new(),
            date_callback: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_date_callback(mut self, callback: DateCallback) -> Self {
        self.date_callback = Some(callback);
        self
    }
}

/// Outcome of a full run: what was crawled and what was written
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub report: CrawlReport,
    pub emitted: EmitSummary,
}

// Crawls the site, then writes the sitemap files
//
// Crawling and writing never interleave: every page is fetched first.
pub async fn try_crawl<F>(fetcher: &F, options: &CrawlOptions) -> Result<CrawlSummary, SitemapError>
where
    F: Fetcher + ?Sized,
{
    let outcome = traverse_with_report(
        fetcher,
        &options.base_url,
        &options.categories,
        options.date_callback.as_ref(),
    )
    .await;

    let emitted = write_sitemaps(&outcome.sitemaps, &options.base_url, &options.output_path)?;

    Ok(CrawlSummary {
        report: outcome.report,
        emitted,
    })
}

// Fire-and-forget entry point: errors are logged, never returned
pub async fn crawl(options: CrawlOptions) {
    let result = match HttpFetcher::new() {
        Ok(fetcher) => try_crawl(&fetcher, &options).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(base_url = %options.base_url, error = %e, "Sitemap generation failed");
    }
}
