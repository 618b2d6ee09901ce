// src/lib.rs
// =============================================================================
// sitemap-crawler: crawl a site from "/" and write categorised sitemaps.
//
// Data flow:
//   crawl::traverse -> flat urlset XML -> sitemap::categorize
//                   -> fragments -> sitemap::write_sitemaps -> disk
//
// Quick use:
//   let options = CrawlOptions::new("https://example.com", "public");
//   sitemap_crawler::crawl(options).await;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod logging;
pub mod sitemap;

pub use crawl::{
    crawl, traverse, traverse_with_report, try_crawl, CrawlOptions, CrawlReport, CrawlSummary,
    DateCallback, FetchedPage, Fetcher, HttpFetcher, PageOutcome, PageReport,
};
pub use error::SitemapError;
pub use extract::extract_links;
pub use sitemap::{categorize, write_sitemaps, CategorisedSitemap, Category};
