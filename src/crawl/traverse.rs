// src/crawl/traverse.rs
// =============================================================================
// This module implements the crawl loop itself.
//
// One step of the loop:
// 1. Take the next link from the visit queue (None = done)
// 2. Fetch base_url + link, redirects not followed
// 3. Extract links from the body and merge them into the queue
// 4. If the page is indexable (2xx, no noindex directive), work out its
//    lastmod and append a <url> entry for base_url + link
//
// Failures never stop the crawl:
// - fetch / body errors: the page is skipped and the links it would have
//   contributed are never seen
// - date callback errors: only the <url> entry is skipped, the page's links
//   are already queued
//
// Pages are fetched strictly one at a time.
// =============================================================================

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::fetch::Fetcher;
use super::queue::{VisitQueue, ROOT_LINK};
use crate::extract::{extract_links, is_noindex};
use crate::sitemap::xml::{current_date, DEFAULT_LASTMOD_FORMAT};
use crate::sitemap::{categorize, CategorisedSitemap, Category, FlatSitemap};

/// Async callback that returns the lastmod text for a full page URL
pub type DateCallback =
    Box<dyn Fn(String) -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync>;

/// What happened to one visited link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Added to the sitemap
    Indexed { lastmod: String },
    /// Page carries the noindex,nofollow directive
    NoIndex,
    /// Status code did not start with 2
    NonSuccessStatus,
    /// The date callback failed; links were still queued
    DateFailed { message: String },
    /// Fetching or reading the page failed; its links were lost
    FetchFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    /// Link as it sits in the visit queue
    pub link: String,
    /// base_url + link
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageReport {
    pub fn is_indexed(&self) -> bool {
        matches!(self.outcome, PageOutcome::Indexed { .. })
    }
}

/// Per-page log of a whole crawl, in visit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub pages: Vec<PageReport>,
}

impl CrawlReport {
    pub fn visited(&self) -> usize {
        self.pages.len()
    }

    pub fn indexed(&self) -> usize {
        self.pages.iter().filter(|p| p.is_indexed()).count()
    }

    pub fn failed(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::FetchFailed { .. }))
            .count()
    }
}

/// Result of [`traverse_with_report`]
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub sitemaps: Vec<CategorisedSitemap>,
    pub report: CrawlReport,
}

// Crawls the site and returns the categorised sitemaps
//
// Parameters:
//   fetcher: how pages are fetched
//   base_url: site origin, no trailing slash (e.g. "https://example.com")
//   categories: partition rules, empty for a single flat sitemap
//   date_callback: optional lastmod source, keyed by full page URL
pub async fn traverse<F>(
    fetcher: &F,
    base_url: &str,
    categories: &[Category],
    date_callback: Option<&DateCallback>,
) -> Vec<CategorisedSitemap>
where
    F: Fetcher + ?Sized,
{
    traverse_with_report(fetcher, base_url, categories, date_callback)
        .await
        .sitemaps
}

/// Same crawl as [`traverse`], also returning what happened to every page.
pub async fn traverse_with_report<F>(
    fetcher: &F,
    base_url: &str,
    categories: &[Category],
    date_callback: Option<&DateCallback>,
) -> CrawlOutcome
where
    F: Fetcher + ?Sized,
{
    let mut queue = VisitQueue::new(ROOT_LINK);
    let mut sitemap = FlatSitemap::new();
    let mut report = CrawlReport::default();

    while let Some(link) = queue.next() {
        let url = format!("{}{}", base_url, link);

        let page = match fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping page");
                report.pages.push(PageReport {
                    link,
                    url,
                    status: None,
                    outcome: PageOutcome::FetchFailed {
                        message: format!("{:#}", e),
                    },
                });
                continue;
            }
        };

        queue.merge(extract_links(&page.body, base_url));

        info!("Current URL = {}", link);
        info!("Total URL Count = {}", queue.remaining_after_next());

        let outcome = if is_noindex(&page.body) {
            PageOutcome::NoIndex
        } else if !page.is_success() {
            PageOutcome::NonSuccessStatus
        } else {
            match lastmod_for(&url, date_callback).await {
                Ok(lastmod) => {
                    sitemap.push(&url, &lastmod);
                    PageOutcome::Indexed { lastmod }
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Date callback failed, page left out of sitemap");
                    PageOutcome::DateFailed {
                        message: format!("{:#}", e),
                    }
                }
            }
        };

        debug!(url = %url, status = page.status, ?outcome, "Visited");
        report.pages.push(PageReport {
            link,
            url,
            status: Some(page.status),
            outcome,
        });
    }

    info!(
        visited = report.visited(),
        indexed = sitemap.len(),
        "Crawl finished"
    );

    CrawlOutcome {
        sitemaps: categorize(&sitemap.finish(), categories),
        report,
    }
}

async fn lastmod_for(url: &str, date_callback: Option<&DateCallback>) -> anyhow::Result<String> {
    match date_callback {
        Some(callback) => callback(url.to_string()).await,
        None => current_date(DEFAULT_LASTMOD_FORMAT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fetch::FetchedPage;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use futures::FutureExt;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://x.com";

    // In-memory site: url -> (status, body). Unknown urls fail like a dead host.
    struct FakeSite {
        pages: HashMap<String, (u16, String)>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new(pages: &[(&str, u16, &str)]) -> Self {
            FakeSite {
                pages: pages
                    .iter()
                    .map(|(link, status, body)| {
                        (format!("{}{}", BASE, link), (*status, body.to_string()))
                    })
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for FakeSite {
        async fn fetch(&self, url: &str) -> anyhow::Result<FetchedPage> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some((status, body)) => Ok(FetchedPage::new(*status, body.clone())),
                None => Err(anyhow!("connection refused")),
            }
        }
    }

    fn fixed_date(date: &'static str) -> DateCallback {
        Box::new(move |_url: String| async move { Ok::<_, anyhow::Error>(date.to_string()) }.boxed())
    }

    fn locs(sitemap: &CategorisedSitemap) -> Vec<String> {
        sitemap
            .data
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                line.strip_prefix("<loc>")
                    .and_then(|rest| rest.strip_suffix("</loc>"))
                    .map(str::to_string)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_crawls_every_reachable_page_once() {
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/a">A</a><a href="https://x.com/b">B</a>"#),
            ("/a", 200, r#"<a href="/">Home</a><a href="/b">B</a>"#),
            ("/b", 200, r#"<a href="/a">A</a><a href="/b">self</a>"#),
        ]);

        let outcome = traverse_with_report(&site, BASE, &[], Some(&fixed_date("01.01.2024"))).await;

        assert_eq!(
            site.requests(),
            vec!["https://x.com/", "https://x.com/a", "https://x.com/b"]
        );
        assert_eq!(outcome.report.visited(), 3);
        assert_eq!(outcome.sitemaps.len(), 1);
        assert_eq!(
            locs(&outcome.sitemaps[0]),
            vec!["https://x.com/", "https://x.com/a", "https://x.com/b"]
        );
        assert!(outcome.sitemaps[0].data.contains("<lastmod>01.01.2024</lastmod>"));
    }

    #[tokio::test]
    async fn test_every_location_starts_with_base_url() {
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/docs">Docs</a><a href="//cdn.x.com/x">CDN</a>"#),
            ("/docs", 200, r#"<a href="https://other.com/x">Other</a>"#),
        ]);

        let sitemaps = traverse(&site, BASE, &[], None).await;

        let locations = locs(&sitemaps[0]);
        assert_eq!(locations.len(), 2);
        assert!(locations.iter().all(|loc| loc.starts_with(BASE)));
    }

    #[tokio::test]
    async fn test_noindex_page_is_not_in_sitemap_but_links_are_followed() {
        let site = FakeSite::new(&[
            (
                "/",
                200,
                r#"<meta name="robots" content="noindex,nofollow"><a href="/a">A</a>"#,
            ),
            ("/a", 200, "<p>leaf</p>"),
        ]);

        let outcome = traverse_with_report(&site, BASE, &[], None).await;

        assert_eq!(locs(&outcome.sitemaps[0]), vec!["https://x.com/a"]);
        assert_eq!(outcome.report.pages[0].outcome, PageOutcome::NoIndex);
    }

    #[tokio::test]
    async fn test_non_success_status_is_left_out() {
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/moved">M</a><a href="/gone">G</a>"#),
            ("/moved", 301, r#"<a href="/target">T</a>"#),
            ("/gone", 404, "not found"),
            ("/target", 200, "<p>target</p>"),
        ]);

        let outcome = traverse_with_report(&site, BASE, &[], None).await;

        // The redirect body is scanned, so /target is still discovered
        assert_eq!(
            locs(&outcome.sitemaps[0]),
            vec!["https://x.com/", "https://x.com/target"]
        );
        assert_eq!(outcome.report.pages[1].status, Some(301));
        assert_eq!(outcome.report.pages[1].outcome, PageOutcome::NonSuccessStatus);
        assert_eq!(outcome.report.pages[2].outcome, PageOutcome::NonSuccessStatus);
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_stop_the_crawl() {
        // /foo is not in the fake site, so fetching it errors
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/foo">F</a><a href="/bar">B</a>"#),
            ("/bar", 200, "<p>bar</p>"),
        ]);

        let outcome = traverse_with_report(&site, BASE, &[], None).await;

        assert_eq!(
            locs(&outcome.sitemaps[0]),
            vec!["https://x.com/", "https://x.com/bar"]
        );
        assert_eq!(outcome.report.failed(), 1);
        assert!(matches!(
            outcome.report.pages[1].outcome,
            PageOutcome::FetchFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_date_failure_drops_entry_but_keeps_links() {
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/a">A</a>"#),
            ("/a", 200, "<p>a</p>"),
        ]);
        let callback: DateCallback = Box::new(|url: String| {
            async move {
                if url.ends_with("/a") {
                    Ok("2024-05-01".to_string())
                } else {
                    Err(anyhow!("no date for {}", url))
                }
            }
            .boxed()
        });

        let outcome = traverse_with_report(&site, BASE, &[], Some(&callback)).await;

        assert_eq!(locs(&outcome.sitemaps[0]), vec!["https://x.com/a"]);
        assert!(matches!(
            outcome.report.pages[0].outcome,
            PageOutcome::DateFailed { .. }
        ));
        assert_eq!(outcome.report.indexed(), 1);
    }

    #[tokio::test]
    async fn test_bad_date_format_drops_entries_without_panicking() {
        let site = FakeSite::new(&[("/", 200, r#"<a href="/a">A</a>"#), ("/a", 200, "")]);
        let callback: DateCallback = Box::new(|_url: String| {
            let date = current_date("%Q");
            async move { date }.boxed()
        });

        let outcome = traverse_with_report(&site, BASE, &[], Some(&callback)).await;

        assert_eq!(outcome.report.visited(), 2);
        assert_eq!(outcome.report.indexed(), 0);
        assert!(locs(&outcome.sitemaps[0]).is_empty());
        assert!(matches!(
            outcome.report.pages[1].outcome,
            PageOutcome::DateFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_date_callback_gets_full_url() {
        let site = FakeSite::new(&[("/", 200, r#"<a href="/a">A</a>"#), ("/a", 200, "")]);
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let seen_by_callback = seen.clone();
        let callback: DateCallback = Box::new(move |url: String| {
            seen_by_callback.lock().unwrap().push(url);
            async { Ok::<_, anyhow::Error>("2024-01-01".to_string()) }.boxed()
        });

        traverse(&site, BASE, &[], Some(&callback)).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["https://x.com/".to_string(), "https://x.com/a".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unreachable_root_gives_empty_sitemap() {
        let site = FakeSite::new(&[]);

        let outcome = traverse_with_report(&site, BASE, &[], None).await;

        assert_eq!(outcome.report.visited(), 1);
        assert!(locs(&outcome.sitemaps[0]).is_empty());
        assert!(outcome.sitemaps[0].data.ends_with("</urlset>"));
    }

    #[tokio::test]
    async fn test_categories_are_applied() {
        let site = FakeSite::new(&[
            ("/", 200, r#"<a href="/blog/a">A</a><a href="/about">About</a>"#),
            ("/blog/a", 200, ""),
            ("/about", 200, ""),
        ]);
        let categories = [Category::new("/blog/", "blog", "blog")];

        let sitemaps = traverse(&site, BASE, &categories, Some(&fixed_date("01.01.2024"))).await;

        assert_eq!(sitemaps.len(), 1);
        assert_eq!(sitemaps[0].name, "blog");
        assert_eq!(locs(&sitemaps[0]), vec!["https://x.com/blog/a"]);
    }

    #[test]
    fn test_report_serializes_with_outcome_tag() {
        let report = PageReport {
            link: "/a".to_string(),
            url: "https://x.com/a".to_string(),
            status: Some(200),
            outcome: PageOutcome::Indexed {
                lastmod: "01.01.2024".to_string(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "indexed");
        assert_eq!(json["lastmod"], "01.01.2024");
        assert_eq!(json["status"], 200);
    }
}
