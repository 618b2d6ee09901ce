// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Merge them with the optional config file
// 3. Crawl the site and write the sitemap files
// 4. Print a summary and exit with a proper code
//    (0 = sitemaps written, 1 = nothing could be indexed, 2 = error)
//
// Rust concepts used:
// - async/await: the crawl and the date callbacks are async
// - Box<dyn Fn>: the date callback is a boxed closure chosen at runtime
// - Option::or: "flag if given, else config file value"
// =============================================================================

// Module declarations - only the CLI lives in the binary, the rest is the library
mod cli;           // src/cli.rs - command-line parsing

// anyhow::Result lets us return any error type with the ? operator
// Context adds a human-readable message on top of an error
use anyhow::{Context, Result};
use clap::Parser;  // Parser trait enables the parse() method
use futures::FutureExt;  // .boxed() turns an async block into a BoxFuture
use std::path::Path;
use std::time::Duration;

use cli::{Cli, Commands};
use sitemap_crawler::config::{load_categories, CrawlConfig};
use sitemap_crawler::logging::init_logging;
use sitemap_crawler::sitemap::xml::current_date;
use sitemap_crawler::{
    try_crawl, CrawlOptions, CrawlReport, DateCallback, HttpFetcher, PageOutcome,
};

// The #[tokio::main] attribute creates a tokio runtime and runs our async main in it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Anything that stopped the run (bad URL, bad config, unwritable
            // output) ends up here. {:#} prints the whole error chain
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = sitemaps written, at least one page indexed
//   Ok(1) = sitemaps written, but no page could be indexed
//   Err = the run could not happen at all (exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Logs go to stderr so the table / JSON on stdout stays clean
    init_logging(cli.verbose);

    // Match on which subcommand was used (only `crawl` for now)
    match cli.command {
        Commands::Crawl {
            base_url,
            output,
            categories,
            config,
            lastmod,
            date_format,
            timeout,
            user_agent,
            report,
            json,
        } => {
            // Flags override whatever the config file says
            let mut settings = match config {
                Some(path) => CrawlConfig::from_file(&path)?,
                None => CrawlConfig::default(),
            };
            if base_url.is_some() {
                settings.base_url = base_url;
            }
            if output.is_some() {
                settings.output_path = output;
            }
            if let Some(path) = categories {
                settings.categories = load_categories(&path)?;
            }
            settings.lastmod = lastmod.or(settings.lastmod);
            settings.date_format = date_format.or(settings.date_format);
            settings.timeout_secs = timeout.or(settings.timeout_secs);
            settings.user_agent = user_agent.or(settings.user_agent);

            handle_crawl(settings, report.as_deref(), json).await
        }
    }
}

// Handles the 'crawl' subcommand
// Parameters:
//   settings: config file values with the flags already merged in
//   report_path: where to write the per-page JSON report, if anywhere
//   json: whether to print the report as JSON instead of a table
async fn handle_crawl(settings: CrawlConfig, report_path: Option<&Path>, json: bool) -> Result<i32> {
    // Validate everything we can before the first request goes out
    let base_url = settings.base_url()?;
    let output_path = settings.output_path();
    let lastmod_source = date_callback(&settings)?;

    println!("🔍 Crawling website: {}", base_url);
    println!("📁 Output directory: {}", output_path.display());
    if !settings.categories.is_empty() {
        println!("🗂️  Categories: {}", settings.categories.len());
    }

    // Build the HTTP client once; it is reused for every page
    let fetcher = HttpFetcher::with_options(
        settings
            .user_agent
            .as_deref()
            .unwrap_or(sitemap_crawler::crawl::DEFAULT_USER_AGENT),
        settings.timeout_secs.map(Duration::from_secs),
    )?;

    // Builder-style options: categories always, date callback only if one was asked for
    let mut options = CrawlOptions::new(base_url, output_path)
        .with_categories(settings.categories.clone());
    if let Some(callback) = lastmod_source {
        options = options.with_date_callback(callback);
    }

    // Crawl, categorise and write the files
    // Page failures are in the report; only emit failures come back as Err
    let summary = try_crawl(&fetcher, &options).await?;

    // Optionally save the report for later inspection (e.g. in CI)
    if let Some(path) = report_path {
        let text = serde_json::to_string_pretty(&summary.report)?;
        std::fs::write(path, text)
            .with_context(|| format!("Could not write report to {}", path.display()))?;
        println!("📝 Report written to {}", path.display());
    }

    // Print results in the requested format
    print_report(&summary.report, json)?;

    println!("\n📄 Wrote {} sitemap file(s)", summary.emitted.files.len());
    println!("🗺️  Index: {}", summary.emitted.index_path.display());

    // An empty sitemap usually means the base URL is wrong or the site is down
    if summary.report.indexed() == 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Picks the lastmod source for every page
//
// A fixed --lastmod wins over --date-format; neither means the library default.
// A date format chrono cannot render is rejected here, before crawling.
fn date_callback(settings: &CrawlConfig) -> Result<Option<DateCallback>> {
    if let Some(lastmod) = settings.lastmod.clone() {
        // The closure is called once per page, so each call gets its own copy
        let callback: DateCallback = Box::new(move |_url: String| {
            let lastmod = lastmod.clone();
            async move { Ok::<_, anyhow::Error>(lastmod) }.boxed()
        });
        return Ok(Some(callback));
    }

    let format = match settings.date_format()? {
        Some(format) => format.to_string(),
        None => return Ok(None),
    };
    let callback: DateCallback = Box::new(move |_url: String| {
        let date = current_date(&format);
        async move { date }.boxed()
    });
    Ok(Some(callback))
}

// Prints the per-page report as JSON or as a human-readable table
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a formatted table
fn print_table(report: &CrawlReport) {
    println!();
    // Print header with fixed-width columns
    // {:<60} means "left-align in 60 characters"
    println!("{:<60} {:<8} {:<30}", "URL", "STATUS", "OUTCOME");
    println!("{}", "=".repeat(98));

    for page in &report.pages {
        // Truncate long URLs so the columns line up
        // (count chars, not bytes, so non-ASCII URLs cannot split a character)
        let url_display = if page.url.chars().count() > 57 {
            format!("{}...", page.url.chars().take(57).collect::<String>())
        } else {
            page.url.clone()
        };
        let status = page
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{:<60} {:<8} {:<30}", url_display, status, format_outcome(&page.outcome));
    }

    // Print summary statistics
    println!();
    println!("📊 Summary:");
    println!("   ✅ Indexed: {}", report.indexed());
    println!("   ⏭️  Skipped: {}", report.visited() - report.indexed() - report.failed());
    println!("   ❌ Failed: {}", report.failed());
    println!("   📋 Visited: {}", report.visited());
}

// Formats a page outcome with an emoji for the table
fn format_outcome(outcome: &PageOutcome) -> String {
    match outcome {
        PageOutcome::Indexed { lastmod } => format!("✅ INDEXED ({})", lastmod),
        PageOutcome::NoIndex => "🚫 NOINDEX".to_string(),
        PageOutcome::NonSuccessStatus => "⏭️  NOT 2XX".to_string(),
        PageOutcome::DateFailed { .. } => "📅 NO DATE".to_string(),
        PageOutcome::FetchFailed { .. } => "❌ FETCH FAILED".to_string(),
    }
}
