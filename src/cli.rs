// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use clap's "derive" API: the CLI is described by the structs below and
// clap generates the parsing, --help and --version for us.
//
// There is one subcommand today, `crawl`. Every flag is optional except the
// base URL, which can also come from a --config file.
//
// Rust concepts:
// - Option<T>: a flag the user may leave out (None = not given)
// - PathBuf: an owned file system path, parsed straight from the argument
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to generate the parsing code
// The #[command(...)] attributes configure name, version and help text
#[derive(Parser, Debug)]
#[command(
    name = "sitemap-crawler",
    version,
    about = "Crawl a website and write sitemap files",
    long_about = "sitemap-crawler starts at the root of a website, follows every internal link it can find \
                  and writes sitemap.xml plus one sitemap per category."
)]
pub struct Cli {
    /// Show debug-level logs
    ///
    /// global = true means it is accepted before or after the subcommand
    #[arg(long, short, global = true)]
    pub verbose: bool,

    // Holds whichever subcommand the user picked
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands
//
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and write its sitemaps
    ///
    /// Example: sitemap-crawler crawl https://example.com --output public --categories categories.json
    Crawl {
        /// Site origin without trailing slash (e.g., https://example.com)
        ///
        /// Optional when the --config file sets base_url
        ///
        /// This is a positional argument (no flag needed)
        base_url: Option<String>,

        /// Output directory for sitemap.xml and the category sitemaps
        ///
        /// #[arg(long, short)] accepts both --output and -o
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// JSON file with an array of categories
        /// ({"include": "...", "exclude": "...", "label": "...", "path": "..."})
        #[arg(long)]
        categories: Option<PathBuf>,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use this lastmod for every page instead of today's date
        #[arg(long)]
        lastmod: Option<String>,

        /// chrono format string for today's date (default: %d.%m.%Y)
        #[arg(long)]
        date_format: Option<String>,

        /// Per-request timeout in seconds (default: wait forever)
        #[arg(long)]
        timeout: Option<u64>,

        /// User-Agent header sent with every request
        #[arg(long)]
        user_agent: Option<String>,

        /// Write a per-page JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the per-page report as JSON instead of a table
        ///
        /// A bool field becomes a flag that takes no value: --json
        #[arg(long)]
        json: bool,
    },
}
