// src/sitemap/category.rs
// =============================================================================
// This module splits the flat crawl sitemap into named fragments.
//
// How it works:
// 1. No categories? Hand back the flat document untouched, named "sitemap"
// 2. Otherwise strip the <urlset> envelope and cut the body at every </url>
// 3. Pull <loc> and <lastmod> out of each piece (skip pieces missing either)
// 4. Test each location against every category on its own:
//      include matches AND (no exclude OR exclude does not match)
// 5. The first match creates the category's fragment, later matches append
// 6. Close every fragment with </urlset>
//
// A location can land in several fragments, or in none.
// =============================================================================

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::xml::{
    default_fragment_name, render_url, SITEMAP_POSTFIX, SITEMAP_PREFIX, URLSET_OPEN,
};

static LOC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<loc>([a-zA-Z0-9$\-_.+!*'(),/:]+)</loc>").expect("loc pattern is valid")
});

static LASTMOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<lastmod>([a-zA-Z0-9$\-_.+!*'(),/:]+)</lastmod>")
        .expect("lastmod pattern is valid")
});

const URL_CLOSE: &str = "</url>";

/// One partitioning rule.
///
/// `include` and `exclude` are regular expressions tested against the full
/// location (`https://example.com/blog/post`), unanchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub include: String,
    /// Fragment name, the file is written as `<label>.xml`
    pub label: String,
    /// Output subdirectory, relative to the output path ("" for the root)
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl Category {
    pub fn new(include: &str, label: &str, path: &str) -> Self {
        Category {
            include: include.to_string(),
            label: label.to_string(),
            path: path.to_string(),
            exclude: None,
        }
    }

    pub fn with_exclude(mut self, exclude: &str) -> Self {
        self.exclude = Some(exclude.to_string());
        self
    }
}

/// One output sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorisedSitemap {
    pub name: String,
    pub path: String,
    pub data: String,
}

// A category with its patterns compiled once, up front
struct CompiledCategory<'a> {
    category: &'a Category,
    include: Regex,
    exclude: Option<Regex>,
}

impl<'a> CompiledCategory<'a> {
    fn compile(category: &'a Category) -> Result<Self, regex::Error> {
        let include = Regex::new(&category.include)?;
        let exclude = match category.exclude.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern)?),
            _ => None,
        };
        Ok(CompiledCategory {
            category,
            include,
            exclude,
        })
    }

    fn matches(&self, loc: &str) -> bool {
        if !self.include.is_match(loc) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(loc),
            None => true,
        }
    }
}

// Partitions a flat sitemap document into per-category fragments
//
// Parameters:
//   flat_xml: the closed flat document produced by the crawl
//   categories: the rules; empty means "one flat sitemap"
//
// Returns: fragments in the order they were first matched
pub fn categorize(flat_xml: &str, categories: &[Category]) -> Vec<CategorisedSitemap> {
    if categories.is_empty() {
        return vec![CategorisedSitemap {
            name: default_fragment_name().to_string(),
            path: String::new(),
            data: flat_xml.to_string(),
        }];
    }

    let compiled: Vec<CompiledCategory> = categories
        .iter()
        .filter_map(|category| match CompiledCategory::compile(category) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(label = %category.label, error = %e, "Skipping category with invalid pattern");
                None
            }
        })
        .collect();

    let mut sitemaps: Vec<CategorisedSitemap> = Vec::new();

    for (loc, lastmod) in split_entries(flat_xml) {
        for rule in &compiled {
            if !rule.matches(&loc) {
                continue;
            }

            let label = &rule.category.label;
            let index = match sitemaps.iter().position(|s| &s.name == label) {
                Some(index) => index,
                None => {
                    sitemaps.push(CategorisedSitemap {
                        name: label.clone(),
                        path: rule.category.path.clone(),
                        data: SITEMAP_PREFIX.to_string(),
                    });
                    sitemaps.len() - 1
                }
            };

            sitemaps[index].data.push_str(&render_url(&loc, &lastmod));
        }
    }

    for sitemap in &mut sitemaps {
        sitemap.data.push('\n');
        sitemap.data.push_str(SITEMAP_POSTFIX);
    }

    debug!(fragments = sitemaps.len(), "Categorised sitemap");
    sitemaps
}

// Cuts a urlset document back into (loc, lastmod) pairs
//
// Pieces without a parseable <loc> or <lastmod> are dropped silently.
fn split_entries(flat_xml: &str) -> Vec<(String, String)> {
    let body = flat_xml
        .replacen(URLSET_OPEN, "", 1)
        .replacen(SITEMAP_POSTFIX, "", 1);

    body.split_inclusive(URL_CLOSE)
        .filter_map(|piece| {
            let loc = LOC_PATTERN.captures(piece)?.get(1)?.as_str();
            let lastmod = LASTMOD_PATTERN.captures(piece)?.get(1)?.as_str();
            Some((loc.to_string(), lastmod.to_string()))
        })
        .collect()
}
