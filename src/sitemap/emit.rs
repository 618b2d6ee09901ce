// src/sitemap/emit.rs
// =============================================================================
// This module writes the fragments to disk and builds the index document.
//
// Order of writes:
// 1. <output>/sitemap.xml gets the index prefix only
// 2. For each fragment:
//      - create <output>/<path>/ if needed
//      - write <output>/<path>/<name>.xml
//      - unless the fragment is the default "sitemap" one, read the index
//        back and rewrite it with a <sitemap> reference appended
// 3. Read the index back once more and append the closing tag
//
// The index is rewritten once per fragment, so a crash half way leaves an
// index without its closing </sitemapindex>.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::category::CategorisedSitemap;
use super::xml::{
    default_fragment_name, render_index_ref, INDEX_LASTMOD, MAIN_SITEMAP_POSTFIX,
    MAIN_SITEMAP_PREFIX, MAIN_XML_FILE,
};
use crate::error::SitemapError;

/// What a call to [`write_sitemaps`] put on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub index_path: PathBuf,
    /// Every fragment file written, in order
    pub files: Vec<PathBuf>,
    /// Number of <sitemap> references in the index
    pub references: usize,
}

// Writes every fragment plus the index document
//
// Parameters:
//   fragments: output of the categorizer
//   base_url: site origin used for the index <loc> values
//   output_path: output directory (created if missing)
pub fn write_sitemaps(
    fragments: &[CategorisedSitemap],
    base_url: &str,
    output_path: &Path,
) -> Result<EmitSummary, SitemapError> {
    create_dir(output_path)?;

    let index_path = output_path.join(MAIN_XML_FILE);
    write_file(&index_path, MAIN_SITEMAP_PREFIX)?;

    let mut files = Vec::with_capacity(fragments.len());
    let mut references = 0;
    // Set when a fragment was written over the index file itself
    let mut index_replaced = false;

    for fragment in fragments {
        let dir = output_path.join(&fragment.path);
        create_dir(&dir)?;

        let file_path = dir.join(format!("{}.xml", fragment.name));
        write_file(&file_path, &fragment.data)?;
        debug!(file = %file_path.display(), "Wrote sitemap fragment");

        if file_path == index_path {
            index_replaced = true;
        }
        files.push(file_path);

        if fragment.name == default_fragment_name() {
            continue;
        }

        let loc = format!("{}/{}.xml", base_url, fragment_location(fragment));
        let index = read_file(&index_path)?;
        write_file(
            &index_path,
            &format!("{}{}", index, render_index_ref(&loc, INDEX_LASTMOD)),
        )?;
        references += 1;
    }

    if !index_replaced {
        let index = read_file(&index_path)?;
        write_file(&index_path, &format!("{}\n{}", index, MAIN_SITEMAP_POSTFIX))?;
    }

    info!(
        index = %index_path.display(),
        fragments = files.len(),
        references,
        "Sitemap files written"
    );

    Ok(EmitSummary {
        index_path,
        files,
        references,
    })
}

// "<path>/<name>" with empty segments and stray slashes removed
fn fragment_location(fragment: &CategorisedSitemap) -> String {
    fragment
        .path
        .split('/')
        .chain(std::iter::once(fragment.name.as_str()))
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn create_dir(dir: &Path) -> Result<(), SitemapError> {
    fs::create_dir_all(dir).map_err(|e| SitemapError::io(dir, e))
}

fn write_file(path: &Path, contents: &str) -> Result<(), SitemapError> {
    fs::write(path, contents).map_err(|e| SitemapError::io(path, e))
}

fn read_file(path: &Path) -> Result<String, SitemapError> {
    fs::read_to_string(path).map_err(|e| SitemapError::io(path, e))
}
