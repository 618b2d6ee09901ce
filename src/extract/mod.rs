// src/extract/mod.rs
// =============================================================================
// This module finds the links a crawled page points to.
//
// Submodules:
// - html: href scanning and the noindex check
// =============================================================================

mod html;

pub use html::{extract_links, is_noindex};
