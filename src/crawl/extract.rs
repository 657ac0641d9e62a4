// src/crawl/extract.rs
// =============================================================================
// This module pulls the raw href values out of a fetched page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on malformed HTML (html5ever recovers like a browser does)
//
// Unlike a link checker, we do NOT resolve or filter anything here. The hrefs
// come back exactly as written, in document order, and the crawl processor
// decides what to keep.
// =============================================================================

use scraper::{Html, Selector};

/// Returns the `href` of every `<a>` element in `html`, in document order.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. The only
/// error is a selector that fails to parse.
pub fn extract_anchor_targets(html: &[u8]) -> Result<Vec<String>, String> {
    let selector = Selector::parse("a[href]").map_err(|e| format!("invalid selector: {:?}", e))?;

    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let targets = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(targets)
}
