//! HTML parser for extracting item links from listing pages

use crate::crawler::FetchError;
use scraper::{Html, Selector};

/// Parses the CSS selector that marks item anchors
///
/// # Example
///
/// ```
/// use pagesweep::crawler::parse_link_selector;
///
/// assert!(parse_link_selector("a.tumbpu").is_ok());
/// assert!(parse_link_selector("a[").is_err());
/// ```
pub fn parse_link_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector)
        .map_err(|e| FetchError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Extracts the `href` of every element matching `selector`
///
/// Links come back in document order, exactly as written in the page
/// (surrounding whitespace trimmed). Elements without an `href`, or with an
/// empty one, are skipped. Duplicates are kept.
///
/// # Example
///
/// ```
/// use pagesweep::crawler::{extract_item_links, parse_link_selector};
///
/// let html = r#"<a class="tumbpu" href="/v/1/">1</a><a href="/about/">about</a>"#;
/// let selector = parse_link_selector("a.tumbpu").unwrap();
/// assert_eq!(extract_item_links(html, &selector), vec!["/v/1/".to_string()]);
/// ```
pub fn extract_item_links(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}
