//! Resource extraction from rendered markup
//!
//! Pulls every `<img src="...">` out of a rendered page and resolves it
//! against the page address. A page without images yields an empty list;
//! that is the signal the paginator uses to end a chapter, not an error.

use crate::address::{resolve_reference, Address};
use scraper::{Html, Selector};

/// Extracts absolute resource addresses from rendered markup
///
/// # Extraction Rules
///
/// **Include:**
/// - `src` of every `<img>` tag, in document order
///
/// **Exclude:**
/// - `<img>` tags without a `src` attribute
/// - blank sources and `data:`/`blob:`/`javascript:` references
///
/// Relative references are appended to the page address verbatim; see
/// [`resolve_reference`].
///
/// # Example
///
/// ```
/// use page_mirror::crawler::extract_resources;
/// use page_mirror::AddressTemplate;
///
/// let page = AddressTemplate::parse("https://site.test/c{chapter}?page={page}")
///     .unwrap()
///     .address(1, 1)
///     .unwrap();
/// let html = r#"<html><body><img src="https://cdn.test/01.jpg"><img alt="x"></body></html>"#;
/// let resources = extract_resources(html, &page);
/// assert_eq!(resources.len(), 1);
/// assert_eq!(resources[0].as_str(), "https://cdn.test/01.jpg");
/// ```
pub fn extract_resources(markup: &str, page: &Address) -> Vec<Address> {
    let document = Html::parse_document(markup);
    let mut resources = Vec::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            if let Some(src) = element.value().attr("src") {
                match resolve_reference(src, page.url()) {
                    Some(url) => {
                        resources.push(Address::new(url, page.chapter(), page.page()));
                    }
                    None => {
                        tracing::trace!("Ignoring image reference {:?} on {}", src, page);
                    }
                }
            }
        }
    }

    resources
}
