//! Page and resource addresses
//!
//! An [`AddressTemplate`] turns a chapter/page pair into an absolute page
//! [`Address`]. Resource references found in rendered markup are resolved
//! against that page address, and each resource address maps onto a
//! deterministic file name inside the chapter folder.

mod filename;
mod resolve;

pub use filename::{file_name_for, FileNameClaims};
pub use resolve::resolve_reference;

use crate::TemplateError;
use std::fmt;
use url::Url;

const CHAPTER_PLACEHOLDER: &str = "{chapter}";
const PAGE_PLACEHOLDER: &str = "{page}";

/// A validated URL template with `{chapter}` and `{page}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTemplate {
    template: String,
}

impl AddressTemplate {
    /// Parses a template string
    ///
    /// Both placeholders must be present and the template must produce an
    /// absolute URL once they are substituted.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_mirror::address::AddressTemplate;
    ///
    /// let template = AddressTemplate::parse("https://site.test/x/c{chapter}?page={page}").unwrap();
    /// let address = template.address(3, 7).unwrap();
    /// assert_eq!(address.as_str(), "https://site.test/x/c3?page=7");
    /// ```
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if !template.contains(CHAPTER_PLACEHOLDER) {
            return Err(TemplateError::MissingPlaceholder(CHAPTER_PLACEHOLDER));
        }
        if !template.contains(PAGE_PLACEHOLDER) {
            return Err(TemplateError::MissingPlaceholder(PAGE_PLACEHOLDER));
        }

        let parsed = Self {
            template: template.to_string(),
        };
        parsed.address(1, 1)?;
        Ok(parsed)
    }

    /// Substitutes the placeholders and parses the result
    pub fn address(&self, chapter: u32, page: u32) -> Result<Address, TemplateError> {
        let raw = self
            .template
            .replace(CHAPTER_PLACEHOLDER, &chapter.to_string())
            .replace(PAGE_PLACEHOLDER, &page.to_string());

        let url = Url::parse(&raw).map_err(|_| TemplateError::NotAbsolute(raw.clone()))?;
        if url.cannot_be_a_base() {
            return Err(TemplateError::NotAbsolute(raw));
        }

        Ok(Address { url, chapter, page })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// An absolute URL tied to the chapter and page it belongs to
///
/// Page addresses come from an [`AddressTemplate`]; resource addresses carry
/// the chapter and page of the page that referenced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    url: Url,
    chapter: u32,
    page: u32,
}

impl Address {
    pub fn new(url: Url, chapter: u32, page: u32) -> Self {
        Self { url, chapter, page }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
