use url::Url;

/// Resolves a resource reference found on a page into an absolute URL
///
/// # Resolution Rules
///
/// - `http://` and `https://` references are taken as they are
/// - references with any other scheme (`data:`, `blob:`, `javascript:`) are dropped
/// - everything else, `//host/path` included, is appended verbatim to the
///   page address, so the result is exactly `page address + reference`
///
/// Returns `None` for references that should not be fetched.
///
/// # Examples
///
/// ```
/// use page_mirror::address::resolve_reference;
/// use url::Url;
///
/// let page = Url::parse("https://site.test/x/c1?page=1").unwrap();
/// let resolved = resolve_reference("/img/01.jpg", &page).unwrap();
/// assert_eq!(resolved.as_str(), "https://site.test/x/c1?page=1/img/01.jpg");
/// ```
pub fn resolve_reference(reference: &str, page: &Url) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if has_scheme(reference) {
        return Url::parse(reference)
            .ok()
            .filter(|url| url.scheme() == "http" || url.scheme() == "https");
    }

    Url::parse(&format!("{}{}", page.as_str(), reference)).ok()
}

/// True when the reference starts with `scheme:` (RFC 3986 scheme characters)
fn has_scheme(reference: &str) -> bool {
    match reference.find(':') {
        Some(idx) if idx > 0 => {
            let scheme = &reference[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://site.test/x/c1?page=1").unwrap()
    }

    #[test]
    fn test_absolute_reference_kept() {
        let resolved = resolve_reference("https://cdn.test/img/01.jpg", &page()).unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.test/img/01.jpg");

        let resolved = resolve_reference("http://cdn.test/img/02.jpg", &page()).unwrap();
        assert_eq!(resolved.as_str(), "http://cdn.test/img/02.jpg");
    }

    #[test]
    fn test_relative_reference_is_concatenated() {
        for reference in ["/img/01.jpg", "img/02.png", "03.webp", "/a/b/c.gif"] {
            let resolved = resolve_reference(reference, &page()).unwrap();
            assert_eq!(
                resolved.as_str(),
                format!("{}{}", page().as_str(), reference)
            );
        }
    }

    #[test]
    fn test_scheme_less_host_reference_is_concatenated() {
        let resolved = resolve_reference("//cdn.test/img/01.jpg", &page()).unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://site.test/x/c1?page=1//cdn.test/img/01.jpg"
        );
    }

    #[test]
    fn test_non_http_schemes_dropped() {
        assert!(resolve_reference("data:image/png;base64,AAAA", &page()).is_none());
        assert!(resolve_reference("blob:https://site.test/1234", &page()).is_none());
        assert!(resolve_reference("javascript:void(0)", &page()).is_none());
    }

    #[test]
    fn test_blank_reference_dropped() {
        assert!(resolve_reference("", &page()).is_none());
        assert!(resolve_reference("   ", &page()).is_none());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let resolved = resolve_reference("  https://cdn.test/a.jpg\n", &page()).unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.test/a.jpg");
    }
}
