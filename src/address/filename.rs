use sha2::{Digest, Sha256};
use std::collections::HashMap;
use url::Url;

/// Name used when an address has no usable final segment
const FALLBACK_NAME: &str = "resource";

/// Derives the on-disk file name for a resource address
///
/// The name is the text after the last `/` of the address, with any
/// `?query` suffix and `#fragment` removed. Characters that are not valid in
/// file names on common platforms are replaced by `_`.
///
/// A bare relative reference such as `a.jpg` is glued onto the page address
/// without a separator (`…/c1?page=1a.jpg`), so it lands inside the query and
/// the name comes out as the page's own last segment (`c1`), without an
/// extension. Further such references on the same page get hash suffixes
/// from [`FileNameClaims`].
///
/// # Examples
///
/// ```
/// use page_mirror::address::file_name_for;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.test/img/001.jpg?token=abc").unwrap();
/// assert_eq!(file_name_for(&url), "001.jpg");
/// ```
pub fn file_name_for(url: &Url) -> String {
    let raw = url.as_str();
    let raw = raw.split('#').next().unwrap_or(raw);
    let last = raw.rsplit('/').next().unwrap_or(raw);
    let last = last.split('?').next().unwrap_or(last);

    let name: String = last
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// File names already handed out for one page
///
/// The first address to claim a name keeps it. A different address that maps
/// onto a taken name gets the first 8 hex digits of its SHA-256 appended to
/// the stem, so two resources on one page never overwrite each other.
#[derive(Debug, Default)]
pub struct FileNameClaims {
    claimed: HashMap<String, String>,
}

impl FileNameClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a file name for `url`
    ///
    /// Returns `None` when the exact same address was already claimed on
    /// this page; it only needs to be fetched once.
    pub fn claim(&mut self, url: &Url) -> Option<String> {
        let base = file_name_for(url);

        match self.claimed.get(&base) {
            None => {
                self.claimed.insert(base.clone(), url.as_str().to_string());
                Some(base)
            }
            Some(owner) if owner == url.as_str() => None,
            Some(_) => {
                let name = with_hash_suffix(&base, url);
                if let Some(owner) = self.claimed.get(&name) {
                    if owner == url.as_str() {
                        return None;
                    }
                }
                self.claimed.insert(name.clone(), url.as_str().to_string());
                Some(name)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

fn with_hash_suffix(name: &str, url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let short = &hex::encode(digest)[..8];

    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}-{}{}", &name[..idx], short, &name[idx..]),
        _ => format!("{}-{}", name, short),
    }
}
