//! Browser rendering
//!
//! Rendering a page means loading it in a real browser, waiting until a
//! selector shows up, and capturing the resulting markup. Browser control is
//! blocking, so it lives behind a bounded [`RenderPool`] that runs each
//! render on tokio's blocking threads and hands the result back as a future.
//!
//! # Example
//!
//! ```no_run
//! use page_mirror::config::RenderConfig;
//! use page_mirror::render::{RenderClient, RenderPool, WaitCondition};
//! use page_mirror::retry::{Backoff, RetryPolicy};
//! use page_mirror::AddressTemplate;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let pool = RenderPool::chrome(&RenderConfig::default());
//! let client = RenderClient::new(
//!     pool,
//!     Duration::from_secs(90),
//!     RetryPolicy::new(3, Backoff::Fixed(Duration::from_secs(2))),
//! );
//! let address = AddressTemplate::parse("https://site.test/c{chapter}?page={page}")
//!     .unwrap()
//!     .address(1, 1)
//!     .unwrap();
//! let page = client
//!     .render(&address, &WaitCondition::new("body", Duration::from_secs(20)))
//!     .await;
//! println!("{}: {} bytes", page.status, page.markup.len());
//! # }
//! ```

mod chrome;
mod client;
mod pool;

pub use chrome::ChromeDriver;
pub use client::{validate_markup, RenderClient, RenderedPage};
pub use pool::RenderPool;

use crate::retry::Transient;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Markup for {0} is missing its root tags")]
    Malformed(String),

    #[error("Render worker failed: {0}")]
    Worker(String),

    #[error("Render pool is closed")]
    PoolClosed,
}

impl Transient for RenderError {
    fn is_transient(&self) -> bool {
        !matches!(self, RenderError::PoolClosed)
    }
}

/// What must be present in the page before its markup is captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitCondition {
    /// CSS selector; `img` waits for images, `body` for any document
    pub selector: String,

    /// How long the browser waits for the selector
    pub timeout: Duration,
}

impl WaitCondition {
    pub fn new(selector: impl Into<String>, timeout: Duration) -> Self {
        Self {
            selector: selector.into(),
            timeout,
        }
    }
}

/// A blocking browser instance
///
/// Implementations own one browser and are only ever used by one pool
/// worker at a time.
pub trait PageDriver: Send + 'static {
    /// Loads `url`, waits for `wait`, and returns the rendered markup
    fn render(&mut self, url: &Url, wait: &WaitCondition) -> Result<String, RenderError>;
}
