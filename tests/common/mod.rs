//! Shared fixtures for the integration tests
//!
//! The browser is replaced by [`SiteDriver`], which serves scripted markup per
//! page address and records every render it was asked for. Like a real
//! browser it times out when the awaited tag never appears.

#![allow(dead_code)]

use page_mirror::config::{
    Config, FetchConfig, Mode, OrchestratorConfig, OutputConfig, RenderConfig, SourceConfig,
};
use page_mirror::render::{PageDriver, RenderError, RenderPool, WaitCondition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use url::Url;

/// Markup of a page that carries no artifacts
pub const EMPTY_PAGE: &str = "<html><body><p>The end</p></body></html>";

#[derive(Debug, Clone)]
pub enum PageScript {
    Markup(String),
    /// Every render attempt fails
    Broken,
}

/// A fake browser serving scripted pages
///
/// Unknown addresses render as [`EMPTY_PAGE`].
#[derive(Clone, Default)]
pub struct SiteDriver {
    pages: Arc<Mutex<HashMap<String, PageScript>>>,
    renders: Arc<Mutex<Vec<String>>>,
}

impl SiteDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, markup: impl Into<String>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(normalize(url), PageScript::Markup(markup.into()));
        self
    }

    pub fn broken(self, url: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(normalize(url), PageScript::Broken);
        self
    }

    /// Every render request so far, in order
    pub fn renders(&self) -> Vec<String> {
        self.renders.lock().unwrap().clone()
    }

    pub fn render_count(&self, url: &str) -> usize {
        let url = normalize(url);
        self.renders().iter().filter(|r| **r == url).count()
    }

    /// A pool of `size` drivers sharing this script
    pub fn pool(&self, size: usize) -> RenderPool {
        let drivers = (0..size)
            .map(|_| Box::new(self.clone()) as Box<dyn PageDriver>)
            .collect();
        RenderPool::new(drivers)
    }
}

impl PageDriver for SiteDriver {
    fn render(&mut self, url: &Url, wait: &WaitCondition) -> Result<String, RenderError> {
        self.renders.lock().unwrap().push(url.to_string());

        let markup = match self.pages.lock().unwrap().get(url.as_str()) {
            Some(PageScript::Markup(markup)) => markup.clone(),
            Some(PageScript::Broken) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                })
            }
            None => EMPTY_PAGE.to_string(),
        };

        // Selectors in these tests are bare tag names
        if !markup.contains(&format!("<{}", wait.selector)) {
            return Err(RenderError::Timeout(format!("`{}` on {}", wait.selector, url)));
        }
        Ok(markup)
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}

/// Builds an HTML page referencing `images` in order
pub fn gallery(images: &[String]) -> String {
    let tags: String = images
        .iter()
        .map(|src| format!(r#"<img src="{}">"#, src))
        .collect();
    format!("<html><head><title>Gallery</title></head><body>{}</body></html>", tags)
}

/// Configuration with fast retries for tests
pub fn test_config(template: &str, destination: &Path, mode: Mode) -> Config {
    Config {
        source: SourceConfig {
            address_template: template.to_string(),
            start_chapter: 1,
            end_chapter: 1,
            mode,
            max_pages: None,
        },
        output: OutputConfig {
            destination_root: destination.to_path_buf(),
        },
        render: RenderConfig {
            pool_size: 5,
            retry_attempts: 3,
            backoff_min_ms: 0,
            backoff_max_ms: 0,
            page_timeout_secs: 10,
            ..RenderConfig::default()
        },
        fetch: FetchConfig {
            retry_attempts: 3,
            backoff_ms: 0,
            request_timeout_secs: 5,
            ..FetchConfig::default()
        },
        orchestrator: OrchestratorConfig::default(),
    }
}

/// Sorted file names in `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
