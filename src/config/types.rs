use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Present on every rendered document, including the empty page that ends a chapter
const DEFAULT_WAIT_SELECTOR: &str = "body";

/// Main configuration structure for Page-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// What gets persisted for each page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Extract and download the images each page references
    Resources,
    /// Persist the rendered markup itself as `<page:03>.html`
    Archive,
}

/// Where the pages come from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL template with `{chapter}` and `{page}` placeholders
    #[serde(rename = "address-template")]
    pub address_template: String,

    /// First chapter to mirror (inclusive)
    #[serde(rename = "start-chapter")]
    pub start_chapter: u32,

    /// Last chapter to mirror (inclusive)
    #[serde(rename = "end-chapter")]
    pub end_chapter: u32,

    #[serde(default = "default_mode")]
    pub mode: Mode,

    /// Optional hard cap on pages per chapter
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root folder; chapters land in `<root>/chapter_<N>/`
    #[serde(rename = "destination-root")]
    pub destination_root: PathBuf,
}

/// Browser rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Number of browser instances kept in the pool
    #[serde(rename = "pool-size", default = "default_pool_size")]
    pub pool_size: usize,

    /// CSS selector awaited before the markup is captured
    ///
    /// A page that never shows it counts as a failed render, so a selector
    /// like `img` turns the empty page ending a chapter into a render failure.
    #[serde(rename = "wait-selector", default)]
    pub wait_selector: Option<String>,

    #[serde(rename = "wait-timeout-secs", default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Upper bound for one render attempt once a browser is checked out
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    #[serde(rename = "retry-attempts", default = "default_render_attempts")]
    pub retry_attempts: u32,

    #[serde(rename = "backoff-min-ms", default = "default_render_backoff_min")]
    pub backoff_min_ms: u64,

    #[serde(rename = "backoff-max-ms", default = "default_render_backoff_max")]
    pub backoff_max_ms: u64,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

/// Resource download configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(rename = "retry-attempts", default = "default_fetch_attempts")]
    pub retry_attempts: u32,

    #[serde(rename = "backoff-ms", default = "default_fetch_backoff")]
    pub backoff_ms: u64,

    /// Global cap on simultaneous downloads, shared by every page
    #[serde(rename = "max-concurrent", default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "user-agent", default = "default_fetch_user_agent")]
    pub user_agent: String,
}

/// Chapter scheduling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Chapters processed at the same time
    #[serde(rename = "chapter-concurrency", default = "default_chapter_concurrency")]
    pub chapter_concurrency: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            wait_selector: None,
            wait_timeout_secs: default_wait_timeout(),
            page_timeout_secs: default_page_timeout(),
            retry_attempts: default_render_attempts(),
            backoff_min_ms: default_render_backoff_min(),
            backoff_max_ms: default_render_backoff_max(),
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
        }
    }
}

impl RenderConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_fetch_attempts(),
            backoff_ms: default_fetch_backoff(),
            max_concurrent: default_max_concurrent(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_fetch_user_agent(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            chapter_concurrency: default_chapter_concurrency(),
        }
    }
}

impl Config {
    /// Configured wait selector, `body` unless overridden
    pub fn wait_selector(&self) -> &str {
        self.render
            .wait_selector
            .as_deref()
            .unwrap_or(DEFAULT_WAIT_SELECTOR)
    }
}

fn default_mode() -> Mode {
    Mode::Resources
}

fn default_pool_size() -> usize {
    5
}

fn default_wait_timeout() -> u64 {
    20
}

fn default_page_timeout() -> u64 {
    90
}

fn default_render_attempts() -> u32 {
    5
}

fn default_render_backoff_min() -> u64 {
    2000
}

fn default_render_backoff_max() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_fetch_backoff() -> u64 {
    2000
}

fn default_max_concurrent() -> usize {
    8
}

fn default_request_timeout() -> u64 {
    30
}

fn default_fetch_user_agent() -> String {
    format!("page-mirror/{}", env!("CARGO_PKG_VERSION"))
}

fn default_chapter_concurrency() -> usize {
    2
}
