//! Shared state for one mirror run
//!
//! Built once by the orchestrator from the configuration and handed to every
//! paginator and page coordinator; nothing in the pipeline reaches for
//! globals.

use crate::address::AddressTemplate;
use crate::config::{Config, Mode};
use crate::crawler::fetcher::{build_http_client, ResourceFetcher};
use crate::render::{RenderClient, RenderPool, WaitCondition};
use crate::retry::{Backoff, RetryPolicy};
use crate::storage::OutputLayout;
use crate::MirrorError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub struct MirrorContext {
    pub template: AddressTemplate,
    pub mode: Mode,
    pub layout: OutputLayout,
    pub renderer: RenderClient,
    pub wait: WaitCondition,
    pub fetcher: ResourceFetcher,
    /// Caps downloads in flight across every page of every chapter
    pub fetch_limit: Arc<Semaphore>,
    pub max_pages: Option<u32>,
}

impl MirrorContext {
    /// Wires the pipeline from `config` around an existing render pool
    pub fn new(config: &Config, pool: RenderPool) -> Result<Self, MirrorError> {
        let template = AddressTemplate::parse(&config.source.address_template)?;

        let render_retry = RetryPolicy::new(
            config.render.retry_attempts,
            Backoff::Jitter {
                min: Duration::from_millis(config.render.backoff_min_ms),
                max: Duration::from_millis(config.render.backoff_max_ms),
            },
        );
        let renderer = RenderClient::new(pool, config.render.page_timeout(), render_retry);

        let fetch_retry = RetryPolicy::new(
            config.fetch.retry_attempts,
            Backoff::Fixed(Duration::from_millis(config.fetch.backoff_ms)),
        );
        let fetcher = ResourceFetcher::new(build_http_client(&config.fetch)?, fetch_retry);

        Ok(Self {
            template,
            mode: config.source.mode,
            layout: OutputLayout::new(&config.output.destination_root),
            renderer,
            wait: WaitCondition::new(config.wait_selector(), config.render.wait_timeout()),
            fetcher,
            fetch_limit: Arc::new(Semaphore::new(config.fetch.max_concurrent)),
            max_pages: config.source.max_pages,
        })
    }
}
