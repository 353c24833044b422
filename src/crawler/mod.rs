//! Mirroring pipeline
//!
//! This module contains the core mirroring logic, including:
//! - Resource extraction from rendered markup
//! - Resource downloads with probing and retry logic
//! - Per-page processing in resources or archive mode
//! - Per-chapter pagination
//! - Overall run orchestration

mod context;
mod coordinator;
mod fetcher;
mod page;
mod paginator;
mod parser;

pub use context::MirrorContext;
pub use coordinator::Orchestrator;
pub use fetcher::{build_http_client, FetchError, Resource, ResourceFetcher};
pub use page::{PageCoordinator, PageOutcome};
pub use paginator::{ChapterPaginator, ChapterResult, TerminationReason};
pub use parser::extract_resources;

use crate::config::Config;
use crate::output::RunSummary;
use crate::render::RenderPool;
use crate::MirrorError;

/// Runs a complete mirror operation with a Chrome-backed render pool
///
/// This is the main entry point for a run. It will:
/// 1. Build the browser pool and the HTTP client
/// 2. Paginate every chapter in the configured range
/// 3. Download resources or archive markup for each page
/// 4. Release the browser pool
///
/// # Returns
///
/// * `Ok(RunSummary)` - Per-chapter outcomes, including incomplete chapters
/// * `Err(MirrorError)` - The pipeline could not be set up
pub async fn run_mirror(config: Config) -> Result<RunSummary, MirrorError> {
    let pool = RenderPool::chrome(&config.render);
    let orchestrator = Orchestrator::new(&config, pool)?;
    let summary = orchestrator.run().await;
    orchestrator.shutdown();
    Ok(summary)
}
