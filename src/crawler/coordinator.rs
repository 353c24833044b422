//! Run orchestration
//!
//! Fans the configured chapter range out over a bounded number of chapter
//! paginators. Chapters share the render pool and the global download limit,
//! so neither grows with the number of chapters in flight.

use crate::config::Config;
use crate::crawler::context::MirrorContext;
use crate::crawler::paginator::{ChapterPaginator, ChapterResult};
use crate::output::RunSummary;
use crate::render::RenderPool;
use crate::MirrorError;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Drives every chapter of a run to completion
pub struct Orchestrator {
    ctx: Arc<MirrorContext>,
    start_chapter: u32,
    end_chapter: u32,
    chapter_concurrency: usize,
}

impl Orchestrator {
    /// Creates an orchestrator for a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    /// * `pool` - Browser pool shared by all chapters
    pub fn new(config: &Config, pool: RenderPool) -> Result<Self, MirrorError> {
        let ctx = MirrorContext::new(config, pool)?;

        Ok(Self {
            ctx: Arc::new(ctx),
            start_chapter: config.source.start_chapter,
            end_chapter: config.source.end_chapter,
            chapter_concurrency: config.orchestrator.chapter_concurrency.max(1),
        })
    }

    /// Processes every chapter in the range and reports their outcomes
    ///
    /// A chapter that ends early never stops the others; results come back
    /// ordered by chapter whatever order they finished in.
    pub async fn run(&self) -> RunSummary {
        let start_time = Instant::now();
        tracing::info!(
            "Mirroring chapters {}..={} ({} at a time, {} browsers)",
            self.start_chapter,
            self.end_chapter,
            self.chapter_concurrency,
            self.ctx.renderer.pool().size()
        );

        let paginator = ChapterPaginator::new(Arc::clone(&self.ctx));
        let mut chapters: Vec<ChapterResult> = stream::iter(self.start_chapter..=self.end_chapter)
            .map(|chapter| paginator.run(chapter))
            .buffer_unordered(self.chapter_concurrency)
            .collect()
            .await;
        chapters.sort_by_key(|result| result.chapter);

        let summary = RunSummary::new(chapters, start_time.elapsed());
        tracing::info!(
            "Run completed: {} chapters, {} resources saved in {:?}",
            summary.chapters.len(),
            summary.downloaded(),
            summary.elapsed
        );

        summary
    }

    /// Closes the render pool; later renders fail immediately
    pub fn shutdown(&self) {
        self.ctx.renderer.pool().close();
    }
}
