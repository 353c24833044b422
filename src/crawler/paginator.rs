//! Per-chapter pagination
//!
//! Walks the pages of one chapter in order until a page yields nothing. The
//! site publishes no page count, so an empty page is the only end marker.

use crate::crawler::context::MirrorContext;
use crate::crawler::page::{PageCoordinator, PageOutcome};
use crate::state::{RenderStatus, ResourceStatus};
use std::fmt;
use std::sync::Arc;

/// Why a chapter stopped advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// A page rendered but persisted nothing; the normal end of a chapter
    NoResources,

    /// A page could not be rendered within its retry budget
    RenderExhausted,

    /// The configured page cap was reached
    ExplicitEnd,

    /// The chapter could not be processed locally (folder or address)
    Aborted,
}

impl TerminationReason {
    /// True for every reason except the natural end of content
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            TerminationReason::RenderExhausted | TerminationReason::Aborted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::NoResources => "no-resources",
            TerminationReason::RenderExhausted => "render-exhausted",
            TerminationReason::ExplicitEnd => "explicit-end",
            TerminationReason::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of paginating one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterResult {
    pub chapter: u32,
    /// Pages that persisted at least one artifact
    pub pages_processed: u32,
    /// Pages whose processing was started, including the terminating one
    pub pages_attempted: u32,
    pub reason: TerminationReason,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ChapterResult {
    fn new(chapter: u32) -> Self {
        Self {
            chapter,
            pages_processed: 0,
            pages_attempted: 0,
            reason: TerminationReason::NoResources,
            downloaded: 0,
            skipped: 0,
            failed: 0,
        }
    }

    fn record(&mut self, outcome: &PageOutcome) {
        self.pages_attempted += 1;
        if outcome.had_artifact() {
            self.pages_processed += 1;
        }
        self.downloaded += outcome.count(ResourceStatus::Downloaded);
        self.skipped += outcome.count(ResourceStatus::Skipped);
        self.failed += outcome.count(ResourceStatus::Failed);
    }

    fn finish(mut self, reason: TerminationReason) -> Self {
        self.reason = reason;
        self
    }
}

/// Advances through the pages of a chapter
pub struct ChapterPaginator {
    ctx: Arc<MirrorContext>,
    pages: PageCoordinator,
}

impl ChapterPaginator {
    pub fn new(ctx: Arc<MirrorContext>) -> Self {
        let pages = PageCoordinator::new(Arc::clone(&ctx));
        Self { ctx, pages }
    }

    /// Processes pages 1, 2, ... of `chapter` until a termination condition
    ///
    /// Page N+1 is never requested before page N has settled, and nothing
    /// past the terminating page is requested.
    pub async fn run(&self, chapter: u32) -> ChapterResult {
        let result = ChapterResult::new(chapter);

        if let Err(e) = self.ctx.layout.ensure_chapter_dir(chapter).await {
            tracing::error!(
                chapter,
                "Could not create {}: {}",
                self.ctx.layout.chapter_dir(chapter).display(),
                e
            );
            return result.finish(TerminationReason::Aborted);
        }

        let result = self.paginate(chapter, result).await;

        if result.reason.is_incomplete() {
            tracing::warn!(
                chapter,
                pages = result.pages_processed,
                reason = %result.reason,
                "Chapter {} incomplete",
                chapter
            );
        } else {
            tracing::info!(
                chapter,
                pages = result.pages_processed,
                reason = %result.reason,
                "Chapter {} complete",
                chapter
            );
        }

        result
    }

    async fn paginate(&self, chapter: u32, mut result: ChapterResult) -> ChapterResult {
        let mut page = 1;

        loop {
            if let Some(max) = self.ctx.max_pages {
                if page > max {
                    return result.finish(TerminationReason::ExplicitEnd);
                }
            }

            let outcome = match self.pages.process_page(chapter, page).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(chapter, page, "Page processing aborted: {}", e);
                    result.pages_attempted += 1;
                    return result.finish(TerminationReason::Aborted);
                }
            };
            result.record(&outcome);

            if outcome.render_status != RenderStatus::Ok {
                tracing::warn!(
                    chapter,
                    page,
                    "Rendering {} failed: {}",
                    outcome.address,
                    outcome.render_status
                );
                return result.finish(TerminationReason::RenderExhausted);
            }

            if !outcome.had_artifact() {
                tracing::info!(chapter, page, "No artifacts on {}", outcome.address);
                return result.finish(TerminationReason::NoResources);
            }

            page += 1;
        }
    }
}
