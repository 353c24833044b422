//! Single-page processing
//!
//! Renders one page, then either downloads the images it references or
//! archives the rendered markup, and reports what ended up on disk.

use crate::address::{Address, FileNameClaims};
use crate::config::Mode;
use crate::crawler::context::MirrorContext;
use crate::crawler::fetcher::Resource;
use crate::crawler::parser::extract_resources;
use crate::render::RenderedPage;
use crate::state::{RenderStatus, ResourceStatus};
use crate::storage::write_atomic;
use crate::MirrorError;
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// What processing one page produced
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub address: Address,
    pub render_status: RenderStatus,
    /// One entry per distinct resource address, in document order
    pub resources: Vec<Resource>,
    /// Path of the archived markup (archive mode only)
    pub archived: Option<PathBuf>,
}

impl PageOutcome {
    /// True if at least one artifact was persisted for this page
    pub fn had_artifact(&self) -> bool {
        self.archived.is_some() || self.count(ResourceStatus::Downloaded) > 0
    }

    /// Number of resources that ended in `status`
    pub fn count(&self, status: ResourceStatus) -> usize {
        self.resources.iter().filter(|r| r.status == status).count()
    }
}

/// Processes pages of the configured address template
#[derive(Clone)]
pub struct PageCoordinator {
    ctx: Arc<MirrorContext>,
}

impl PageCoordinator {
    pub fn new(ctx: Arc<MirrorContext>) -> Self {
        Self { ctx }
    }

    /// Renders `page` of `chapter` and persists its artifacts
    ///
    /// The chapter folder must already exist.
    pub async fn process_page(&self, chapter: u32, page: u32) -> Result<PageOutcome, MirrorError> {
        let address = self.ctx.template.address(chapter, page)?;
        tracing::info!(chapter, page, "Loading {}", address);

        let rendered = self.ctx.renderer.render(&address, &self.ctx.wait).await;
        if !rendered.status.is_ok() {
            return Ok(PageOutcome {
                address,
                render_status: rendered.status,
                resources: Vec::new(),
                archived: None,
            });
        }

        let outcome = match self.ctx.mode {
            Mode::Resources => {
                let resources = self.download_resources(&address, &rendered).await;
                PageOutcome {
                    address,
                    render_status: rendered.status,
                    resources,
                    archived: None,
                }
            }
            Mode::Archive => {
                let archived = self.archive(&rendered).await;
                PageOutcome {
                    address,
                    render_status: rendered.status,
                    resources: Vec::new(),
                    archived,
                }
            }
        };

        Ok(outcome)
    }

    /// Fans out one download per distinct resource, bounded by the shared fetch limit
    async fn download_resources(&self, page: &Address, rendered: &RenderedPage) -> Vec<Resource> {
        let found = extract_resources(&rendered.markup, page);
        tracing::info!(
            chapter = page.chapter(),
            page = page.page(),
            "Found {} images on {}",
            found.len(),
            page
        );
        if found.is_empty() {
            return Vec::new();
        }

        let chapter_dir = self.ctx.layout.chapter_dir(page.chapter());
        let mut claims = FileNameClaims::new();
        let jobs: Vec<(Address, PathBuf)> = found
            .into_iter()
            .filter_map(|address| {
                let name = claims.claim(address.url())?;
                Some((address, chapter_dir.join(name)))
            })
            .collect();

        let downloads = jobs.iter().map(|(address, destination)| async move {
            let _permit = self.ctx.fetch_limit.acquire().await.ok();
            self.ctx.fetcher.fetch(address, destination).await
        });

        join_all(downloads).await
    }

    /// Writes the rendered markup as `<page:03>.html`
    async fn archive(&self, rendered: &RenderedPage) -> Option<PathBuf> {
        let path = self.ctx.layout.archive_path(rendered.chapter, rendered.page);

        match write_atomic(&path, rendered.markup.as_bytes()).await {
            Ok(()) => {
                tracing::info!(
                    chapter = rendered.chapter,
                    page = rendered.page,
                    "Saved {}",
                    path.display()
                );
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Could not write {}: {}", path.display(), e);
                None
            }
        }
    }
}
