use std::path::{Path, PathBuf};

/// Deterministic folder layout under the destination root
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding every artifact of one chapter
    pub fn chapter_dir(&self, chapter: u32) -> PathBuf {
        self.root.join(format!("chapter_{}", chapter))
    }

    /// Creates the chapter folder (and the root) if missing
    ///
    /// Must run before anything is written into the chapter.
    pub async fn ensure_chapter_dir(&self, chapter: u32) -> std::io::Result<PathBuf> {
        let dir = self.chapter_dir(chapter);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Destination of a page's archived markup
    pub fn archive_path(&self, chapter: u32, page: u32) -> PathBuf {
        self.chapter_dir(chapter).join(archive_file_name(page))
    }
}

/// File name of an archived page: zero-padded to three digits
pub fn archive_file_name(page: u32) -> String {
    format!("{:03}.html", page)
}
