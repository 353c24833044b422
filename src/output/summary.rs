//! Run summary aggregation and printing

use crate::crawler::{ChapterResult, TerminationReason};
use std::collections::HashMap;
use std::time::Duration;

/// Outcome of a whole run, ordered by chapter
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub chapters: Vec<ChapterResult>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(chapters: Vec<ChapterResult>, elapsed: Duration) -> Self {
        Self { chapters, elapsed }
    }

    /// Pages that persisted at least one artifact, across all chapters
    pub fn pages_processed(&self) -> u32 {
        self.chapters.iter().map(|c| c.pages_processed).sum()
    }

    pub fn downloaded(&self) -> usize {
        self.chapters.iter().map(|c| c.downloaded).sum()
    }

    pub fn skipped(&self) -> usize {
        self.chapters.iter().map(|c| c.skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.chapters.iter().map(|c| c.failed).sum()
    }

    /// Chapters that stopped before running out of content
    pub fn incomplete(&self) -> Vec<&ChapterResult> {
        self.chapters
            .iter()
            .filter(|c| c.reason.is_incomplete())
            .collect()
    }

    /// Number of chapters per termination reason
    pub fn by_reason(&self) -> HashMap<TerminationReason, usize> {
        let mut counts = HashMap::new();
        for chapter in &self.chapters {
            *counts.entry(chapter.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn chapter(&self, chapter: u32) -> Option<&ChapterResult> {
        self.chapters.iter().find(|c| c.chapter == chapter)
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Mirror Summary ===\n");

    println!("Overview:");
    println!("  Chapters: {}", summary.chapters.len());
    println!("  Pages with artifacts: {}", summary.pages_processed());
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    println!("Resources:");
    println!("  Downloaded: {}", summary.downloaded());
    println!("  Skipped: {}", summary.skipped());
    println!("  Failed: {}", summary.failed());
    println!();

    println!("Chapters:");
    for chapter in &summary.chapters {
        println!(
            "  chapter_{}: {} pages ({} attempted), {}",
            chapter.chapter, chapter.pages_processed, chapter.pages_attempted, chapter.reason
        );
    }
    println!();

    let incomplete = summary.incomplete();
    if !incomplete.is_empty() {
        println!("Incomplete Chapters ({}):", incomplete.len());
        for chapter in incomplete {
            println!(
                "  - chapter_{} stopped at page {} ({})",
                chapter.chapter, chapter.pages_attempted, chapter.reason
            );
        }
        println!();
    }

    let attempted = summary.downloaded() + summary.failed();
    let success_rate = if attempted > 0 {
        (summary.downloaded() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Success Rate: {:.1}% ({} / {} resources saved)",
        success_rate,
        summary.downloaded(),
        attempted
    );
}
