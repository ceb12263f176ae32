//! Completeness report over the stored chapter documents

use super::Pipeline;
use crate::error::Result;
use crate::types::{CHAPTER_COUNT, ChapterDocument};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A chapter document that exists but is short, gapped or over-long
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteChapter {
    /// Chapter number
    pub surah_no: u32,
    /// Verses stored
    pub stored: usize,
    /// Verses declared by the chapter header
    pub declared: u32,
}

/// What the chapter directory says about the last corpus run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusAudit {
    /// Chapters with every declared verse, numbered without gaps
    pub complete: Vec<u32>,
    /// Chapters with a document that is not complete
    pub incomplete: Vec<IncompleteChapter>,
    /// Chapter numbers in `1..=114` with no document
    pub missing: Vec<u32>,
    /// Files that could not be parsed as chapter documents
    pub unreadable: Vec<PathBuf>,
}

impl CorpusAudit {
    /// True when all 114 chapters are present and complete
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
            && self.missing.is_empty()
            && self.unreadable.is_empty()
            && self.complete.len() == CHAPTER_COUNT as usize
    }

    /// Emit the report as log lines
    pub fn log(&self) {
        for chapter in &self.incomplete {
            tracing::warn!(
                surah = chapter.surah_no,
                stored = chapter.stored,
                declared = chapter.declared,
                "chapter document incomplete"
            );
        }
        if !self.missing.is_empty() {
            tracing::warn!(missing = ?self.missing, "chapter documents missing");
        }
        for path in &self.unreadable {
            tracing::warn!(path = %path.display(), "chapter document unreadable");
        }
        tracing::info!(
            complete = self.complete.len(),
            incomplete = self.incomplete.len(),
            missing = self.missing.len(),
            unreadable = self.unreadable.len(),
            "corpus audit"
        );
    }
}

impl Pipeline {
    /// Inspect the chapter directory and classify every chapter
    ///
    /// A missing directory counts every chapter as missing.
    pub async fn audit_corpus(&self) -> Result<CorpusAudit> {
        let dir = self.config.surahs_dir();
        let mut audit = CorpusAudit::default();
        let mut present = BTreeSet::new();

        let files = if tokio::fs::try_exists(&dir).await? {
            self.store.list_numbered(&dir).await?
        } else {
            Vec::new()
        };

        for file in files {
            let chapter: ChapterDocument = match self.store.read(&file.path).await {
                Ok(chapter) => chapter,
                Err(_) => {
                    audit.unreadable.push(file.path);
                    continue;
                }
            };

            present.insert(chapter.header.surah_no);
            if chapter.is_complete() {
                audit.complete.push(chapter.header.surah_no);
            } else {
                audit.incomplete.push(IncompleteChapter {
                    surah_no: chapter.header.surah_no,
                    stored: chapter.ayat.len(),
                    declared: chapter.header.total_ayat,
                });
            }
        }

        audit.missing = (1..=CHAPTER_COUNT).filter(|n| !present.contains(n)).collect();
        Ok(audit)
    }
}
