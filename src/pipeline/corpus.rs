//! Corpus stage: every chapter of the index, one after another

use super::Pipeline;
use crate::error::Result;
use crate::retry::with_retry;
use crate::types::ChapterHeader;

/// Outcome of a corpus run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    /// Chapters listed by the index
    pub chapters: usize,
    /// Verses fetched during this run
    pub verses_fetched: u64,
    /// Chapters that still failed after chapter-level retries
    pub failed: Vec<u32>,
}

impl Pipeline {
    /// Materialize a chapter document for every chapter in the upstream index
    ///
    /// Chapters run strictly in index order (chapter number = position + 1). Each chapter
    /// is retried as a unit; because [`Pipeline::process_chapter`] resumes from the stored
    /// prefix, a retry only fetches the verses that are still missing. A chapter that
    /// keeps failing is logged and skipped, leaving a short or missing document behind.
    ///
    /// # Errors
    /// Fails only when the chapter index itself cannot be fetched.
    pub async fn fetch_surahs(&self) -> Result<CorpusSummary> {
        let index = with_retry(&self.config.retry, || self.source.chapter_index()).await?;
        tracing::info!(chapters = index.len(), "fetched chapter index");

        let mut summary = CorpusSummary {
            chapters: index.len(),
            ..Default::default()
        };

        for (position, descriptor) in index.iter().enumerate() {
            let header = ChapterHeader::from_descriptor(position as u32 + 1, descriptor);

            match with_retry(&self.config.retry, || self.process_chapter(&header)).await {
                Ok(fetched) => summary.verses_fetched += u64::from(fetched),
                Err(e) => {
                    tracing::error!(
                        surah = header.surah_no,
                        error = %e,
                        "chapter failed, continuing with next chapter"
                    );
                    summary.failed.push(header.surah_no);
                }
            }

            tokio::time::sleep(self.config.pacing.chapter_delay).await;
        }

        Ok(summary)
    }
}
