//! Chapter stage: build one chapter document verse by verse

use super::Pipeline;
use crate::error::{Error, Result};
use crate::retry::with_retry;
use crate::types::{ChapterDocument, ChapterHeader, VerseRecord};
use std::path::Path;

impl Pipeline {
    /// Fetch every missing verse of one chapter and append it to the chapter document
    ///
    /// The document is created with an empty verse list before any verse is fetched, so a
    /// partial file is always a valid prefix. An existing document with the same header
    /// and verses numbered `1..=k` is resumed at `k + 1`; anything else is recreated.
    /// Calling this on a complete chapter makes no upstream requests.
    ///
    /// If a verse still fails after its retries, the chapter is aborted with
    /// [`crate::Error::RetriesExhausted`]; verses already appended stay on disk so a rerun
    /// resumes after them.
    ///
    /// Returns the number of verses fetched by this call.
    pub async fn process_chapter(&self, header: &ChapterHeader) -> Result<u32> {
        let surah = header.surah_no;
        let path = self.store.numbered_path(&self.config.folders.surahs, surah);

        let stored = self.resume_point(&path, header).await?;
        if stored >= header.total_ayat {
            tracing::info!(surah, total = header.total_ayat, "chapter already complete");
            return Ok(0);
        }
        if stored > 0 {
            tracing::info!(surah, stored, total = header.total_ayat, "resuming chapter");
        }

        let mut fetched = 0;
        for ayah in stored + 1..=header.total_ayat {
            let record = self.fetch_verse(surah, ayah).await?;
            tokio::time::sleep(self.config.pacing.verse_delay).await;

            self.store.append_verse(&path, &record).await?;
            fetched += 1;
            tracing::info!(surah, ayah, "added verse");
        }

        tracing::info!(surah, fetched, total = header.total_ayat, "chapter complete");
        Ok(fetched)
    }

    /// Number of verses already stored for this chapter, (re)creating the document when
    /// it cannot be resumed
    ///
    /// A document that does not parse is recreated; an I/O error reading it is returned.
    async fn resume_point(&self, path: &Path, header: &ChapterHeader) -> Result<u32> {
        let existing = match self.store.read_chapter_if_exists(path).await {
            Ok(existing) => existing,
            Err(e @ Error::Serialization(_)) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt chapter document, recreating");
                None
            }
            // Read failures are left to the chapter retry; stored verses stay untouched
            Err(e) => return Err(e),
        };

        if let Some(document) = existing
            && document.header == *header
            && document.contiguous_prefix() == document.ayat.len()
            && document.ayat.len() <= header.total_ayat as usize
        {
            return Ok(document.ayat.len() as u32);
        }

        self.store
            .create(path, &ChapterDocument::empty(header.clone()))
            .await?;
        tracing::info!(surah = header.surah_no, path = %path.display(), "created chapter document");
        Ok(0)
    }

    /// Fetch text and metadata for one verse, each under the retry policy
    async fn fetch_verse(&self, surah: u32, ayah: u32) -> Result<VerseRecord> {
        let retry = &self.config.retry;
        let text = with_retry(retry, || self.source.verse_text(surah, ayah)).await?;
        let metadata = with_retry(retry, || self.source.verse_metadata(surah, ayah)).await?;

        let mut record = VerseRecord::assemble(text, metadata);
        if record.ayah_no != ayah {
            tracing::warn!(
                surah,
                ayah,
                reported = record.ayah_no,
                "upstream reported a different verse number, using the requested one"
            );
            record.ayah_no = ayah;
        }
        Ok(record)
    }
}
