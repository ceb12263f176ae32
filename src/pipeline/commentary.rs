//! Commentary stage: tafseer for every stored verse

use super::Pipeline;
use crate::config::TafseerIdScheme;
use crate::error::Result;
use crate::limiter::ConcurrencyLimiter;
use crate::retry::with_retry;
use crate::types::{ChapterDocument, CommentaryDocument, CommentaryEntry, TafseerText};
use std::collections::BTreeMap;

/// Outcome of a commentary run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentarySummary {
    /// Commentary documents written
    pub chapters: usize,
    /// Verses covered across those documents
    pub verses: usize,
    /// Verses written with an empty entry list because every attempt failed
    pub empty_verses: usize,
    /// Chapter files that could not be read
    pub skipped_files: usize,
}

impl Pipeline {
    /// Write a commentary document for every stored chapter document
    ///
    /// Chapters are handled one at a time in ascending order. Within a chapter, one
    /// tafseer lookup per verse is submitted to a [`ConcurrencyLimiter`] sized from
    /// [`crate::config::CommentaryConfig`]; a verse whose lookup keeps failing gets an
    /// empty list instead of aborting its siblings. The document is written once, after
    /// every verse of the chapter has finished.
    pub async fn fetch_tafseers(&self) -> Result<CommentarySummary> {
        let surahs_dir = self.config.surahs_dir();
        tokio::fs::create_dir_all(self.config.tafseers_dir()).await?;

        let limiter = ConcurrencyLimiter::new(self.config.commentary.effective_concurrency());
        let mut summary = CommentarySummary::default();

        for file in self.store.list_numbered(&surahs_dir).await? {
            let chapter: ChapterDocument = match self.store.read(&file.path).await {
                Ok(chapter) => chapter,
                Err(e) => {
                    tracing::error!(path = %file.path.display(), error = %e, "skipping unreadable chapter document");
                    summary.skipped_files += 1;
                    continue;
                }
            };

            let surah = chapter.header.surah_no;
            tracing::info!(surah, ayat = chapter.ayat.len(), "processing tafseer");

            let lookups = chapter
                .ayat
                .iter()
                .map(|verse| limiter.run(self.verse_commentary(surah, verse.ayah_no)));
            let results = futures::future::join_all(lookups).await;

            let ayat: BTreeMap<u32, Vec<CommentaryEntry>> = results.into_iter().collect();
            summary.verses += ayat.len();
            summary.empty_verses += ayat.values().filter(|entries| entries.is_empty()).count();

            let document = CommentaryDocument {
                surah: chapter.header,
                ayat,
            };
            let path = self.store.numbered_path(&self.config.folders.tafseers, surah);
            self.store.create(&path, &document).await?;
            summary.chapters += 1;

            tracing::info!(surah, ayat = document.ayat.len(), "tafseer document written");
        }

        tracing::info!(chapters = summary.chapters, "all tafseer processed");
        Ok(summary)
    }

    /// Tafseer entries for one verse; an empty list when the lookup keeps failing
    async fn verse_commentary(&self, surah: u32, ayah: u32) -> (u32, Vec<CommentaryEntry>) {
        let lookup = with_retry(&self.config.retry, || self.source.verse_tafseer(surah, ayah)).await;

        match lookup {
            Ok(texts) => {
                let entries = self.number_entries(texts);
                tracing::debug!(surah, ayah, tafseers = entries.len(), "added tafseer");
                (ayah, entries)
            }
            Err(e) => {
                tracing::warn!(surah, ayah, error = %e, "tafseer failed, writing empty list");
                (ayah, Vec::new())
            }
        }
    }

    fn number_entries(&self, texts: Vec<TafseerText>) -> Vec<CommentaryEntry> {
        let sources = &self.config.upstream.tafseer_sources;
        texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| {
                let positional = position as u32 + 1;
                let id = match self.config.commentary.id_scheme {
                    TafseerIdScheme::Positional => positional,
                    TafseerIdScheme::Source => sources.get(position).copied().unwrap_or(positional),
                };
                CommentaryEntry {
                    id,
                    tafseer_book_name: text.book_name,
                    tafseer: text.text,
                }
            })
            .collect()
    }
}
