//! Upstream data sources
//!
//! The pipelines talk to the outside world only through [`QuranSource`]. Each method
//! performs the requests for one lookup and either returns parsed data or an error; none
//! of them retry. Retrying is the caller's job (see [`crate::retry`]).

use crate::error::Result;
use crate::types::{ChapterDescriptor, TafseerText, VerseMetadata, VerseText};
use async_trait::async_trait;

mod http;

pub use http::HttpQuranSource;

/// Source of chapter, verse and tafseer data
///
/// [`HttpQuranSource`] is the production implementation. Tests substitute in-memory
/// fakes to drive the pipelines without a network.
#[async_trait]
pub trait QuranSource: Send + Sync {
    /// The ordered index of all chapters (114 entries for the full text)
    async fn chapter_index(&self) -> Result<Vec<ChapterDescriptor>>;

    /// Verse number plus its two Arabic renderings and the English rendering
    async fn verse_text(&self, surah: u32, ayah: u32) -> Result<VerseText>;

    /// Page, juz, hizb quarter and prostration marker of a verse
    async fn verse_metadata(&self, surah: u32, ayah: u32) -> Result<VerseMetadata>;

    /// One entry per configured tafseer source, in source order
    ///
    /// A source that answers with an error status, an unusable body or missing fields
    /// still produces an (empty) entry in its position. Only a transport failure fails
    /// the whole lookup.
    async fn verse_tafseer(&self, surah: u32, ayah: u32) -> Result<Vec<TafseerText>>;
}
