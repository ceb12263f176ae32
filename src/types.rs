//! Core types for quran-etl
//!
//! Two families live here: the shapes returned by the upstream APIs, and the documents
//! written to disk. Field names of the persisted documents are part of the output format
//! and must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of chapters (surahs) in the text
pub const CHAPTER_COUNT: u32 = 114;

// ---------------------------------------------------------------------------
// Upstream shapes
// ---------------------------------------------------------------------------

/// One entry of the upstream chapter index
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDescriptor {
    /// Transliterated English name (e.g. "Al-Faatiha")
    pub surah_name: String,
    /// Short Arabic name
    pub surah_name_arabic: String,
    /// Long Arabic name
    pub surah_name_arabic_long: String,
    /// "Mecca" or "Madina"
    pub revelation_place: String,
    /// Declared number of verses
    pub total_ayah: u32,
}

/// Verse text returned by the verse endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseText {
    /// Verse number within its chapter
    pub ayah_no: u32,
    /// First Arabic rendering
    pub arabic1: String,
    /// Second Arabic rendering
    pub arabic2: String,
    /// English rendering
    pub english: String,
}

/// Prostration marker attached to a verse
///
/// Upstream sends `false` for ordinary verses and an object for prostration verses; both
/// forms are written back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sajda {
    /// Plain flag (upstream uses `false`)
    Flag(bool),
    /// Prostration point details
    Marker {
        /// Upstream prostration id
        id: u32,
        /// Prostration is recommended
        recommended: bool,
        /// Prostration is obligatory
        obligatory: bool,
    },
}

impl Default for Sajda {
    fn default() -> Self {
        Sajda::Flag(false)
    }
}

impl Sajda {
    /// Whether this verse is a prostration point
    #[must_use]
    pub fn is_prostration(&self) -> bool {
        match self {
            Sajda::Flag(flag) => *flag,
            Sajda::Marker { .. } => true,
        }
    }
}

/// Verse metadata returned by the metadata endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseMetadata {
    /// Print page
    pub page: u32,
    /// Juz (1..=30)
    pub juz: u32,
    /// Hizb quarter (1..=240)
    pub hizb_quarter: u32,
    /// Prostration marker
    #[serde(default)]
    pub sajda: Sajda,
}

/// One tafseer text as returned by a single source
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TafseerText {
    /// Name of the commentary book
    pub book_name: String,
    /// Commentary body
    pub text: String,
}

// ---------------------------------------------------------------------------
// Persisted documents
// ---------------------------------------------------------------------------

/// Derive the hizb number from a hizb quarter (four quarters per hizb)
///
/// ```
/// use quran_etl::types::hizb_from_quarter;
///
/// assert_eq!(hizb_from_quarter(1), 1);
/// assert_eq!(hizb_from_quarter(5), 2);
/// assert_eq!(hizb_from_quarter(8), 2);
/// assert_eq!(hizb_from_quarter(9), 3);
/// ```
#[must_use]
pub fn hizb_from_quarter(hizb_quarter: u32) -> u32 {
    hizb_quarter.div_ceil(4)
}

/// Chapter header fields, shared by chapter and commentary documents
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterHeader {
    /// Chapter number (1..=114)
    pub surah_no: u32,
    /// Short Arabic name
    pub surah_name_ar: String,
    /// Long Arabic name
    pub surah_name_arabic_long: String,
    /// English name
    pub surah_name_en: String,
    /// Revelation place
    pub revelation_place: String,
    /// Declared number of verses
    pub total_ayat: u32,
}

impl ChapterHeader {
    /// Build the header for chapter `surah_no` from its index entry
    #[must_use]
    pub fn from_descriptor(surah_no: u32, descriptor: &ChapterDescriptor) -> Self {
        Self {
            surah_no,
            surah_name_ar: descriptor.surah_name_arabic.clone(),
            surah_name_arabic_long: descriptor.surah_name_arabic_long.clone(),
            surah_name_en: descriptor.surah_name.clone(),
            revelation_place: descriptor.revelation_place.clone(),
            total_ayat: descriptor.total_ayah,
        }
    }
}

/// Metadata block stored on every verse
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseMeta {
    /// Print page
    pub page: u32,
    /// Juz
    pub juz: u32,
    /// Hizb, derived from `hizb_quarter`
    pub hizb: u32,
    /// Hizb quarter
    pub hizb_quarter: u32,
    /// Prostration marker
    pub sajda: Sajda,
}

impl From<VerseMetadata> for VerseMeta {
    fn from(meta: VerseMetadata) -> Self {
        Self {
            page: meta.page,
            juz: meta.juz,
            hizb: hizb_from_quarter(meta.hizb_quarter),
            hizb_quarter: meta.hizb_quarter,
            sajda: meta.sajda,
        }
    }
}

/// One verse inside a chapter document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    /// Verse number (1-based)
    pub ayah_no: u32,
    /// First Arabic rendering
    pub ayah_ar_v1: String,
    /// Second Arabic rendering
    pub ayah_ar_v2: String,
    /// English rendering
    pub ayah_en: String,
    /// Page/juz/hizb metadata
    pub meta: VerseMeta,
}

impl VerseRecord {
    /// Combine the two upstream responses for one verse
    #[must_use]
    pub fn assemble(text: VerseText, metadata: VerseMetadata) -> Self {
        Self {
            ayah_no: text.ayah_no,
            ayah_ar_v1: text.arabic1,
            ayah_ar_v2: text.arabic2,
            ayah_en: text.english,
            meta: metadata.into(),
        }
    }
}

/// A chapter with its verses, as stored in `surahs/{n}.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDocument {
    /// Header fields
    #[serde(flatten)]
    pub header: ChapterHeader,
    /// Verses in verse-number order
    pub ayat: Vec<VerseRecord>,
}

impl ChapterDocument {
    /// A chapter document with no verses yet
    #[must_use]
    pub fn empty(header: ChapterHeader) -> Self {
        Self {
            header,
            ayat: Vec::new(),
        }
    }

    /// Length of the leading run of verses numbered 1, 2, 3, ...
    #[must_use]
    pub fn contiguous_prefix(&self) -> usize {
        self.ayat
            .iter()
            .enumerate()
            .take_while(|(i, verse)| verse.ayah_no as usize == i + 1)
            .count()
    }

    /// True when every declared verse is present, numbered `1..=total_ayat`
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.ayat.len() == self.header.total_ayat as usize
            && self.contiguous_prefix() == self.ayat.len()
    }
}

/// One tafseer entry attached to a verse
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryEntry {
    /// Source id (positional or upstream, see `TafseerIdScheme`)
    pub id: u32,
    /// Name of the commentary book
    pub tafseer_book_name: String,
    /// Commentary body
    pub tafseer: String,
}

/// Commentary for every verse of a chapter, as stored in `tafseers/{n}.json`
///
/// `ayat` is keyed by verse number, so the written JSON object is always in ascending
/// verse order regardless of which fetch finished first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryDocument {
    /// Copy of the chapter header
    pub surah: ChapterHeader,
    /// Verse number to its entries (empty when no source could be reached)
    pub ayat: BTreeMap<u32, Vec<CommentaryEntry>>,
}

/// Key used to regroup verses across chapters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// 30 juz
    Juz,
    /// 60 hizb
    Hizb,
    /// Print pages
    Page,
}

impl GroupKey {
    /// All keys, in the order the pipeline compiles them
    pub const ALL: [GroupKey; 3] = [GroupKey::Juz, GroupKey::Hizb, GroupKey::Page];

    /// The group number of a verse under this key
    #[must_use]
    pub fn group_of(&self, meta: &VerseMeta) -> u32 {
        match self {
            GroupKey::Juz => meta.juz,
            GroupKey::Hizb => meta.hizb,
            GroupKey::Page => meta.page,
        }
    }

    /// Lowercase name, as used in log lines
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Juz => "juz",
            GroupKey::Hizb => "hizb",
            GroupKey::Page => "page",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verse as it appears inside a group document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseProjection {
    /// Chapter the verse belongs to
    pub surah_no: u32,
    /// Verse number
    pub ayah_no: u32,
    /// First Arabic rendering
    pub ayah_ar_v1: String,
    /// Second Arabic rendering
    pub ayah_ar_v2: String,
    /// English rendering
    pub ayah_en: String,
    /// Full metadata block
    pub meta: VerseMeta,
}

impl VerseProjection {
    /// Project a verse of chapter `surah_no`
    #[must_use]
    pub fn new(surah_no: u32, verse: &VerseRecord) -> Self {
        Self {
            surah_no,
            ayah_no: verse.ayah_no,
            ayah_ar_v1: verse.ayah_ar_v1.clone(),
            ayah_ar_v2: verse.ayah_ar_v2.clone(),
            ayah_en: verse.ayah_en.clone(),
            meta: verse.meta.clone(),
        }
    }
}
