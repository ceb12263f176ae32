//! In-memory upstream and pipeline constructors shared by the stage tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use super::Pipeline;
use crate::config::{Config, PacingConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::types::{ChapterDescriptor, Sajda, TafseerText, VerseMetadata, VerseText};
use crate::upstream::QuranSource;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Deterministic fake upstream with failure injection and call counters
///
/// Verse `s:a` lives on page `s`, in juz `1 + (s - 1) / 2`, hizb quarter `a`.
#[derive(Default)]
pub(crate) struct FakeSource {
    pub chapters: Vec<ChapterDescriptor>,
    pub tafseer_sources: usize,
    pub tafseer_latency: Duration,
    text_failures: Mutex<HashMap<(u32, u32), u32>>,
    tafseer_broken: Mutex<HashSet<(u32, u32)>>,
    pub index_fails: bool,
    pub text_calls: AtomicU32,
    pub meta_calls: AtomicU32,
    pub tafseer_calls: AtomicU32,
    tafseer_in_flight: AtomicUsize,
    pub tafseer_peak: AtomicUsize,
}

impl FakeSource {
    pub fn with_chapters(chapters: &[(&str, u32)]) -> Self {
        Self {
            chapters: chapters
                .iter()
                .map(|(name, total)| descriptor(name, *total))
                .collect(),
            tafseer_sources: 7,
            ..Default::default()
        }
    }

    /// Make the next `times` text lookups of `surah:ayah` fail
    pub fn fail_text(&self, surah: u32, ayah: u32, times: u32) {
        self.text_failures
            .lock()
            .unwrap()
            .insert((surah, ayah), times);
    }

    /// Make every tafseer lookup of `surah:ayah` fail
    pub fn break_tafseer(&self, surah: u32, ayah: u32) {
        self.tafseer_broken.lock().unwrap().insert((surah, ayah));
    }
}

pub(crate) fn descriptor(name: &str, total_ayah: u32) -> ChapterDescriptor {
    ChapterDescriptor {
        surah_name: name.to_string(),
        surah_name_arabic: format!("{name} (ar)"),
        surah_name_arabic_long: format!("surah {name} (ar)"),
        revelation_place: "Mecca".to_string(),
        total_ayah,
    }
}

fn upstream_down(what: &str) -> Error {
    Error::UpstreamStatus {
        url: format!("fake://{what}"),
        status: 503,
    }
}

#[async_trait]
impl QuranSource for FakeSource {
    async fn chapter_index(&self) -> Result<Vec<ChapterDescriptor>> {
        if self.index_fails {
            return Err(upstream_down("surah.json"));
        }
        Ok(self.chapters.clone())
    }

    async fn verse_text(&self, surah: u32, ayah: u32) -> Result<VerseText> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut failures = self.text_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&(surah, ayah))
                && *remaining > 0
            {
                *remaining -= 1;
                return Err(upstream_down("verse"));
            }
        }
        Ok(VerseText {
            ayah_no: ayah,
            arabic1: format!("ar1 {surah}:{ayah}"),
            arabic2: format!("ar2 {surah}:{ayah}"),
            english: format!("en {surah}:{ayah}"),
        })
    }

    async fn verse_metadata(&self, surah: u32, ayah: u32) -> Result<VerseMetadata> {
        self.meta_calls.fetch_add(1, Ordering::SeqCst);
        Ok(VerseMetadata {
            page: surah,
            juz: 1 + (surah - 1) / 2,
            hizb_quarter: ayah,
            sajda: Sajda::default(),
        })
    }

    async fn verse_tafseer(&self, surah: u32, ayah: u32) -> Result<Vec<TafseerText>> {
        self.tafseer_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.tafseer_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.tafseer_peak.fetch_max(now, Ordering::SeqCst);

        // Later verses answer sooner, so completions arrive out of order
        let latency = self
            .tafseer_latency
            .saturating_sub(Duration::from_millis(u64::from(ayah)));
        tokio::time::sleep(latency).await;
        self.tafseer_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.tafseer_broken.lock().unwrap().contains(&(surah, ayah)) {
            return Err(upstream_down("tafseer"));
        }
        Ok((1..=self.tafseer_sources)
            .map(|n| TafseerText {
                book_name: format!("Book {n}"),
                text: format!("tafseer {n} on {surah}:{ayah}"),
            })
            .collect())
    }
}

/// Config with no pacing and fast retries, writing into `temp_dir`
pub(crate) fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        data_dir: temp_dir.path().join("data"),
        retry: RetryConfig {
            max_retries: 2,
            delay: Duration::from_millis(1),
        },
        pacing: PacingConfig {
            verse_delay: Duration::ZERO,
            chapter_delay: Duration::ZERO,
        },
        ..Default::default()
    }
}

pub(crate) fn test_pipeline(source: Arc<FakeSource>) -> (Pipeline, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = test_config(&temp_dir);
    let pipeline = Pipeline::new(config, source).unwrap();
    (pipeline, temp_dir)
}
