//! The fetch, regroup and aggregate stages
//!
//! [`Pipeline`] owns the configuration, the document store and the upstream source. Each
//! stage lives in its own submodule as an `impl Pipeline` block:
//!
//! - [`chapter`] materializes one chapter document verse by verse
//! - [`corpus`] drives the chapter stage over the whole chapter index
//! - [`commentary`] fetches tafseer for every stored verse under a concurrency cap
//! - [`grouping`] regroups stored verses by juz, hizb or page
//! - [`endpoints`] concatenates everything into the top-level files
//! - [`audit`] reports which chapter documents are complete
//!
//! Stages only communicate through files: every stage reads what an earlier stage wrote.

use crate::config::Config;
use crate::error::Result;
use crate::store::JsonStore;
use crate::types::GroupKey;
use crate::upstream::QuranSource;
use std::sync::Arc;
use std::time::Instant;

pub mod audit;
pub mod chapter;
pub mod commentary;
pub mod corpus;
pub mod endpoints;
pub mod grouping;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use audit::{CorpusAudit, IncompleteChapter};
pub use commentary::CommentarySummary;
pub use corpus::CorpusSummary;
pub use grouping::GroupSummary;

/// Which part of the pipeline to run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Stage {
    /// Every stage in order (default)
    #[default]
    All,
    /// Chapter documents
    Surahs,
    /// Commentary documents
    Tafseers,
    /// Juz groups
    Juz,
    /// Hizb groups
    Hizb,
    /// Page groups
    Pages,
    /// Consolidated endpoint files
    Endpoints,
}

/// Runs the pipeline stages against one data directory
pub struct Pipeline {
    pub(crate) config: Arc<Config>,
    pub(crate) store: JsonStore,
    pub(crate) source: Arc<dyn QuranSource>,
}

impl Pipeline {
    /// Create a pipeline writing below `config.data_dir`
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if the configuration fails validation
    pub fn new(config: Config, source: Arc<dyn QuranSource>) -> Result<Self> {
        config.validate()?;
        let store = JsonStore::new(&config.data_dir);
        Ok(Self {
            config: Arc::new(config),
            store,
            source,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The document store
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Folder holding the group documents for `key`
    pub(crate) fn group_folder(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::Juz => &self.config.folders.juz,
            GroupKey::Hizb => &self.config.folders.hizb,
            GroupKey::Page => &self.config.folders.pages,
        }
    }

    /// Run `stage` (or every stage, in order, for [`Stage::All`])
    ///
    /// Per-item failures inside a stage are logged and absorbed by the stage itself; an
    /// error returned here means a stage could not run at all (unreadable directory,
    /// unreachable chapter index) and later stages were not attempted.
    pub async fn run(&self, stage: Stage) -> Result<()> {
        let started = Instant::now();

        if matches!(stage, Stage::All | Stage::Surahs) {
            tracing::info!("Starting surah data fetch");
            let summary = self.fetch_surahs().await?;
            tracing::info!(
                chapters = summary.chapters,
                failed = summary.failed.len(),
                "Surah data fetch completed"
            );
            self.audit_corpus().await?.log();
        }

        if matches!(stage, Stage::All | Stage::Tafseers) {
            tracing::info!(mode = ?self.config.commentary.mode, "Starting tafseer fetch");
            let summary = self.fetch_tafseers().await?;
            tracing::info!(
                chapters = summary.chapters,
                verses = summary.verses,
                empty_verses = summary.empty_verses,
                "Tafseer fetch completed"
            );
        }

        let groups = [
            (Stage::Juz, GroupKey::Juz),
            (Stage::Hizb, GroupKey::Hizb),
            (Stage::Pages, GroupKey::Page),
        ];
        for (group_stage, key) in groups {
            if stage == Stage::All || stage == group_stage {
                tracing::info!(key = %key, "Starting group compilation");
                let summary = self.compile_groups(key).await?;
                tracing::info!(
                    key = %key,
                    groups = summary.groups,
                    verses = summary.verses,
                    "Group compilation completed"
                );
            }
        }

        if matches!(stage, Stage::All | Stage::Endpoints) {
            tracing::info!("Starting endpoint compilation");
            self.build_endpoints().await?;
            tracing::info!("Endpoint compilation completed");
        }

        tracing::info!(
            stage = ?stage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Data fetch finished"
        );
        Ok(())
    }
}
