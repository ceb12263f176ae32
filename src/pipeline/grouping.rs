//! Grouping stage: regroup stored verses by juz, hizb or page

use super::Pipeline;
use crate::error::Result;
use crate::types::{ChapterDocument, GroupKey, VerseProjection};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of one grouping run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group documents written
    pub groups: usize,
    /// Verses distributed across them
    pub verses: usize,
    /// Chapter files that could not be read
    pub skipped_files: Vec<PathBuf>,
    /// Group files from an earlier run whose group no longer occurs
    pub removed: usize,
}

impl Pipeline {
    /// Write one `{group}.json` per group number found under `key`
    ///
    /// Chapter documents are scanned in ascending chapter order and verses are appended to
    /// their group in scan order, so each group lists chapter-ascending then
    /// verse-ascending. Group numbers are taken as found; no range is assumed. A chapter
    /// file that cannot be read is logged and skipped. Group files left by an earlier run
    /// for groups that no longer occur are removed.
    pub async fn compile_groups(&self, key: GroupKey) -> Result<GroupSummary> {
        let folder = self.group_folder(key);
        tokio::fs::create_dir_all(self.store.dir(folder)).await?;

        let mut summary = GroupSummary::default();
        let mut groups: BTreeMap<u32, Vec<VerseProjection>> = BTreeMap::new();

        for file in self.store.list_numbered(&self.config.surahs_dir()).await? {
            let chapter: ChapterDocument = match self.store.read(&file.path).await {
                Ok(chapter) => chapter,
                Err(e) => {
                    tracing::error!(path = %file.path.display(), error = %e, "skipping unreadable chapter document");
                    summary.skipped_files.push(file.path);
                    continue;
                }
            };

            for verse in &chapter.ayat {
                groups
                    .entry(key.group_of(&verse.meta))
                    .or_default()
                    .push(VerseProjection::new(chapter.header.surah_no, verse));
                summary.verses += 1;
            }
        }

        let group_dir = self.store.dir(folder);
        for file in self.store.list_numbered(&group_dir).await? {
            if !groups.contains_key(&file.number) {
                tokio::fs::remove_file(&file.path).await?;
                tracing::info!(key = %key, group = file.number, "removed stale group document");
                summary.removed += 1;
            }
        }

        for (group, verses) in &groups {
            let path = self.store.numbered_path(folder, *group);
            self.store.create(&path, verses).await?;
            tracing::debug!(key = %key, group, verses = verses.len(), "group document written");
        }

        summary.groups = groups.len();
        tracing::info!(key = %key, groups = summary.groups, "all groups processed");
        Ok(summary)
    }
}
