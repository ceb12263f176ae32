//! Endpoint stage: consolidated top-level files

use super::Pipeline;
use crate::error::Result;
use crate::types::{ChapterDocument, GroupKey, VerseProjection};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the consolidated chapter array
pub const SURAH_ENDPOINT: &str = "surah.json";

impl Pipeline {
    /// Write `surah.json` plus one `{folder}.json` mapping per grouping key
    ///
    /// `surah.json` holds every chapter document sorted by its `surahNo`. Each group
    /// mapping is keyed by the number in the group file's name. Unreadable files are
    /// logged and left out; a missing directory fails the stage.
    pub async fn build_endpoints(&self) -> Result<()> {
        let mut chapters: Vec<ChapterDocument> = self
            .read_numbered_dir(&self.config.surahs_dir())
            .await?
            .into_values()
            .collect();
        chapters.sort_by_key(|c| c.header.surah_no);

        let path = self.store.root().join(SURAH_ENDPOINT);
        self.store.create(&path, &chapters).await?;
        tracing::info!(chapters = chapters.len(), path = %path.display(), "endpoint written");

        for key in GroupKey::ALL {
            let folder = self.group_folder(key);
            let groups: BTreeMap<u32, Vec<VerseProjection>> =
                self.read_numbered_dir(&self.store.dir(folder)).await?;

            let path = self.store.root().join(format!("{folder}.json"));
            self.store.create(&path, &groups).await?;
            tracing::info!(key = %key, groups = groups.len(), path = %path.display(), "endpoint written");
        }

        Ok(())
    }

    /// Parse every `{n}.json` in `dir`, keyed by `n`
    async fn read_numbered_dir<T>(&self, dir: &Path) -> Result<BTreeMap<u32, T>>
    where
        T: DeserializeOwned,
    {
        let mut documents = BTreeMap::new();
        for file in self.store.list_numbered(dir).await? {
            match self.store.read(&file.path).await {
                Ok(document) => {
                    documents.insert(file.number, document);
                }
                Err(e) => {
                    tracing::error!(path = %file.path.display(), error = %e, "skipping unreadable document");
                }
            }
        }
        Ok(documents)
    }
}
