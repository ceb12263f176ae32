//! Incremental JSON document store
//!
//! All pipeline output goes through [`JsonStore`]: whole-document writes, the
//! read-append-rewrite used while a chapter is being fetched, and numbered directory
//! listings used by the later stages.
//!
//! Writes go to a sibling `.tmp` file that is renamed over the target, so an interrupted
//! run leaves either the previous or the new document on disk, never a truncated one.
//! Appends are not synchronized; each file must have a single writer at a time.

use crate::error::{Error, Result};
use crate::types::{ChapterDocument, VerseRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// A `{number}.json` file found in a numbered directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberedFile {
    /// Number parsed from the file stem
    pub number: u32,
    /// Full path of the file
    pub path: PathBuf,
}

/// Reads and writes pretty-printed JSON documents below a data directory
#[derive(Clone, Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `root` (nothing is created on disk yet)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `folder` below the data directory
    pub fn dir(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    /// Path of `{number}.json` inside `folder`
    pub fn numbered_path(&self, folder: &str, number: u32) -> PathBuf {
        self.dir(folder).join(format!("{number}.json"))
    }

    /// Write `document` to `path`, creating parent directories and replacing any
    /// existing file
    pub async fn create<T>(&self, path: &Path, document: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await?;
        tokio::fs::rename(&temp_path, path).await?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote JSON document");
        Ok(())
    }

    /// Read and parse the JSON document at `path`
    pub async fn read<T>(&self, path: &Path) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let content = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Read the chapter document at `path` if the file exists
    pub async fn read_chapter_if_exists(&self, path: &Path) -> Result<Option<ChapterDocument>> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(None);
        }
        self.read(path).await.map(Some)
    }

    /// Append one verse to the chapter document at `path` and rewrite it
    ///
    /// The document must already exist; appending to a missing file fails with
    /// [`Error::MissingDocument`] instead of silently dropping the verse. A verse whose
    /// number does not follow the last stored verse fails with [`Error::InvalidDocument`].
    ///
    /// Returns the number of verses stored after the append.
    pub async fn append_verse(&self, path: &Path, verse: &VerseRecord) -> Result<usize> {
        if !tokio::fs::try_exists(path).await? {
            return Err(Error::MissingDocument {
                path: path.to_path_buf(),
            });
        }

        let mut document: ChapterDocument = self.read(path).await?;

        if let Some(last) = document.ayat.last()
            && verse.ayah_no <= last.ayah_no
        {
            return Err(Error::InvalidDocument {
                path: path.to_path_buf(),
                reason: format!(
                    "verse {} does not follow stored verse {}",
                    verse.ayah_no, last.ayah_no
                ),
            });
        }

        document.ayat.push(verse.clone());
        self.create(path, &document).await?;

        tracing::debug!(
            surah = document.header.surah_no,
            ayah = verse.ayah_no,
            "added verse to chapter document"
        );
        Ok(document.ayat.len())
    }

    /// List `{number}.json` files in `dir`, sorted by number ascending
    ///
    /// Files without a `.json` extension are ignored. A `.json` file whose stem is not a
    /// number is logged and skipped.
    pub async fn list_numbered(&self, dir: &Path) -> Result<Vec<NumberedFile>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let number = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok());

            match number {
                Some(number) => files.push(NumberedFile { number, path }),
                None => {
                    tracing::warn!(path = %path.display(), "skipping file without numeric name");
                }
            }
        }

        files.sort_by_key(|f| f.number);
        Ok(files)
    }
}
