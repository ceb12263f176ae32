//! Configuration types for quran-etl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output folder names, relative to [`Config::data_dir`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Chapter documents (default: "surahs")
    pub surahs: String,
    /// Commentary documents (default: "tafseers")
    pub tafseers: String,
    /// Juz group documents (default: "juz")
    pub juz: String,
    /// Hizb group documents (default: "hizb")
    pub hizb: String,
    /// Page group documents (default: "pages")
    pub pages: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            surahs: "surahs".to_string(),
            tafseers: "tafseers".to_string(),
            juz: "juz".to_string(),
            hizb: "hizb".to_string(),
            pages: "pages".to_string(),
        }
    }
}

/// Upstream API locations and HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Verse text and chapter index API (default: "https://quranapi.pages.dev/api")
    pub verse_base_url: String,

    /// Verse metadata API (default: "https://api.alquran.cloud/v1/ayah")
    pub metadata_base_url: String,

    /// Edition segment appended to metadata requests (default: "quran-uthmani")
    pub metadata_edition: String,

    /// Tafseer API (default: "http://api.quran-tafseer.com/tafseer")
    pub tafseer_base_url: String,

    /// Tafseer source ids requested for every verse, in output order
    /// (default: [1, 2, 3, 4, 6, 7, 8])
    pub tafseer_sources: Vec<u32>,

    /// Per-request timeout (default: 30 seconds)
    #[serde(with = "duration_millis")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            verse_base_url: "https://quranapi.pages.dev/api".to_string(),
            metadata_base_url: "https://api.alquran.cloud/v1/ayah".to_string(),
            metadata_edition: "quran-uthmani".to_string(),
            tafseer_base_url: "http://api.quran-tafseer.com/tafseer".to_string(),
            tafseer_sources: vec![1, 2, 3, 4, 6, 7, 8],
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("quran-etl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry behavior for upstream fetches and chapter runs
///
/// Retries use a fixed delay between attempts; there is no backoff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the initial attempt (default: 5, so at most 6 attempts)
    pub max_retries: u32,

    /// Delay before each retry (default: 1000 ms)
    #[serde(with = "duration_millis")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Fixed pauses that keep the sequential pipelines gentle on upstream services
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each verse's text/metadata pair is fetched (default: 100 ms)
    #[serde(with = "duration_millis")]
    pub verse_delay: Duration,

    /// Pause after each chapter before starting the next (default: 100 ms)
    #[serde(with = "duration_millis")]
    pub chapter_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            verse_delay: Duration::from_millis(100),
            chapter_delay: Duration::from_millis(100),
        }
    }
}

/// How verse commentary fetches are scheduled within a chapter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryMode {
    /// Up to [`CommentaryConfig::concurrency`] verses in flight (default)
    #[default]
    Concurrent,
    /// One verse at a time
    Sequential,
}

/// Which id is written next to each tafseer entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TafseerIdScheme {
    /// Position in the configured source list, starting at 1 (default)
    #[default]
    Positional,
    /// The upstream source id that was requested
    Source,
}

/// Commentary pipeline settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    /// Scheduling mode (default: concurrent)
    pub mode: CommentaryMode,

    /// Maximum verse fetches in flight in concurrent mode (default: 5)
    pub concurrency: usize,

    /// Id written into each entry (default: positional)
    pub id_scheme: TafseerIdScheme,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            mode: CommentaryMode::default(),
            concurrency: 5,
            id_scheme: TafseerIdScheme::default(),
        }
    }
}

impl CommentaryConfig {
    /// The limiter capacity implied by the mode
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        match self.mode {
            CommentaryMode::Concurrent => self.concurrency,
            CommentaryMode::Sequential => 1,
        }
    }
}

/// Main configuration for the pipeline
///
/// Every section has defaults, so an empty TOML file (or `Config::default()`) reproduces
/// the stock behavior: `./data` output, five retries one second apart, five concurrent
/// tafseer fetches.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of all written files (default: "data")
    pub data_dir: PathBuf,

    /// Folder names below `data_dir`
    pub folders: FolderConfig,

    /// Upstream API settings
    pub upstream: UpstreamConfig,

    /// Retry behavior
    pub retry: RetryConfig,

    /// Inter-verse and inter-chapter pauses
    pub pacing: PacingConfig,

    /// Commentary scheduling
    pub commentary: CommentaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            folders: FolderConfig::default(),
            upstream: UpstreamConfig::default(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            commentary: CommentaryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, filling unspecified fields with defaults
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if it is not
    /// valid TOML for this structure or fails [`Config::validate`].
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipelines cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.commentary.concurrency == 0 {
            return Err(Error::config(
                "must be greater than zero",
                "commentary.concurrency",
            ));
        }
        if self.upstream.tafseer_sources.is_empty() {
            return Err(Error::config(
                "at least one tafseer source is required",
                "upstream.tafseer_sources",
            ));
        }
        let urls = [
            ("upstream.verse_base_url", &self.upstream.verse_base_url),
            ("upstream.metadata_base_url", &self.upstream.metadata_base_url),
            ("upstream.tafseer_base_url", &self.upstream.tafseer_base_url),
        ];
        for (key, url) in urls {
            if url.trim().is_empty() {
                return Err(Error::config("must not be empty", key));
            }
        }
        Ok(())
    }

    /// Directory holding chapter documents
    pub fn surahs_dir(&self) -> PathBuf {
        self.data_dir.join(&self.folders.surahs)
    }

    /// Directory holding commentary documents
    pub fn tafseers_dir(&self) -> PathBuf {
        self.data_dir.join(&self.folders.tafseers)
    }
}

// Durations are written as integer milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.delay, Duration::from_millis(1000));
        assert_eq!(config.pacing.verse_delay, Duration::from_millis(100));
        assert_eq!(config.commentary.concurrency, 5);
        assert_eq!(config.upstream.tafseer_sources, vec![1, 2, 3, 4, 6, 7, 8]);
        assert_eq!(config.surahs_dir(), PathBuf::from("data/surahs"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/tmp/quran"

[retry]
delay = 250

[commentary]
mode = "sequential"
"#
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/quran"));
        assert_eq!(config.retry.delay, Duration::from_millis(250));
        assert_eq!(config.retry.max_retries, 5, "unspecified field keeps default");
        assert_eq!(config.commentary.mode, CommentaryMode::Sequential);
        assert_eq!(config.commentary.effective_concurrency(), 1);
        assert_eq!(config.folders, FolderConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retry = \"soon\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "config_error");
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.commentary.concurrency = 0;
        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("commentary.concurrency"))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_sources_and_urls() {
        let mut config = Config::default();
        config.upstream.tafseer_sources.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upstream.metadata_base_url = "  ".to_string();
        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("upstream.metadata_base_url"))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_concurrent_mode_uses_configured_capacity() {
        let config = CommentaryConfig {
            concurrency: 8,
            ..Default::default()
        };
        assert_eq!(config.effective_concurrency(), 8);
    }
}
