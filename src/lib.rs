//! # quran-etl
//!
//! Batch pipeline that builds a static JSON dataset of the Quran from public REST APIs.
//!
//! ## Stages
//!
//! 1. **Surahs** - one document per chapter, filled verse by verse from the verse text and
//!    verse metadata APIs (`surahs/{n}.json`)
//! 2. **Tafseers** - commentary from several tafseer books for every stored verse
//!    (`tafseers/{n}.json`)
//! 3. **Groups** - verses regrouped by juz, hizb and page (`juz/`, `hizb/`, `pages/`)
//! 4. **Endpoints** - consolidated `surah.json`, `juz.json`, `hizb.json`, `pages.json`
//!
//! Stages hand data to each other only through files, and every file on disk is a valid
//! document at all times, so an interrupted run can simply be started again: complete
//! chapters are skipped and partial ones resume after their last stored verse.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quran_etl::{Config, HttpQuranSource, Pipeline, Stage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = HttpQuranSource::new(&config.upstream)?;
//!     let pipeline = Pipeline::new(config, Arc::new(source))?;
//!
//!     pipeline.run(Stage::All).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Bounded concurrency for upstream requests
pub mod limiter;
/// Fetch, regroup and aggregate stages
pub mod pipeline;
/// Retry logic with a fixed delay
pub mod retry;
/// Incremental JSON document store
pub mod store;
/// Upstream and persisted data types
pub mod types;
/// Upstream API adapters
pub mod upstream;

// Re-export commonly used types
pub use config::{CommentaryMode, Config, TafseerIdScheme};
pub use error::{Error, Result};
pub use pipeline::{CorpusAudit, Pipeline, Stage};
pub use store::JsonStore;
pub use upstream::{HttpQuranSource, QuranSource};
