//! HTTP implementation of [`QuranSource`] on top of reqwest

use super::QuranSource;
use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::types::{ChapterDescriptor, TafseerText, VerseMetadata, VerseText};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Metadata responses wrap the payload in `{ "code": 200, "data": { ... } }`
#[derive(Deserialize)]
struct MetadataEnvelope {
    data: VerseMetadata,
}

#[derive(Deserialize)]
struct TafseerResponse {
    #[serde(default)]
    tafseer_name: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Fetches from the public verse, metadata and tafseer APIs
#[derive(Clone, Debug)]
pub struct HttpQuranSource {
    client: reqwest::Client,
    verse_base_url: String,
    metadata_base_url: String,
    metadata_edition: String,
    tafseer_base_url: String,
    tafseer_sources: Vec<u32>,
}

impl HttpQuranSource {
    /// Build a source with its own HTTP client
    ///
    /// # Errors
    /// Returns [`Error::Network`] if the HTTP client cannot be created
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            verse_base_url: config.verse_base_url.trim_end_matches('/').to_string(),
            metadata_base_url: config.metadata_base_url.trim_end_matches('/').to_string(),
            metadata_edition: config.metadata_edition.clone(),
            tafseer_base_url: config.tafseer_base_url.trim_end_matches('/').to_string(),
            tafseer_sources: config.tafseer_sources.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::trace!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// One tafseer source for one verse
    ///
    /// Only transport failures are errors. A non-success status or a body that is not a
    /// tafseer response yields an empty entry so the source keeps its position.
    async fn tafseer_entry(&self, url: &str) -> Result<TafseerText> {
        tracing::trace!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "tafseer source failed, keeping empty entry");
            return Ok(TafseerText::default());
        }

        match serde_json::from_slice::<TafseerResponse>(&body) {
            Ok(response) => Ok(TafseerText {
                book_name: response.tafseer_name.unwrap_or_default(),
                text: response.text.unwrap_or_default(),
            }),
            Err(e) => {
                tracing::warn!(url, error = %e, "unusable tafseer body, keeping empty entry");
                Ok(TafseerText::default())
            }
        }
    }
}

#[async_trait]
impl QuranSource for HttpQuranSource {
    async fn chapter_index(&self) -> Result<Vec<ChapterDescriptor>> {
        let url = format!("{}/surah.json", self.verse_base_url);
        self.get_json(&url).await
    }

    async fn verse_text(&self, surah: u32, ayah: u32) -> Result<VerseText> {
        let url = format!("{}/{}/{}.json", self.verse_base_url, surah, ayah);
        self.get_json(&url).await
    }

    async fn verse_metadata(&self, surah: u32, ayah: u32) -> Result<VerseMetadata> {
        let url = format!(
            "{}/{}:{}/{}",
            self.metadata_base_url, surah, ayah, self.metadata_edition
        );
        let envelope: MetadataEnvelope = self.get_json(&url).await?;
        Ok(envelope.data)
    }

    async fn verse_tafseer(&self, surah: u32, ayah: u32) -> Result<Vec<TafseerText>> {
        let mut tafseer = Vec::with_capacity(self.tafseer_sources.len());

        // Sequential on purpose: one verse never has more than one tafseer request open
        for source in &self.tafseer_sources {
            let url = format!("{}/{}/{}/{}", self.tafseer_base_url, source, surah, ayah);
            tafseer.push(self.tafseer_entry(&url).await?);
        }

        Ok(tafseer)
    }
}
