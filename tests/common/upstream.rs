//! wiremock stand-ins for the three upstream APIs

use super::fixtures;
use quran_etl::config::{Config, PacingConfig, RetryConfig, UpstreamConfig};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Tafseer sources used by the tests (the production list skips 5 the same way)
pub const TAFSEER_SOURCES: [u32; 7] = [1, 2, 3, 4, 6, 7, 8];

/// Pipeline config pointing every API at `server` and writing into `data_dir`
pub fn config_for(server: &MockServer, data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        upstream: UpstreamConfig {
            verse_base_url: format!("{}/api", server.uri()),
            metadata_base_url: format!("{}/v1/ayah", server.uri()),
            tafseer_base_url: format!("{}/tafseer", server.uri()),
            tafseer_sources: TAFSEER_SOURCES.to_vec(),
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        },
        retry: RetryConfig {
            max_retries: 2,
            delay: Duration::from_millis(5),
        },
        pacing: PacingConfig {
            verse_delay: Duration::ZERO,
            chapter_delay: Duration::ZERO,
        },
        ..Default::default()
    }
}

/// Serve the full Al-Fatihah fixture set
pub async fn mount_fatiha(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/surah.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::chapter_index()))
        .mount(server)
        .await;

    for ayah in 1..=fixtures::FATIHA_VERSES {
        Mock::given(method("GET"))
            .and(path(format!("/api/1/{ayah}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::verse_text(ayah)))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/ayah/1:{ayah}/quran-uthmani")))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::verse_metadata(ayah)))
            .mount(server)
            .await;

        for source in TAFSEER_SOURCES {
            Mock::given(method("GET"))
                .and(path(format!("/tafseer/{source}/1/{ayah}")))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(fixtures::tafseer(source, ayah)),
                )
                .mount(server)
                .await;
        }
    }
}

/// Answer tafseer `source` for `1:ayah` with `status` and a non-tafseer body
pub async fn fail_tafseer_source(server: &MockServer, source: u32, ayah: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/tafseer/{source}/1/{ayah}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"detail": "Not found."})))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Stall every tafseer request for `1:ayah` past [`STALL_TIMEOUT`]
pub async fn stall_tafseer(server: &MockServer, ayah: u32) {
    Mock::given(method("GET"))
        .and(path_regex(format!(r"^/tafseer/\d+/1/{ayah}$")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Request timeout to pair with [`stall_tafseer`]
pub const STALL_TIMEOUT: Duration = Duration::from_millis(200);
