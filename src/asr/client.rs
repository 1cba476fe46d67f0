use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interface::{ASRInterface, RecognitionResult};
use crate::google_auth::GoogleAuth;

const RECOGNITION_LANGUAGE: &str = "en-US";

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    language_code: &'static str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    // absent when nothing was recognized
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

/// Google Cloud Speech-to-Text REST client
pub struct GoogleSTTClient {
    client: Client,
    auth: GoogleAuth,
    url: String,
}

impl GoogleSTTClient {
    pub fn new(client: Client, auth: GoogleAuth, url: String) -> Self {
        Self { client, auth, url }
    }
}

#[async_trait]
impl ASRInterface for GoogleSTTClient {
    async fn recognize(&self, audio: Vec<u8>) -> Result<Vec<RecognitionResult>, anyhow::Error> {
        debug!("Sending STT request: {} bytes of audio", audio.len());

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                language_code: RECOGNITION_LANGUAGE,
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(&audio),
            },
        };

        let response = self
            .auth
            .authorize(self.client.post(&self.url))
            .await?
            .json(&request)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", body);
        }

        let data: RecognizeResponse = response.json().await.map_err(|e| e.without_url())?;
        debug!("STT returned {} segments", data.results.len());
        Ok(data.results)
    }
}
