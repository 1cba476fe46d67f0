use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interface::TTSInterface;
use crate::google_auth::GoogleAuth;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech REST client
pub struct GoogleTTSClient {
    client: Client,
    auth: GoogleAuth,
    url: String,
}

impl GoogleTTSClient {
    pub fn new(client: Client, auth: GoogleAuth, url: String) -> Self {
        Self { client, auth, url }
    }
}

#[async_trait]
impl TTSInterface for GoogleTTSClient {
    async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, anyhow::Error> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code,
                name: voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        debug!("Sending TTS request: voice={}, language={}", voice_name, language_code);

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

        let data: SynthesizeResponse = response.json().await.map_err(|e| e.without_url())?;
        let audio = STANDARD.decode(data.audio_content)?;
        debug!("TTS synthesis successful: {} bytes", audio.len());
        Ok(audio)
    }
}
