use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SpeechConfig;

/// Body of `POST /textToSpeech`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTSRequest {
    pub text: String,
    #[serde(default)]
    pub voice_name: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl TTSRequest {
    /// Voice and language to synthesize with, falling back to the configured defaults
    pub fn voice<'a>(&'a self, defaults: &'a SpeechConfig) -> (&'a str, &'a str) {
        (
            self.voice_name.as_deref().unwrap_or(&defaults.default_voice),
            self.language_code.as_deref().unwrap_or(&defaults.default_language),
        )
    }
}

/// Base64-encoded MP3 audio, named for the browser player that consumes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTSResponse {
    #[serde(rename = "audioContent")]
    pub audio_content: String,
}

/// Speech synthesis provider
#[async_trait]
pub trait TTSInterface: Send + Sync {
    /// Synthesize `text` with the given voice and language, returning MP3 bytes
    async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        language_code: &str,
    ) -> Result<Vec<u8>, anyhow::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_and_language_default_to_us_english() {
        let req: TTSRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(
            req.voice(&SpeechConfig::default()),
            ("en-US-Wavenet-D", "en-US")
        );
    }

    #[test]
    fn explicit_voice_overrides_default() {
        let req: TTSRequest = serde_json::from_str(
            r#"{"text": "hola", "voice_name": "es-ES-Wavenet-B", "language_code": "es-ES"}"#,
        )
        .unwrap();
        assert_eq!(
            req.voice(&SpeechConfig::default()),
            ("es-ES-Wavenet-B", "es-ES")
        );
    }

    #[test]
    fn response_uses_camel_case_field() {
        let body = serde_json::to_value(TTSResponse {
            audio_content: "AAE=".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"audioContent": "AAE="}));
    }
}
