use std::sync::Arc;

use reqwest::Client;

use crate::asr::{ASRInterface, GoogleSTTClient};
use crate::config::Config;
use crate::google_auth::GoogleAuth;
use crate::llm::{ChatCompletionInterface, OpenAICompatibleLLM};
use crate::tts::{GoogleTTSClient, TTSInterface};

/// Provider handles shared read-only by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn ChatCompletionInterface>,
    pub tts: Arc<dyn TTSInterface>,
    pub asr: Arc<dyn ASRInterface>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = Client::new();

        let llm = Arc::new(OpenAICompatibleLLM::new(
            http_client.clone(),
            &config.llm_config,
        ));

        let speech = &config.speech_config;
        let auth = GoogleAuth::from_config(speech, http_client.clone())?;
        let tts = Arc::new(GoogleTTSClient::new(
            http_client.clone(),
            auth.clone(),
            speech.tts_url.clone(),
        ));
        let asr = Arc::new(GoogleSTTClient::new(
            http_client,
            auth,
            speech.stt_url.clone(),
        ));

        Ok(Self::with_clients(config, llm, tts, asr))
    }

    /// Assemble state from already-built provider clients
    pub fn with_clients(
        config: Config,
        llm: Arc<dyn ChatCompletionInterface>,
        tts: Arc<dyn TTSInterface>,
        asr: Arc<dyn ASRInterface>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            llm,
            tts,
            asr,
        }
    }
}
