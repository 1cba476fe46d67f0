use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::asr::{join_transcripts, STTRequest, STTResponse};
use crate::error::{self, GatewayError};
use crate::state::AppState;
use crate::summarize::{summary_prompt, SummarizeRequest, SummarizeResponse};
use crate::translate::{translation_prompt, TranslationRequest, TranslationResponse};
use crate::tts::{TTSRequest, TTSResponse};

/// Room for one minute of 48 kHz LINEAR16 audio once base64-encoded
pub const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Liveness
        .route("/", get(root))
        // Chat provider
        .route("/translate", post(translate))
        .route("/summarize", post(summarize))
        // Speech provider
        .route("/textToSpeech", post(text_to_speech))
        .route("/speechToText", post(speech_to_text))
}

/// Full application: routes, open CORS and request tracing
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "🚀 NLP backend is running" }))
}

fn require_text(text: &str) -> Result<(), GatewayError> {
    if text.trim().is_empty() {
        return Err(GatewayError::validation("text must not be empty"));
    }
    Ok(())
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, GatewayError> {
    let Json(req) = payload?;
    require_text(&req.text)?;

    info!("Translating {} chars from {} to {}", req.text.len(), req.source_lang, req.target_lang);
    let translated = state
        .llm
        .complete(&translation_prompt(&req))
        .await
        .map_err(|e| GatewayError::provider(error::TRANSLATION, e))?;

    Ok(Json(TranslationResponse {
        translation: translated.trim().to_string(),
    }))
}

async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, GatewayError> {
    let Json(req) = payload?;
    require_text(&req.text)?;

    info!("Summarizing {} chars ({:?})", req.text.len(), req.summary_length());
    let summary = state
        .llm
        .complete(&summary_prompt(&req))
        .await
        .map_err(|e| GatewayError::provider(error::SUMMARIZATION, e))?;

    Ok(Json(SummarizeResponse {
        summary: summary.trim().to_string(),
    }))
}

async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<TTSRequest>, JsonRejection>,
) -> Result<Json<TTSResponse>, GatewayError> {
    let Json(req) = payload?;
    require_text(&req.text)?;

    let (voice_name, language_code) = req.voice(&state.config.speech_config);
    info!("Synthesizing {} chars with {} ({})", req.text.len(), voice_name, language_code);
    let audio = state
        .tts
        .synthesize(&req.text, voice_name, language_code)
        .await
        .map_err(|e| GatewayError::provider(error::TTS, e))?;

    Ok(Json(TTSResponse {
        audio_content: STANDARD.encode(audio),
    }))
}

async fn speech_to_text(
    State(state): State<AppState>,
    payload: Result<Json<STTRequest>, JsonRejection>,
) -> Result<Json<STTResponse>, GatewayError> {
    let Json(req) = payload?;
    if req.audio_content.trim().is_empty() {
        return Err(GatewayError::validation("audio_content must not be empty"));
    }

    let audio = STANDARD
        .decode(req.audio_content.trim())
        .map_err(|e| GatewayError::decode(error::STT, format!("invalid base64 audio: {}", e)))?;

    info!("Transcribing {} bytes of audio", audio.len());
    let results = state
        .asr
        .recognize(audio)
        .await
        .map_err(|e| GatewayError::provider(error::STT, e))?;

    Ok(Json(STTResponse {
        transcription: join_transcripts(&results),
    }))
}
