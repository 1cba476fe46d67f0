//! Speech recognition interface and the `/speechToText` payloads

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /speechToText`: base64-encoded LINEAR16 audio
#[derive(Debug, Serialize, Deserialize)]
pub struct STTRequest {
    pub audio_content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct STTResponse {
    pub transcription: String,
}

/// One recognized segment, alternatives ranked best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[cfg(test)]
impl RecognitionResult {
    /// Convenience constructor for a segment with a single alternative
    pub fn single(transcript: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Alternative {
                transcript: transcript.into(),
                confidence: None,
            }],
        }
    }
}

#[async_trait]
pub trait ASRInterface: Send + Sync {
    /// Recognize raw LINEAR16 `audio` as US English, returning segments in order
    async fn recognize(&self, audio: Vec<u8>) -> Result<Vec<RecognitionResult>, anyhow::Error>;
}

/// Space-join the top alternative of every segment, keeping segment order.
/// Segments without alternatives contribute nothing.
pub fn join_transcripts(results: &[RecognitionResult]) -> String {
    results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|alt| alt.transcript.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
