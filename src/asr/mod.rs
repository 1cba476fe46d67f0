pub mod interface;
pub mod client;

pub use interface::{join_transcripts, ASRInterface, RecognitionResult, STTRequest, STTResponse};
pub use client::GoogleSTTClient;
