pub mod interface;
pub mod client;

pub use interface::{TTSInterface, TTSRequest, TTSResponse};
pub use client::GoogleTTSClient;
