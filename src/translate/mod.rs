pub mod interface;
pub mod prompt;

pub use interface::{TranslationRequest, TranslationResponse};
pub use prompt::translation_prompt;
