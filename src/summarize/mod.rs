pub mod interface;
pub mod prompt;

pub use interface::{SummarizeRequest, SummarizeResponse};
pub use prompt::summary_prompt;
