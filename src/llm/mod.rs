pub mod interface;
pub mod openai_compatible_llm;

pub use interface::ChatCompletionInterface;
pub use openai_compatible_llm::OpenAICompatibleLLM;
