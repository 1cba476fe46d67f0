use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::interface::ChatCompletionInterface;
use crate::config::LLMConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI compatible chat-completion client (OpenRouter, DeepSeek, ...)
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl OpenAICompatibleLLM {
    pub fn new(client: Client, config: &LLMConfig) -> Self {
        info!(
            "Initialized OpenAICompatibleLLM: model={}, base_url={}",
            config.model, config.base_url
        );
        Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = self.system_prompt.as_deref() {
            messages.push(Message {
                role: "system",
                content: sys,
            });
        }
        messages.push(Message {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl ChatCompletionInterface for OpenAICompatibleLLM {
    async fn complete(&self, prompt: &str) -> Result<String, anyhow::Error> {
        let request = self.build_request(prompt);
        debug!("Sending chat completion: model={}, prompt_chars={}", self.model, prompt.len());

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("OpenRouter error: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenRouter error: {}", body));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("OpenRouter error: invalid response body: {}", e))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("OpenRouter error: response contained no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| anyhow::anyhow!("OpenRouter error: first choice has no message content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_provider;

    fn config(system_prompt: Option<&str>) -> LLMConfig {
        LLMConfig {
            base_url: "http://localhost/chat".to_string(),
            api_key: "sk-test".to_string(),
            model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            max_tokens: 1000,
            system_prompt: system_prompt.map(|s| s.to_string()),
        }
    }

    #[test]
    fn request_is_single_turn_with_token_ceiling() {
        let llm = OpenAICompatibleLLM::new(Client::new(), &config(None));
        let body = serde_json::to_value(llm.build_request("Hello")).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "deepseek/deepseek-chat-v3.1:free",
                "messages": [{"role": "user", "content": "Hello"}],
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn system_prompt_precedes_user_message() {
        let llm = OpenAICompatibleLLM::new(Client::new(), &config(Some("Be terse.")));
        let body = serde_json::to_value(llm.build_request("Hello")).unwrap();

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be terse.");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn parses_first_choice() {
        let data: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":" Hola "}},{"message":{"content":"x"}}]}"#,
        )
        .unwrap();
        assert_eq!(data.choices[0].message.content.as_deref(), Some(" Hola "));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_raw_body() {
        let mut cfg = config(None);
        let (url, captured) = spawn_provider(402, r#"{"error":"insufficient credits"}"#).await;
        cfg.base_url = url;
        let llm = OpenAICompatibleLLM::new(Client::new(), &cfg);

        let err = llm.complete("Hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"OpenRouter error: {"error":"insufficient credits"}"#
        );
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn success_returns_first_choice_content() {
        let mut cfg = config(None);
        let (url, captured) =
            spawn_provider(200, r#"{"choices":[{"message":{"content":"Bonjour"}}]}"#).await;
        cfg.base_url = url;
        let llm = OpenAICompatibleLLM::new(Client::new(), &cfg);

        assert_eq!(llm.complete("Hello").await.unwrap(), "Bonjour");
        let sent = captured.lock().unwrap();
        assert_eq!(sent[0]["messages"][0]["content"], "Hello");
        assert_eq!(sent[0]["max_tokens"], 1000);
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut cfg = config(None);
        cfg.base_url = spawn_provider(200, r#"{"choices":[]}"#).await.0;
        let llm = OpenAICompatibleLLM::new(Client::new(), &cfg);

        assert!(llm.complete("Hello").await.is_err());
    }

    #[tokio::test]
    async fn missing_content_is_an_error() {
        for body in [
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
        ] {
            let mut cfg = config(None);
            cfg.base_url = spawn_provider(200, body).await.0;
            let llm = OpenAICompatibleLLM::new(Client::new(), &cfg);

            let err = llm.complete("Hello").await.unwrap_err();
            assert!(err.to_string().starts_with("OpenRouter error: "), "{}", err);
        }
    }
}
