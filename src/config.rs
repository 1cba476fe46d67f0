use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    pub llm_config: LLMConfig,
    #[serde(default)]
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Configuration for the OpenAI-compatible chat provider (OpenRouter by default)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(rename = "llm_api_key", alias = "api_key")]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_llm_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3.1:free".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

/// Google Cloud speech settings. Exactly one credential source is used,
/// in the order service account file, access token, API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub credentials_file: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_tts_url")]
    pub tts_url: String,
    #[serde(default = "default_stt_url")]
    pub stt_url: String,
    #[serde(default = "default_voice")]
    pub default_voice: String,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_tts_url() -> String {
    "https://texttospeech.googleapis.com/v1/text:synthesize".to_string()
}

fn default_stt_url() -> String {
    "https://speech.googleapis.com/v1/speech:recognize".to_string()
}

fn default_voice() -> String {
    "en-US-Wavenet-D".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = load_text_file(path)?;
        let content = substitute_env_vars(&content)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }

    /// Try the known config locations in order, falling back to the environment
    /// only when none of them exists.
    pub fn discover() -> Result<(Self, String)> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let config_paths: Vec<String> = vec![
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
            exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
            exe_dir.join("conf.json").to_str().map(|s| s.to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if let Some(found) = Self::load_first(&config_paths)? {
            return Ok(found);
        }

        let config = Config::from_env().map_err(|e| {
            anyhow::anyhow!("No config file found (tried {:?}) and {}", config_paths, e)
        })?;
        Ok((config, "environment".to_string()))
    }

    /// Load the first existing file among `paths`. A file that exists but
    /// fails to load is an error, not a reason to try the next one.
    pub fn load_first(paths: &[String]) -> Result<Option<(Self, String)>> {
        for path in paths {
            if !Path::new(path).exists() {
                debug!("No config at {}", path);
                continue;
            }
            let config = Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            return Ok(Some((config, path.clone())));
        }
        Ok(None)
    }

    /// Build a config from environment variables only.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY is not set"))?;

        let port = match std::env::var("PORT") {
            Ok(p) => p.parse()?,
            Err(_) => default_port(),
        };

        Ok(Self {
            system_config: SystemConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
                port,
                log_level: None,
            },
            llm_config: LLMConfig {
                base_url: std::env::var("OPENROUTER_URL").unwrap_or_else(|_| default_llm_base_url()),
                api_key,
                model: std::env::var("LLM_MODEL").unwrap_or_else(|_| default_model()),
                max_tokens: default_max_tokens(),
                system_prompt: None,
            },
            speech_config: SpeechConfig {
                credentials_file: std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
                api_key: std::env::var("GOOGLE_API_KEY").ok(),
                ..SpeechConfig::default()
            },
        })
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as-is
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    Ok(pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}

/// Read a UTF-8 text file, stripping a BOM if present
fn load_text_file(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    let (cow, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        anyhow::bail!("Configuration file is not valid UTF-8: {}", file_path);
    }
    Ok(cow.into_owned())
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            credentials_file: None,
            access_token: None,
            api_key: None,
            tts_url: default_tts_url(),
            stt_url: default_stt_url(),
            default_voice: default_voice(),
            default_language: default_language(),
        }
    }
}
