//! Google Cloud authentication for the speech APIs
//!
//! Supports:
//! - Service Account JSON key (JWT bearer exchange)
//! - API key (`x-goog-api-key` header, kept out of URLs and error text)
//! - Pre-issued access token

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::SpeechConfig;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Speech provider credentials
#[derive(Debug, Clone)]
pub enum GoogleCredentials {
    ServiceAccount(ServiceAccountKey),
    ApiKey(String),
    AccessToken(String),
}

/// The fields of a service account key file that the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::minutes(5)
    }
}

/// Attaches Google credentials to outbound requests. Cheap to clone; clones
/// share one token cache.
#[derive(Debug, Clone)]
pub struct GoogleAuth {
    credentials: GoogleCredentials,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
    http_client: Client,
}

impl GoogleAuth {
    pub fn new(credentials: GoogleCredentials, http_client: Client) -> Self {
        Self {
            credentials,
            token_cache: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Pick the credential source from config: service account file, then
    /// access token, then API key.
    pub fn from_config(config: &SpeechConfig, http_client: Client) -> Result<Self> {
        let credentials = if let Some(path) = &config.credentials_file {
            info!("Using Google service account credentials from {}", path);
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read credentials file {}", path))?;
            Self::parse_service_account(&contents)?
        } else if let Some(token) = &config.access_token {
            info!("Using pre-issued Google access token");
            GoogleCredentials::AccessToken(token.clone())
        } else if let Some(key) = &config.api_key {
            info!("Using Google API key");
            GoogleCredentials::ApiKey(key.clone())
        } else {
            anyhow::bail!(
                "No Google speech credentials configured (set credentials_file, access_token or api_key)"
            );
        };

        Ok(Self::new(credentials, http_client))
    }

    pub fn parse_service_account(json_str: &str) -> Result<GoogleCredentials> {
        let json_obj: serde_json::Value =
            serde_json::from_str(json_str).context("Credentials file is not valid JSON")?;

        match json_obj.get("type").and_then(|t| t.as_str()) {
            Some("service_account") => {
                let key: ServiceAccountKey = serde_json::from_value(json_obj)?;
                Ok(GoogleCredentials::ServiceAccount(key))
            }
            other => Err(anyhow::anyhow!(
                "Unsupported credential type: {}",
                other.unwrap_or("<missing>")
            )),
        }
    }

    /// Add authentication to an outbound request
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match &self.credentials {
            GoogleCredentials::ApiKey(key) => Ok(request.header(API_KEY_HEADER, key)),
            GoogleCredentials::AccessToken(token) => Ok(request.bearer_auth(token)),
            GoogleCredentials::ServiceAccount(key) => {
                let token = self.service_account_token(key).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    async fn service_account_token(&self, key: &ServiceAccountKey) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let fresh = self.exchange_jwt(key).await?;
        let token = fresh.token.clone();
        *self.token_cache.write().await = Some(fresh);
        Ok(token)
    }

    async fn exchange_jwt(&self, key: &ServiceAccountKey) -> Result<CachedToken> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

        #[derive(Debug, Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &key.token_uri,
            exp: now + 3600,
            iat: now,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("Invalid service account private key")?;
        let jwt = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

        debug!("Exchanging service account JWT at {}", key.token_uri);
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];
        let response = self
            .http_client
            .post(&key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed: {}", body);
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}
