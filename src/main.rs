mod asr;
mod config;
mod error;
mod google_auth;
mod llm;
mod routes;
mod state;
mod summarize;
mod translate;
mod tts;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "nlp_gateway=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Startup logging until the configured filter is known
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .finish();
    let (config, loaded_from) = tracing::subscriber::with_default(bootstrap, Config::discover)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            config
                .system_config
                .log_level
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILTER),
        )
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Loaded configuration from: {}", loaded_from);

    // Provider clients are built once and shared by every request
    let app_state = AppState::new(config.clone())?;
    let app = routes::build_app(app_state);

    let system = &config.system_config;
    let listener = tokio::net::TcpListener::bind((system.host.as_str(), system.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
