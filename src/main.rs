use std::sync::Arc;

use tandem_relay::api::{self, AppState};
use tandem_relay::config::{self, ConfigSource, ProcessEnv, UpstreamConfig};
use tandem_relay::tandem::TandemClient;
use tandem_relay::whisper::LocalWhisperClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file if present

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let env: Arc<dyn ConfigSource> = Arc::new(ProcessEnv);
    let http = reqwest::Client::new();

    let state = Arc::new(AppState {
        search: Arc::new(TandemClient::new(http.clone(), env.clone())),
        transcriber: Arc::new(LocalWhisperClient::new(http, env.clone())),
        config: env.clone(),
    });

    let port = config::server_port(env.as_ref());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("server running on http://localhost:{port}");

    let startup = UpstreamConfig::load(env.as_ref());
    if startup.tandem_configured() {
        tracing::info!("Tandem API configured and ready");
    } else {
        tracing::warn!("Tandem API not configured, set TANDEM_API_URL and TANDEM_API_KEY");
    }
    if startup.whisper_configured() {
        tracing::info!("Local Whisper API configured and ready");
    } else {
        tracing::warn!("Local Whisper API not configured, set LOCAL_WHISPER_URL");
    }

    axum::serve(listener, api::create_router(state)).await?;
    Ok(())
}
