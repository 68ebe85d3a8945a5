use std::{error::Error, sync::Arc};

use ai_llm_service::telemetry;
use tracing::{Level, debug, info};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env before building the filter so RUST_LOG from the file applies.
    // A missing file is fine: plain environment variables work too.
    let dotenv = dotenvy::dotenv();

    let env_filter = telemetry::env_filter_with_level("info", Level::INFO);
    let app_layer = fmt::layer()
        .with_target(false)
        .with_filter(filter::filter_fn(|meta| {
            !telemetry::is_library_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(app_layer)
        .with(telemetry::layer())
        .try_init()?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env loaded"),
    }

    let cfg = api::AppConfig::from_env()?;
    info!(
        port = cfg.server.port,
        candidates = cfg.planner.candidates.len(),
        endpoint = %cfg.planner.llm.endpoint,
        "configuration loaded"
    );

    let state = Arc::new(api::AppState::from_config(&cfg)?);
    api::start(cfg.server, state).await?;

    Ok(())
}
