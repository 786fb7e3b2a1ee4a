use std::sync::Arc;

use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradepulse::config::Config;
use tradepulse::services::OutcomeResolver;
use tradepulse::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradepulse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    for issue in config.validate() {
        warn!("config: {issue}");
    }
    info!("Starting tradepulse server on {}:{}", config.host, config.port);

    let resolver_interval = config.resolver_interval_secs;
    let state = AppState::new(config);

    // Background outcome resolution: every pass settles all pending
    // signals whose expiry has passed. Feed failures defer signals to
    // the next pass.
    {
        let resolver = Arc::new(OutcomeResolver::new(
            state.store.clone(),
            state.market_data.clone(),
        ));
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(resolver_interval));
            loop {
                interval.tick().await;
                resolver.run_pass(Utc::now()).await;
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start the server
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("tradepulse server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
