use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use tapsim_bot::api;
use tapsim_bot::config::Config;
use tapsim_bot::metrics;
use tapsim_bot::notifier::Destination;
use tapsim_bot::poster::{spawn_hatch_poster, HatchPoster};
use tapsim_bot::render::Renderer;
use tapsim_bot::upstream::TapSimClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    metrics::register_metrics();

    let client = TapSimClient::from_config(&config);
    let renderer = Renderer::from_config(&config);

    if config.hatches_webhook_url.is_none() {
        tracing::warn!("HATCHES_WEBHOOK_URL not set; hatch updates will only be logged");
    }
    let destination = Destination::from_webhook_url(config.hatches_webhook_url.as_deref());

    // Posts immediately, then on every interval.
    let poster = HatchPoster::new(
        client.clone(),
        destination,
        renderer.clone(),
        config.post_interval_minutes,
    );
    spawn_hatch_poster(poster, config.post_interval());

    let app = api::router(client, renderer).layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(api_base = %config.api_base, "Tap Sim bot listening on {addr}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
