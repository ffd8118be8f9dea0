//! HTTP proxy in front of the OpenWeather API.
//!
//! Serves `/health`, `/weather` and `/forecast` (also under `/api`) and
//! turns every failure into a JSON `{ "error": ... }` body.

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, OpenWeatherProvider, WeatherService};

mod error;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_server=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    if !config.has_api_key() {
        tracing::warn!(
            "{} is not set; weather lookups will fail until it is configured",
            weather_core::config::ENV_API_KEY
        );
    }

    let provider = OpenWeatherProvider::from_config(&config)?;
    let state = routes::AppState {
        service: WeatherService::new(Arc::new(provider)),
    };
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, units = %config.units, "weather server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
