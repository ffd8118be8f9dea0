use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weather_core::{DailyForecast, WeatherService};

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: WeatherService,
}

/// Raw query pairs, so a missing or repeated `city` still reaches the handler
/// and gets a JSON body instead of the extractor's plain-text rejection.
type QueryPairs = Query<Vec<(String, String)>>;

/// First `city` parameter, or `""` when absent.
fn city_param(pairs: &[(String, String)]) -> &str {
    pairs
        .iter()
        .find(|(key, _)| key == "city")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/weather", get(weather))
        .route("/forecast", get(forecast));

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn weather(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<Value>, ApiError> {
    let body = state.service.current(city_param(&pairs)).await?;
    Ok(Json(body))
}

async fn forecast(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<DailyForecast>, ApiError> {
    let forecast = state.service.forecast(city_param(&pairs)).await?;
    Ok(Json(forecast))
}
