//! HTTP API and server-rendered dashboard page

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::access;
use crate::aggregator::Aggregator;
use crate::config::Configuration;
use crate::error::LaunchpadError;
use crate::probe::Prober;
use crate::status::BoardHandle;
use crate::store::ConfigStore;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<ConfigStore>,
    pub board: BoardHandle,
    pub aggregator: Arc<Aggregator>,
    pub prober: Arc<dyn Prober>,
}

/// Build the launchpad axum router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/config",
            get(get_config_handler).post(post_config_handler),
        )
        .route("/api/check-status", get(check_status_handler))
        .route("/api/verify-passcode", post(verify_passcode_handler))
        .route("/api/status", get(status_handler))
        .route("/api/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_config_handler(State(api): State<ApiState>) -> Response {
    match api.store.get().await {
        Ok(config) => Json(config).into_response(),
        Err(e) => {
            tracing::error!("Reading configuration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Failed to fetch configuration"})),
            )
                .into_response()
        }
    }
}

async fn post_config_handler(
    State(api): State<ApiState>,
    Json(candidate): Json<Configuration>,
) -> Response {
    match api.store.replace(&candidate).await {
        Ok(()) => Json(json!({"message": "Configuration saved successfully"})).into_response(),
        Err(LaunchpadError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Invalid configuration format",
                "errors": errors,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Saving configuration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Failed to save configuration"})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckStatusParams {
    url: Option<String>,
    #[serde(default)]
    verify_tls: bool,
}

async fn check_status_handler(
    State(api): State<ApiState>,
    Query(params): Query<CheckStatusParams>,
) -> Response {
    let Some(url) = params.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "URL parameter is required"})),
        )
            .into_response();
    };

    let status = api.prober.probe(&url, params.verify_tls).await;
    Json(json!({"status": status})).into_response()
}

#[derive(Debug, Deserialize)]
struct VerifyPasscodeBody {
    #[serde(default)]
    passcode: String,
}

async fn verify_passcode_handler(
    State(api): State<ApiState>,
    Json(body): Json<VerifyPasscodeBody>,
) -> Response {
    match api.store.get().await {
        Ok(config) => {
            Json(json!({"valid": access::check(&config, &body.passcode)})).into_response()
        }
        Err(e) => {
            tracing::error!("Reading configuration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Error verifying passcode"})),
            )
                .into_response()
        }
    }
}

async fn status_handler(State(api): State<ApiState>) -> Response {
    let board = api.board.read().await;
    Json(board.clone()).into_response()
}

async fn refresh_handler(State(api): State<ApiState>) -> Response {
    match api.aggregator.refresh().await {
        Ok(board) => Json(board).into_response(),
        Err(e) => {
            tracing::warn!("Manual refresh failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"message": "Status refresh is currently unavailable"})),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn index_handler(State(api): State<ApiState>) -> impl IntoResponse {
    let board = api.board.read().await;

    let cards: String = board
        .apps
        .iter()
        .map(|entry| {
            let (color, bg) = match entry.status {
                crate::status::Status::Online => ("#155724", "#d4edda"),
                crate::status::Status::Offline => ("#721c24", "#f8d7da"),
                crate::status::Status::Pending => ("#383d41", "#e2e3e5"),
            };
            format!(
                r#"<div style="border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 1rem;">
                    <div style="font-size: 2rem;">{icon}</div>
                    <h3 style="margin: 0.25rem 0;"><a href="{url}">{name}</a></h3>
                    <p style="margin: 0.25rem 0; color: #6c757d;">{description}</p>
                    <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {color}; background-color: {bg};">{status}</span>
                </div>"#,
                icon = entry.app.icon,
                url = entry.app.url,
                name = entry.app.name,
                description = entry.app.description,
                color = color,
                bg = bg,
                status = entry.status,
            )
        })
        .collect();

    let checked_at = if board.checked_at_epoch_ms == 0 {
        "Never".to_string()
    } else {
        format!(
            r#"<script>document.write(new Date({}).toLocaleTimeString())</script>"#,
            board.checked_at_epoch_ms
        )
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Launchpad</title>
    <script>
        function refreshData() {{
            fetch('/api/status')
                .then(r => r.json())
                .then(data => {{
                    const colors = {{
                        'online': ['#155724', '#d4edda'],
                        'offline': ['#721c24', '#f8d7da'],
                    }};
                    document.getElementById('cards').innerHTML = data.apps.map(entry => {{
                        const [color, bg] = colors[entry.status] || ['#383d41', '#e2e3e5'];
                        return `<div style="border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 1rem;">
                            <div style="font-size: 2rem;">${{entry.icon}}</div>
                            <h3 style="margin: 0.25rem 0;"><a href="${{entry.url}}">${{entry.name}}</a></h3>
                            <p style="margin: 0.25rem 0; color: #6c757d;">${{entry.description}}</p>
                            <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: ${{color}}; background-color: ${{bg}};">${{entry.status}}</span>
                        </div>`;
                    }}).join('');
                    document.getElementById('summary').textContent =
                        `${{data.summary.online}} of ${{data.summary.total}} online`;
                    document.getElementById('checked-at').textContent =
                        data.checked_at_epoch_ms === 0 ? 'Never' : new Date(data.checked_at_epoch_ms).toLocaleTimeString();
                }});
        }}
        function manualRefresh() {{
            fetch('/api/refresh', {{ method: 'POST' }}).then(refreshData);
        }}
        setInterval(refreshData, 60000);
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <header style="display: flex; justify-content: space-between; align-items: baseline;">
        <h1>Launchpad</h1>
        <div>
            <span id="summary">{online} of {total} online</span>
            · last checked <span id="checked-at">{checked_at}</span>
            · <button onclick="manualRefresh()">Refresh</button>
        </div>
    </header>
    <section id="cards" style="display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem;">{cards}</section>
</body>
</html>"#,
        online = board.summary.online,
        total = board.summary.total,
        checked_at = checked_at,
        cards = cards,
    );

    Html(html)
}
