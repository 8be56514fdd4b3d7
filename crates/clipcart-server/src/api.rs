//! Minimal service surface: health, status counts, and trigger-pass
//! endpoints. The store remains the coordination point — these endpoints
//! just kick off the same batch passes the CLI runs.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::passes::{self, PassSummary};

#[derive(Clone)]
pub(crate) struct AppState {
    pub pool: PgPool,
    pub config: Arc<clipcart_core::AppConfig>,
}

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/passes/download", post(trigger_download))
        .route("/api/passes/render", post(trigger_render))
        .route("/api/passes/upload", post(trigger_upload))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, String);

fn internal_error(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthBody>, ApiError> {
    clipcart_db::health_check(&state.pool)
        .await
        .map_err(internal_error)?;
    Ok(Json(HealthBody { status: "ok" }))
}

#[derive(Serialize)]
struct CountBody {
    status: String,
    count: i64,
}

#[derive(Serialize)]
struct StatusBody {
    products: Vec<CountBody>,
    video_assets: Vec<CountBody>,
    upload_logs: Vec<CountBody>,
}

fn to_counts(rows: Vec<clipcart_db::StatusCount>) -> Vec<CountBody> {
    rows.into_iter()
        .map(|row| CountBody {
            status: row.status,
            count: row.count,
        })
        .collect()
}

async fn status(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    let report = clipcart_db::status_report(&state.pool)
        .await
        .map_err(internal_error)?;
    Ok(Json(StatusBody {
        products: to_counts(report.products),
        video_assets: to_counts(report.video_assets),
        upload_logs: to_counts(report.upload_logs),
    }))
}

async fn trigger_download(
    State(state): State<AppState>,
) -> Result<Json<PassSummary>, ApiError> {
    let summary = passes::download_pass(&state.pool, &state.config)
        .await
        .map_err(internal_error)?;
    Ok(Json(summary))
}

async fn trigger_render(State(state): State<AppState>) -> Result<Json<PassSummary>, ApiError> {
    let summary = passes::render_pass(&state.pool, &state.config)
        .await
        .map_err(internal_error)?;
    Ok(Json(summary))
}

async fn trigger_upload(State(state): State<AppState>) -> Result<Json<PassSummary>, ApiError> {
    let summary = passes::upload_pass(&state.pool, &state.config)
        .await
        .map_err(internal_error)?;
    Ok(Json(summary))
}
