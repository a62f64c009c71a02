//! System endpoints: health check, paytable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::WinTier;
use crate::domain::outcome::{BUCKETS, DrawCategory};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One paytable row.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaytableTier {
    tier: WinTier,
    #[schema(value_type = String, example = "2.50")]
    multiplier: Decimal,
    #[schema(value_type = String, example = "12.50")]
    payout_at_min_bet: Decimal,
}

/// Share of the generator's buckets assigned to one draw shape.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrawBucket {
    category: String,
    start: u32,
    end: u32,
}

/// Paytable and generator weights.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaytableResponse {
    #[schema(value_type = String, example = "5.00")]
    min_bet: Decimal,
    tiers: Vec<PaytableTier>,
    total_buckets: u32,
    buckets: Vec<DrawBucket>,
}

/// `GET /config/paytable`: Fixed paytable and generator weights.
#[utoipa::path(
    get,
    path = "/config/paytable",
    tag = "System",
    summary = "Get paytable",
    description = "Returns the paytable tiers in priority order with their multipliers, the fixed bet, and the bucket ranges the outcome generator draws from.",
    responses(
        (status = 200, description = "Paytable", body = PaytableResponse),
    )
)]
pub async fn paytable_handler(State(state): State<AppState>) -> impl IntoResponse {
    let min_bet = state.game_service.rules().min_bet;
    let tiers = WinTier::PRIORITY
        .into_iter()
        .map(|tier| PaytableTier {
            tier,
            multiplier: tier.multiplier(),
            payout_at_min_bet: tier.payout(min_bet).unwrap_or(Decimal::ZERO),
        })
        .collect();
    let buckets = DrawCategory::ALL
        .into_iter()
        .map(|category| {
            let range = category.buckets();
            DrawBucket {
                category: category.as_str().to_string(),
                start: range.start,
                end: range.end,
            }
        })
        .collect();
    (
        StatusCode::OK,
        Json(PaytableResponse {
            min_bet,
            tiers,
            total_buckets: BUCKETS,
            buckets,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/paytable", get(paytable_handler))
}
