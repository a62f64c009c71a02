//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    AdjustmentRequest, AdjustmentResponse, ChartResponse, LastOutcomeResponse, PaginationMeta,
    PlayResponse, PlayerProfileResponse, PlayerResponse, RegisterPlayerRequest, SessionDto,
    SessionListResponse, TransactionDto, TransactionListResponse,
};
use crate::api::handlers::{play, player, report, system};
use crate::domain::{GameResult, TransactionType, WinTier};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "slot-gateway",
        description = "Five-reel slot machine with an atomic per-player ledger."
    ),
    paths(
        player::register_player,
        player::get_player,
        player::adjust_balance,
        play::play,
        report::list_sessions,
        report::list_transactions,
        report::last_outcome,
        report::chart,
        system::health_handler,
        system::paytable_handler,
    ),
    components(schemas(
        RegisterPlayerRequest,
        PlayerResponse,
        PlayerProfileResponse,
        AdjustmentRequest,
        AdjustmentResponse,
        PlayResponse,
        SessionDto,
        TransactionDto,
        SessionListResponse,
        TransactionListResponse,
        LastOutcomeResponse,
        ChartResponse,
        PaginationMeta,
        WinTier,
        GameResult,
        TransactionType,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Players", description = "Registration, profile, and balance adjustments"),
        (name = "Game", description = "Playing rounds"),
        (name = "Reports", description = "History, ledger, and statistics"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/players",
            "/api/v1/players/{id}",
            "/api/v1/players/{id}/play",
            "/api/v1/players/{id}/adjustments",
            "/api/v1/players/{id}/sessions",
            "/api/v1/players/{id}/transactions",
            "/api/v1/players/{id}/last-outcome",
            "/api/v1/players/{id}/chart",
            "/health",
            "/config/paytable",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
