use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::faceit::{FaceitPlayerDto, PlayerQuery, RecentMatchesDto, UsernameQuery},
    error::AppError,
    routes::extract::SessionUser,
    services::faceit_service,
    state::SharedState,
};

/// Read-only proxy to the FACEIT Data API. Stats routes are polled by anonymous overlays.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/faceit", get(find_player))
        .route("/faceit/stats", get(lifetime_stats))
        .route("/faceit/matches", get(recent_matches))
}

#[utoipa::path(
    get,
    path = "/faceit",
    tag = "faceit",
    params(PlayerQuery),
    responses(
        (status = 200, description = "Player profile", body = FaceitPlayerDto),
        (status = 400, description = "Nickname missing"),
        (status = 404, description = "Unknown player"),
        (status = 502, description = "FACEIT request failed")
    )
)]
pub async fn find_player(
    State(state): State<SharedState>,
    Query(query): Query<PlayerQuery>,
) -> Result<Json<FaceitPlayerDto>, AppError> {
    Ok(Json(
        faceit_service::find_player(&state, query.nickname).await?,
    ))
}

/// Lifetime CS2 statistics as returned by FACEIT.
#[utoipa::path(
    get,
    path = "/faceit/stats",
    tag = "faceit",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Lifetime statistics", body = Object),
        (status = 400, description = "No nickname in the query or the caller profile"),
        (status = 404, description = "Unknown player"),
        (status = 502, description = "FACEIT request failed")
    )
)]
pub async fn lifetime_stats(
    State(state): State<SharedState>,
    session: Option<SessionUser>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<Value>, AppError> {
    let caller = session.as_ref().map(|session| &session.user);
    let nickname = faceit_service::resolve_username(query.username, caller)?;
    Ok(Json(
        faceit_service::lifetime_stats(&state, &nickname).await?,
    ))
}

/// Aggregate of the last 30 CS2 matches.
#[utoipa::path(
    get,
    path = "/faceit/matches",
    tag = "faceit",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Recent match aggregate", body = RecentMatchesDto),
        (status = 400, description = "No nickname in the query or the caller profile"),
        (status = 404, description = "Unknown player"),
        (status = 502, description = "FACEIT request failed")
    )
)]
pub async fn recent_matches(
    State(state): State<SharedState>,
    session: Option<SessionUser>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<RecentMatchesDto>, AppError> {
    let caller = session.as_ref().map(|session| &session.user);
    let nickname = faceit_service::resolve_username(query.username, caller)?;
    Ok(Json(
        faceit_service::recent_matches(&state, &nickname).await?,
    ))
}
