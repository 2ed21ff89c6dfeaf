use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::challenge::{
        ChallengeListResponse, ChallengeResponse, CreateChallengeRequest, LossResponse,
        MessageResponse, UpdateChallengeRequest,
    },
    error::AppError,
    routes::extract::{ApiJson, SessionUser, parse_id},
    services::challenge_service,
    state::SharedState,
};

const NOT_FOUND: &str = "Challenge not found";

/// Challenge tracker endpoints. Counter mutations and reads by id are open to any id holder.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/challenges", get(list_challenges).post(create_challenge))
        .route(
            "/challenges/{id}",
            get(get_challenge)
                .patch(update_challenge)
                .delete(delete_challenge),
        )
        .route("/challenges/{id}/win", post(record_win))
        .route("/challenges/{id}/lose", post(record_loss))
        .route("/challenges/{id}/reset", post(reset_attempt))
}

/// List the caller's challenges, newest first.
#[utoipa::path(
    get,
    path = "/challenges",
    tag = "challenges",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Challenges owned by the caller", body = ChallengeListResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_challenges(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
) -> Result<Json<ChallengeListResponse>, AppError> {
    Ok(Json(challenge_service::list_challenges(&state, user.id).await?))
}

/// Create a challenge with zeroed counters.
#[utoipa::path(
    post,
    path = "/challenges",
    tag = "challenges",
    security(("bearer" = [])),
    request_body = CreateChallengeRequest,
    responses(
        (status = 200, description = "Challenge created", body = ChallengeResponse),
        (status = 400, description = "Missing or out-of-range fields"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn create_challenge(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    ApiJson(payload): ApiJson<CreateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, AppError> {
    Ok(Json(
        challenge_service::create_challenge(&state, user.id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/challenges/{id}",
    tag = "challenges",
    params(("id" = String, Path, description = "Challenge identifier")),
    responses(
        (status = 200, description = "Challenge", body = ChallengeResponse),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn get_challenge(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(challenge_service::get_challenge(&state, id).await?))
}

/// Edit name, goal, loss limit or the active flag.
#[utoipa::path(
    patch,
    path = "/challenges/{id}",
    tag = "challenges",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Challenge identifier")),
    request_body = UpdateChallengeRequest,
    responses(
        (status = 200, description = "Challenge updated", body = ChallengeResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Challenge owned by someone else"),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn update_challenge(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(
        challenge_service::update_challenge(&state, user.id, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/challenges/{id}",
    tag = "challenges",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Challenge identifier")),
    responses(
        (status = 200, description = "Challenge deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Challenge owned by someone else"),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn delete_challenge(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(
        challenge_service::delete_challenge(&state, user.id, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/challenges/{id}/win",
    tag = "challenges",
    params(("id" = String, Path, description = "Challenge identifier")),
    responses(
        (status = 200, description = "Win recorded", body = ChallengeResponse),
        (status = 400, description = "Attempt already over"),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn record_win(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(challenge_service::record_win(&state, id).await?))
}

/// Record a loss; the response tells whether it ended the attempt.
#[utoipa::path(
    post,
    path = "/challenges/{id}/lose",
    tag = "challenges",
    params(("id" = String, Path, description = "Challenge identifier")),
    responses(
        (status = 200, description = "Loss recorded", body = LossResponse),
        (status = 400, description = "Attempt already over"),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn record_loss(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LossResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(challenge_service::record_loss(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/challenges/{id}/reset",
    tag = "challenges",
    params(("id" = String, Path, description = "Challenge identifier")),
    responses(
        (status = 200, description = "Attempt reset", body = ChallengeResponse),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn reset_attempt(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(challenge_service::reset_attempt(&state, id).await?))
}
