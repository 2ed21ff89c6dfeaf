use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::user::{UpdateProfileRequest, UserResponse},
    error::AppError,
    routes::extract::{ApiJson, SessionUser},
    services::user_service,
    state::SharedState,
};

/// Profile of the signed-in user.
pub fn router() -> Router<SharedState> {
    Router::new().route("/me", get(get_profile).patch(update_profile))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "User record no longer exists")
    )
)]
pub async fn get_profile(SessionUser { user, .. }: SessionUser) -> Json<UserResponse> {
    Json(user_service::profile(user))
}

/// Link or unlink FACEIT, Twitch and Kick accounts. `null` unlinks.
#[utoipa::path(
    patch,
    path = "/me",
    tag = "profile",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "No field supplied"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn update_profile(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(
        user_service::update_profile(&state, user.id, payload).await?,
    ))
}
