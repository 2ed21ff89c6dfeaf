use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};

use crate::{
    dto::session::{CreateSessionRequest, SessionResponse},
    error::AppError,
    routes::extract::{ApiJson, SessionUser},
    services::session_service,
    state::SharedState,
};

/// Header carrying the secret shared with the sign-in bridge.
pub const AUTH_SECRET_HEADER: &str = "x-auth-secret";

/// Session issuance and revocation.
pub fn router() -> Router<SharedState> {
    Router::new().route("/auth/sessions", post(create_session).delete(revoke_session))
}

/// Exchange a verified identity for a bearer token. Called by the sign-in bridge only.
#[utoipa::path(
    post,
    path = "/auth/sessions",
    tag = "auth",
    params(("X-Auth-Secret" = String, Header, description = "Secret shared with the sign-in bridge")),
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 400, description = "Invalid identity payload"),
        (status = 401, description = "Wrong or missing bridge secret")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let secret = headers
        .get(AUTH_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    Ok(Json(
        session_service::create_session(&state, secret, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/auth/sessions",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn revoke_session(
    State(state): State<SharedState>,
    SessionUser { token, .. }: SessionUser,
) -> StatusCode {
    session_service::revoke_session(&state, &token);
    StatusCode::NO_CONTENT
}
