//! Request extractors shared by the route handlers.

use axum::{
    extract::{FromRequest, FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    error::{AppError, ServiceError},
    services::session_service,
    state::SharedState,
};

/// JSON body whose decoding failures are reported as `400` with an `error` payload.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Authenticated caller resolved from `Authorization: Bearer <token>`.
///
/// ```ignore
/// async fn handler(SessionUser { user, .. }: SessionUser) -> Result<Json<()>, AppError> {
///     tracing::info!(user_id = %user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Token presented by the caller.
    pub token: String,
    /// Profile behind the token.
    pub user: UserEntity,
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })
}

impl FromRequestParts<SharedState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?
            .to_owned();

        let user = session_service::resolve_session(state, &token).await?;
        Ok(Self { token, user })
    }
}

/// Lenient variant used by routes that also serve anonymous overlays: a
/// missing or stale token yields `None` instead of a rejection.
impl OptionalFromRequestParts<SharedState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Ok(Some(token)) = bearer_token(parts) else {
            return Ok(None);
        };
        let token = token.to_owned();

        match session_service::resolve_session(state, &token).await {
            Ok(user) => Ok(Some(Self { token, user })),
            Err(ServiceError::Unauthenticated(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Parse a path id; anything that is not a UUID cannot name an existing record.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_owned()))
}
