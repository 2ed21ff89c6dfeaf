use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use validator::Validate;

use crate::{
    dto::{
        challenge::MessageResponse,
        widget::{CreateWidgetRequest, UpdateWidgetRequest, WidgetListResponse, WidgetResponse},
    },
    error::AppError,
    routes::extract::{ApiJson, SessionUser, parse_id},
    services::widget_service,
    state::SharedState,
};

const NOT_FOUND: &str = "Widget not found";

/// Stats widget registry of the signed-in user.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route("/widgets/{id}", patch(update_widget).delete(delete_widget))
}

#[utoipa::path(
    get,
    path = "/widgets",
    tag = "widgets",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Widgets owned by the caller", body = WidgetListResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_widgets(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
) -> Result<Json<WidgetListResponse>, AppError> {
    Ok(Json(widget_service::list_widgets(&state, user.id).await?))
}

#[utoipa::path(
    post,
    path = "/widgets",
    tag = "widgets",
    security(("bearer" = [])),
    request_body = CreateWidgetRequest,
    responses(
        (status = 200, description = "Widget created", body = WidgetResponse),
        (status = 400, description = "Invalid widget settings"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn create_widget(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    ApiJson(payload): ApiJson<CreateWidgetRequest>,
) -> Result<Json<WidgetResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        widget_service::create_widget(&state, user.id, payload).await?,
    ))
}

/// Edit a widget; its URL is regenerated when a display option changes.
#[utoipa::path(
    patch,
    path = "/widgets/{id}",
    tag = "widgets",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Widget identifier")),
    request_body = UpdateWidgetRequest,
    responses(
        (status = 200, description = "Widget updated", body = WidgetResponse),
        (status = 400, description = "Invalid widget settings"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Unknown widget")
    )
)]
pub async fn update_widget(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateWidgetRequest>,
) -> Result<Json<WidgetResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    payload.validate()?;
    Ok(Json(
        widget_service::update_widget(&state, user.id, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/widgets/{id}",
    tag = "widgets",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Widget identifier")),
    responses(
        (status = 200, description = "Widget deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Unknown widget")
    )
)]
pub async fn delete_widget(
    State(state): State<SharedState>,
    SessionUser { user, .. }: SessionUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, NOT_FOUND)?;
    Ok(Json(
        widget_service::delete_widget(&state, user.id, id).await?,
    ))
}
