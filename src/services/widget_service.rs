use std::time::SystemTime;

use tracing::info;
use url::form_urlencoded;
use uuid::Uuid;

use crate::{
    dao::models::{ColorTheme, WidgetEntity, WidgetKind},
    dto::{
        challenge::MessageResponse,
        validation::normalize_optional,
        widget::{CreateWidgetRequest, UpdateWidgetRequest, WidgetListResponse, WidgetResponse},
    },
    error::ServiceError,
    state::SharedState,
};

/// Display options encoded into a widget URL.
#[derive(Debug, Clone, Copy)]
pub struct WidgetDisplay<'a> {
    pub username: Option<&'a str>,
    pub compact: bool,
    pub theme: ColorTheme,
    pub show_profile: bool,
}

impl<'a> WidgetDisplay<'a> {
    fn of(widget: &'a WidgetEntity) -> Self {
        Self {
            username: widget.faceit_username.as_deref(),
            compact: widget.compact,
            theme: widget.color_theme,
            show_profile: widget.show_profile,
        }
    }
}

/// Public page URL of a widget, e.g. `{base}/widget/faceit-stats?username=...&theme=blue`.
pub fn build_widget_url(base_url: &str, kind: WidgetKind, display: WidgetDisplay<'_>) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("username", display.username.unwrap_or_default())
        .append_pair("compact", if display.compact { "true" } else { "false" })
        .append_pair("theme", display.theme.as_str())
        .append_pair(
            "showProfile",
            if display.show_profile { "true" } else { "false" },
        )
        .finish();

    format!(
        "{}/widget/{}?{query}",
        base_url.trim_end_matches('/'),
        kind.slug()
    )
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Widget not found".into())
}

/// Owned widget or `NotFound`; foreign widgets are indistinguishable from missing ones.
async fn owned_widget(
    state: &SharedState,
    owner_id: Uuid,
    id: Uuid,
) -> Result<WidgetEntity, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_widget(id)
        .await?
        .filter(|widget| widget.owner_id == owner_id)
        .ok_or_else(not_found)
}

pub async fn list_widgets(
    state: &SharedState,
    owner_id: Uuid,
) -> Result<WidgetListResponse, ServiceError> {
    let store = state.require_store().await?;
    let widgets = store
        .list_widgets(owner_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(WidgetListResponse { widgets })
}

/// Register a widget. The request is expected to be validated already.
pub async fn create_widget(
    state: &SharedState,
    owner_id: Uuid,
    request: CreateWidgetRequest,
) -> Result<WidgetResponse, ServiceError> {
    let store = state.require_store().await?;
    let now = SystemTime::now();
    let kind = WidgetKind::FaceitStats;

    let mut widget = WidgetEntity {
        id: Uuid::new_v4(),
        owner_id,
        kind,
        name: request.name.trim().to_owned(),
        compact: request.compact,
        color_theme: request.color_theme.into(),
        show_profile: request.show_profile,
        faceit_username: normalize_optional(request.faceit_username),
        widget_url: String::new(),
        created_at: now,
        updated_at: now,
    };
    widget.widget_url = build_widget_url(
        &state.config().server.public_base_url,
        kind,
        WidgetDisplay::of(&widget),
    );

    store.insert_widget(widget.clone()).await?;
    info!(widget_id = %widget.id, owner_id = %owner_id, "widget created");

    Ok(WidgetResponse {
        widget: widget.into(),
        message: "Widget created successfully".into(),
    })
}

/// Apply a partial edit, regenerating the URL when a display option changed.
pub async fn update_widget(
    state: &SharedState,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateWidgetRequest,
) -> Result<WidgetResponse, ServiceError> {
    let mut widget = owned_widget(state, owner_id, id).await?;
    let before = (
        widget.faceit_username.clone(),
        widget.compact,
        widget.color_theme,
        widget.show_profile,
    );

    if let Some(name) = request.name {
        widget.name = name.trim().to_owned();
    }
    if let Some(compact) = request.compact {
        widget.compact = compact;
    }
    if let Some(theme) = request.color_theme {
        widget.color_theme = theme.into();
    }
    if let Some(show_profile) = request.show_profile {
        widget.show_profile = show_profile;
    }
    if let Some(username) = request.faceit_username {
        widget.faceit_username = normalize_optional(username);
    }

    let after = (
        widget.faceit_username.clone(),
        widget.compact,
        widget.color_theme,
        widget.show_profile,
    );
    if before != after {
        widget.widget_url = build_widget_url(
            &state.config().server.public_base_url,
            widget.kind,
            WidgetDisplay::of(&widget),
        );
    }
    widget.updated_at = SystemTime::now();

    let store = state.require_store().await?;
    store.save_widget(widget.clone()).await?;

    Ok(WidgetResponse {
        widget: widget.into(),
        message: "Widget updated successfully".into(),
    })
}

pub async fn delete_widget(
    state: &SharedState,
    owner_id: Uuid,
    id: Uuid,
) -> Result<MessageResponse, ServiceError> {
    owned_widget(state, owner_id, id).await?;

    let store = state.require_store().await?;
    if !store.delete_widget(id).await? {
        return Err(not_found());
    }
    info!(widget_id = %id, "widget deleted");

    Ok(MessageResponse::new("Widget deleted successfully"))
}
