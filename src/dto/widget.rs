//! DTO definitions for the stats widget registry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{ColorTheme, WidgetEntity},
    dto::{format_system_time, validation::validate_trimmed_length},
};

const NAME_MAX: usize = 50;
const USERNAME_MAX: usize = 30;

/// Palette applied by the widget page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColorThemeDto {
    #[default]
    Blue,
    Violet,
    Green,
    Red,
}

impl From<ColorThemeDto> for ColorTheme {
    fn from(value: ColorThemeDto) -> Self {
        match value {
            ColorThemeDto::Blue => ColorTheme::Blue,
            ColorThemeDto::Violet => ColorTheme::Violet,
            ColorThemeDto::Green => ColorTheme::Green,
            ColorThemeDto::Red => ColorTheme::Red,
        }
    }
}

impl From<ColorTheme> for ColorThemeDto {
    fn from(value: ColorTheme) -> Self {
        match value {
            ColorTheme::Blue => ColorThemeDto::Blue,
            ColorTheme::Violet => ColorThemeDto::Violet,
            ColorTheme::Green => ColorThemeDto::Green,
            ColorTheme::Red => ColorThemeDto::Red,
        }
    }
}

/// Payload used to register a FACEIT stats widget.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWidgetRequest {
    #[schema(example = "Main overlay")]
    pub name: String,
    #[serde(default)]
    pub compact: bool,
    #[serde(default)]
    pub color_theme: ColorThemeDto,
    #[serde(default = "default_show_profile")]
    pub show_profile: bool,
    #[serde(default)]
    pub faceit_username: Option<String>,
}

fn default_show_profile() -> bool {
    true
}

impl Validate for CreateWidgetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_trimmed_length(&self.name, 1, NAME_MAX) {
            errors.add("name", e);
        }
        if let Some(ref username) = self.faceit_username {
            if let Err(e) = validate_trimmed_length(username, 1, USERNAME_MAX) {
                errors.add("faceitUsername", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial edit of a widget; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWidgetRequest {
    pub name: Option<String>,
    pub compact: Option<bool>,
    pub color_theme: Option<ColorThemeDto>,
    pub show_profile: Option<bool>,
    /// `null` removes the nickname from the widget.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub faceit_username: Option<Option<String>>,
}

impl Validate for UpdateWidgetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref name) = self.name {
            if let Err(e) = validate_trimmed_length(name, 1, NAME_MAX) {
                errors.add("name", e);
            }
        }
        if let Some(Some(ref username)) = self.faceit_username {
            if let Err(e) = validate_trimmed_length(username, 1, USERNAME_MAX) {
                errors.add("faceitUsername", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Public projection of a widget.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Widget kind, currently always `faceit-stats`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub compact: bool,
    pub color_theme: ColorThemeDto,
    pub show_profile: bool,
    pub faceit_username: Option<String>,
    pub widget_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WidgetEntity> for WidgetDto {
    fn from(widget: WidgetEntity) -> Self {
        Self {
            id: widget.id,
            owner_id: widget.owner_id,
            kind: widget.kind.slug(),
            name: widget.name,
            compact: widget.compact,
            color_theme: widget.color_theme.into(),
            show_profile: widget.show_profile,
            faceit_username: widget.faceit_username,
            widget_url: widget.widget_url,
            created_at: format_system_time(widget.created_at),
            updated_at: format_system_time(widget.updated_at),
        }
    }
}

/// Widgets owned by the caller, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetListResponse {
    pub widgets: Vec<WidgetDto>,
}

/// Single widget with a confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct WidgetResponse {
    pub widget: WidgetDto,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_and_validation() {
        let request: CreateWidgetRequest =
            serde_json::from_str(r#"{"name": "  Main  "}"#).unwrap();
        assert!(!request.compact);
        assert!(request.show_profile);
        assert_eq!(request.color_theme, ColorThemeDto::Blue);
        assert!(request.validate().is_ok());

        let blank: CreateWidgetRequest =
            serde_json::from_str(r#"{"name": "   ", "faceitUsername": ""}"#).unwrap();
        let errors = blank.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("faceitUsername"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let parsed = serde_json::from_str::<CreateWidgetRequest>(
            r#"{"name": "x", "colorTheme": "pink"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn update_request_validates_supplied_fields_only() {
        let clear: UpdateWidgetRequest =
            serde_json::from_str(r#"{"faceitUsername": null}"#).unwrap();
        assert_eq!(clear.faceit_username, Some(None));
        assert!(clear.validate().is_ok());

        let long: UpdateWidgetRequest = serde_json::from_value(serde_json::json!({
            "faceitUsername": "x".repeat(31)
        }))
        .unwrap();
        assert!(long.validate().is_err());
    }
}
