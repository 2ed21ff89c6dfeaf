//! DTO definitions for the profile endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::UserEntity, dto::format_system_time};

/// Public projection of a user and the accounts linked to it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub faceit: Option<String>,
    pub faceit_id: Option<String>,
    pub twitch: Option<String>,
    pub kick: Option<String>,
}

impl From<UserEntity> for UserDto {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
            created_at: format_system_time(user.created_at),
            faceit: user.faceit,
            faceit_id: user.faceit_id,
            twitch: user.twitch,
            kick: user.kick,
        }
    }
}

/// Profile of the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Linked accounts to change.
///
/// An omitted field is left unchanged; an explicit `null` unlinks the account.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub faceit: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub faceit_id: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub twitch: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub kick: Option<Option<String>>,
}

impl UpdateProfileRequest {
    /// Whether no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.faceit.is_none() && self.faceit_id.is_none() && self.twitch.is_none() && self.kick.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_absent_fields_are_distinguished() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"faceit": "s1mple", "twitch": null}"#).unwrap();

        assert_eq!(request.faceit, Some(Some("s1mple".into())));
        assert_eq!(request.twitch, Some(None));
        assert_eq!(request.kick, None);
        assert!(!request.is_empty());

        let empty: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
