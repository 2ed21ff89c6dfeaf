use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        user::{UpdateProfileRequest, UserResponse},
        validation::normalize_optional,
    },
    error::ServiceError,
    state::SharedState,
};

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("user not found".into())
}

/// Load a user by id.
pub async fn find_user(state: &SharedState, user_id: Uuid) -> Result<UserEntity, ServiceError> {
    let store = state.require_store().await?;
    store.find_user(user_id).await?.ok_or_else(user_not_found)
}

pub fn profile(user: UserEntity) -> UserResponse {
    UserResponse {
        user: user.into(),
        message: None,
    }
}

/// Link or unlink the caller's gaming and streaming accounts.
pub async fn update_profile(
    state: &SharedState,
    user_id: Uuid,
    request: UpdateProfileRequest,
) -> Result<UserResponse, ServiceError> {
    if request.is_empty() {
        return Err(ServiceError::InvalidInput(
            "At least one field must be provided".into(),
        ));
    }

    let mut user = find_user(state, user_id).await?;

    if let Some(faceit) = request.faceit {
        user.faceit = normalize_optional(faceit);
    }
    if let Some(faceit_id) = request.faceit_id {
        user.faceit_id = normalize_optional(faceit_id);
    }
    if let Some(twitch) = request.twitch {
        user.twitch = normalize_optional(twitch);
    }
    if let Some(kick) = request.kick {
        user.kick = normalize_optional(kick);
    }

    state.require_store().await?.save_user(user.clone()).await?;
    info!(user_id = %user.id, "profile updated");

    Ok(UserResponse {
        user: user.into(),
        message: Some("Profile updated successfully".into()),
    })
}
