use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::user::UserDto;

/// Identity asserted by the trusted sign-in bridge.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    #[validate(email)]
    #[schema(example = "player@example.com")]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub image: Option<String>,
}

/// Issued bearer token and the user it belongs to.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserDto,
}
