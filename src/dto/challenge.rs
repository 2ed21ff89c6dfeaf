//! DTO definitions for the challenge tracker endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::ChallengeEntity,
    dto::format_system_time,
    state::challenge::AttemptPhase,
};

/// Payload used to create a challenge. Every field is required; missing ones are reported together.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRequest {
    #[schema(example = "20 Win")]
    pub name: Option<String>,
    #[schema(example = 20)]
    pub win_goal: Option<i64>,
    #[schema(example = 3)]
    pub max_losses: Option<i64>,
}

/// Partial edit of a challenge; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChallengeRequest {
    pub name: Option<String>,
    pub win_goal: Option<u32>,
    pub max_losses: Option<u32>,
    pub is_active: Option<bool>,
}

/// Public projection of a challenge.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub win_goal: u32,
    pub max_losses: u32,
    pub current_wins: u32,
    pub current_losses: u32,
    pub best_wins: u32,
    pub best_losses: u32,
    pub total_attempts: u32,
    pub is_active: bool,
    /// True once the loss limit is reached; only a reset clears it.
    pub attempt_over: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Overlay page displaying this challenge.
    pub widget_url: String,
}

impl ChallengeDto {
    /// Project an entity, deriving its overlay URL from `public_base_url`.
    pub fn from_entity(entity: ChallengeEntity, public_base_url: &str) -> Self {
        let attempt_over = entity.phase() == AttemptPhase::AttemptOver;
        Self {
            widget_url: format!("{public_base_url}/widget/challenge?id={}", entity.id),
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            win_goal: entity.win_goal,
            max_losses: entity.max_losses,
            current_wins: entity.current_wins,
            current_losses: entity.current_losses,
            best_wins: entity.best_wins,
            best_losses: entity.best_losses,
            total_attempts: entity.total_attempts,
            is_active: entity.is_active,
            attempt_over,
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}

/// Challenges owned by the caller, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeListResponse {
    pub challenges: Vec<ChallengeDto>,
}

/// Single challenge, with a confirmation message on mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeResponse {
    pub challenge: ChallengeDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of recording a loss.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LossResponse {
    pub challenge: ChallengeDto,
    /// True when this loss reached the loss limit.
    pub attempt_ended: bool,
    pub message: String,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
