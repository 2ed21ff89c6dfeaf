//! Challenge tracker orchestration.
//!
//! Every counter mutation reads the entity, computes the next version with the
//! pure transitions in [`crate::state::challenge`] and writes it back only if
//! nobody else wrote in between. Losing the race simply replays the step.

use std::time::SystemTime;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{models::ChallengeEntity, record_store::RecordStore},
    dto::challenge::{
        ChallengeDto, ChallengeListResponse, ChallengeResponse, CreateChallengeRequest,
        LossResponse, MessageResponse, UpdateChallengeRequest,
    },
    error::ServiceError,
    state::{
        SharedState,
        challenge::{TrackerCommand, apply},
    },
};

/// Upper bound on read-compute-write rounds before giving up with a conflict.
pub const MAX_WRITE_ATTEMPTS: usize = 32;

fn not_found() -> ServiceError {
    ServiceError::NotFound("Challenge not found".into())
}

fn to_dto(state: &SharedState, entity: ChallengeEntity) -> ChallengeDto {
    ChallengeDto::from_entity(entity, &state.config().server.public_base_url)
}

fn with_message(state: &SharedState, entity: ChallengeEntity, message: &str) -> ChallengeResponse {
    ChallengeResponse {
        challenge: to_dto(state, entity),
        message: Some(message.into()),
    }
}

/// Apply `step` to the stored challenge with optimistic concurrency.
///
/// `step` must return the next entity with its revision bumped (see
/// [`ChallengeEntity::touched`]) plus any extra output for the caller.
async fn mutate<T, F>(
    store: &dyn RecordStore,
    id: Uuid,
    mut step: F,
) -> Result<(ChallengeEntity, T), ServiceError>
where
    F: FnMut(&ChallengeEntity) -> Result<(ChallengeEntity, T), ServiceError>,
{
    for attempt in 0..MAX_WRITE_ATTEMPTS {
        let current = store.find_challenge(id).await?.ok_or_else(not_found)?;
        let (next, output) = step(&current)?;

        if store.replace_challenge(next.clone(), current.revision).await? {
            return Ok((next, output));
        }

        debug!(challenge_id = %id, attempt, "challenge changed concurrently; retrying");
        tokio::task::yield_now().await;
    }

    warn!(challenge_id = %id, "giving up on contended challenge update");
    Err(ServiceError::Conflict(
        "Challenge is being modified concurrently, please retry".into(),
    ))
}

async fn run_command(
    state: &SharedState,
    id: Uuid,
    command: TrackerCommand,
) -> Result<(ChallengeEntity, bool), ServiceError> {
    let store = state.require_store().await?;
    mutate(store.as_ref(), id, |current| {
        let transition = apply(current, command, SystemTime::now())?;
        Ok((transition.next, transition.attempt_ended))
    })
    .await
}

/// Validate the creation payload and return `(name, win_goal, max_losses)`.
fn validate_create(request: CreateChallengeRequest) -> Result<(String, u32, u32), ServiceError> {
    let name = request
        .name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());

    let (Some(name), Some(win_goal), Some(max_losses)) =
        (name, request.win_goal, request.max_losses)
    else {
        return Err(ServiceError::InvalidInput(
            "Missing required fields: name, winGoal, maxLosses".into(),
        ));
    };

    if win_goal < 1 || max_losses < 1 {
        return Err(ServiceError::InvalidInput(
            "Win goal and max losses must be at least 1".into(),
        ));
    }

    let (Ok(win_goal), Ok(max_losses)) = (u32::try_from(win_goal), u32::try_from(max_losses))
    else {
        return Err(ServiceError::InvalidInput(format!(
            "Win goal and max losses must be at most {}",
            u32::MAX
        )));
    };

    Ok((name, win_goal, max_losses))
}

pub async fn create_challenge(
    state: &SharedState,
    owner_id: Uuid,
    request: CreateChallengeRequest,
) -> Result<ChallengeResponse, ServiceError> {
    let (name, win_goal, max_losses) = validate_create(request)?;
    let store = state.require_store().await?;

    let challenge = ChallengeEntity::new(owner_id, name, win_goal, max_losses);
    store.insert_challenge(challenge.clone()).await?;
    info!(challenge_id = %challenge.id, owner_id = %owner_id, "challenge created");

    Ok(with_message(state, challenge, "Challenge created successfully"))
}

pub async fn list_challenges(
    state: &SharedState,
    owner_id: Uuid,
) -> Result<ChallengeListResponse, ServiceError> {
    let store = state.require_store().await?;
    let challenges = store
        .list_challenges(owner_id)
        .await?
        .into_iter()
        .map(|challenge| to_dto(state, challenge))
        .collect();
    Ok(ChallengeListResponse { challenges })
}

/// Unauthenticated read used by overlays.
pub async fn get_challenge(state: &SharedState, id: Uuid) -> Result<ChallengeResponse, ServiceError> {
    let store = state.require_store().await?;
    let challenge = store.find_challenge(id).await?.ok_or_else(not_found)?;
    Ok(ChallengeResponse {
        challenge: to_dto(state, challenge),
        message: None,
    })
}

pub async fn update_challenge(
    state: &SharedState,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateChallengeRequest,
) -> Result<ChallengeResponse, ServiceError> {
    let store = state.require_store().await?;
    let (challenge, ()) = mutate(store.as_ref(), id, |current| {
        if current.owner_id != owner_id {
            return Err(ServiceError::Forbidden(
                "You do not own this challenge".into(),
            ));
        }

        let mut next = current.touched(SystemTime::now());
        if let Some(ref name) = request.name {
            next.name = name.clone();
        }
        if let Some(win_goal) = request.win_goal {
            next.win_goal = win_goal;
        }
        if let Some(max_losses) = request.max_losses {
            next.max_losses = max_losses;
        }
        if let Some(is_active) = request.is_active {
            next.is_active = is_active;
        }
        Ok((next, ()))
    })
    .await?;

    Ok(with_message(state, challenge, "Challenge updated successfully"))
}

pub async fn delete_challenge(
    state: &SharedState,
    owner_id: Uuid,
    id: Uuid,
) -> Result<MessageResponse, ServiceError> {
    let store = state.require_store().await?;
    let challenge = store.find_challenge(id).await?.ok_or_else(not_found)?;

    if challenge.owner_id != owner_id {
        return Err(ServiceError::Forbidden(
            "You do not own this challenge".into(),
        ));
    }

    if !store.delete_challenge(id).await? {
        return Err(not_found());
    }
    info!(challenge_id = %id, "challenge deleted");

    Ok(MessageResponse::new("Challenge deleted successfully"))
}

pub async fn record_win(state: &SharedState, id: Uuid) -> Result<ChallengeResponse, ServiceError> {
    let (challenge, _) = run_command(state, id, TrackerCommand::RecordWin).await?;
    Ok(with_message(state, challenge, "Win recorded successfully"))
}

pub async fn record_loss(state: &SharedState, id: Uuid) -> Result<LossResponse, ServiceError> {
    let (challenge, attempt_ended) = run_command(state, id, TrackerCommand::RecordLoss).await?;

    let message = if attempt_ended {
        info!(
            challenge_id = %id,
            wins = challenge.current_wins,
            total_attempts = challenge.total_attempts,
            "challenge attempt ended"
        );
        "Challenge attempt ended"
    } else {
        "Loss recorded successfully"
    };

    Ok(LossResponse {
        challenge: to_dto(state, challenge),
        attempt_ended,
        message: message.into(),
    })
}

pub async fn reset_attempt(state: &SharedState, id: Uuid) -> Result<ChallengeResponse, ServiceError> {
    let (challenge, _) = run_command(state, id, TrackerCommand::ResetAttempt).await?;
    Ok(with_message(state, challenge, "Challenge reset successfully"))
}
