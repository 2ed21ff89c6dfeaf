//! Session issuance for the trusted sign-in bridge and token resolution for handlers.

use std::time::Duration;

use subtle::ConstantTimeEq;
use tokio::time::interval;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    dao::models::UserEntity,
    dto::session::{CreateSessionRequest, SessionResponse},
    error::ServiceError,
    services::user_service,
    state::SharedState,
};

const GC_INTERVAL: Duration = Duration::from_secs(60);

/// Compare the bridge secret in constant time; without a configured secret nothing matches.
fn secret_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (Some(expected), Some(provided)) => expected.as_bytes().ct_eq(provided.as_bytes()).into(),
        _ => false,
    }
}

/// Upsert the asserted user and hand out a bearer token.
///
/// `provided_secret` must match the configured bridge secret; issuance is
/// refused outright when no secret is configured.
pub async fn create_session(
    state: &SharedState,
    provided_secret: Option<&str>,
    request: CreateSessionRequest,
) -> Result<SessionResponse, ServiceError> {
    if !secret_matches(state.config().auth.secret.as_deref(), provided_secret) {
        return Err(ServiceError::Unauthenticated("invalid auth secret".into()));
    }

    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let store = state.require_store().await?;
    let email = request.email.trim().to_ascii_lowercase();
    let user = store.upsert_user(email, request.name, request.image).await?;
    let token = state.sessions().issue(user.id);
    info!(user_id = %user.id, "session issued");

    Ok(SessionResponse {
        token,
        user: user.into(),
    })
}

/// Forget `token`.
pub fn revoke_session(state: &SharedState, token: &str) {
    if state.sessions().revoke(token) {
        debug!("session revoked");
    }
}

/// User owning `token`.
pub async fn resolve_session(state: &SharedState, token: &str) -> Result<UserEntity, ServiceError> {
    let user_id = state
        .sessions()
        .resolve(token)
        .ok_or_else(|| ServiceError::Unauthenticated("invalid or expired session".into()))?;

    user_service::find_user(state, user_id).await
}

/// Periodically drop expired sessions.
pub async fn run_session_gc(state: SharedState) {
    let mut ticker = interval(GC_INTERVAL);
    loop {
        ticker.tick().await;
        let purged = state.sessions().purge_expired();
        if purged > 0 {
            debug!(purged, remaining = state.sessions().len(), "expired sessions purged");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_secret_must_match_exactly() {
        assert!(secret_matches(Some("bridge"), Some("bridge")));
        assert!(!secret_matches(Some("bridge"), Some("bridgE")));
        assert!(!secret_matches(Some("bridge"), Some("bridge-and-more")));
        assert!(!secret_matches(Some("bridge"), None));
        assert!(!secret_matches(None, Some("bridge")));
        assert!(!secret_matches(None, None));
    }
}
