//! Bearer-token registry backing the dashboard sessions.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::RngCore;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct SessionRecord {
    user_id: Uuid,
    issued_at: Instant,
}

/// In-process map of opaque session tokens to user ids.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionRecord>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Empty registry whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh token for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> String {
        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            SessionRecord {
                user_id,
                issued_at: Instant::now(),
            },
        );
        token
    }

    /// User behind `token`, unless the token is unknown or expired.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        let record = *self.sessions.get(token)?;
        if record.issued_at.elapsed() >= self.ttl {
            self.sessions.remove(token);
            return None;
        }
        Some(record.user_id)
    }

    /// Forget `token`; returns whether it was known.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every expired token and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, record| record.issued_at.elapsed() < self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of tokens currently held.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no token is held.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// 32 random bytes rendered as lowercase hex.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_until_revoked() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        let token = registry.issue(user);

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(registry.resolve(&token), Some(user));

        assert!(registry.revoke(&token));
        assert!(!registry.revoke(&token));
        assert_eq!(registry.resolve(&token), None);
    }

    #[test]
    fn tokens_are_unique() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        assert_ne!(registry.issue(user), registry.issue(user));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn expired_tokens_are_rejected_and_purged() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let first = registry.issue(Uuid::new_v4());
        registry.issue(Uuid::new_v4());

        assert_eq!(registry.resolve(&first), None);
        assert_eq!(registry.purge_expired(), 1);
        assert!(registry.is_empty());
    }
}
