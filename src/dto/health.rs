use serde::Serialize;
use utoipa::ToSchema;

/// Liveness snapshot returned by `GET /healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` while no record store is reachable.
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Whether a FACEIT API key is configured.
    pub faceit_configured: bool,
    /// Sessions currently held in the registry, expired ones included until the next sweep.
    pub active_sessions: usize,
}

impl HealthResponse {
    pub fn new(degraded: bool, faceit_configured: bool, active_sessions: usize) -> Self {
        Self {
            status: if degraded { "degraded" } else { "ok" },
            faceit_configured,
            active_sessions,
        }
    }
}
