use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the installed record store and summarise the API's dependencies.
///
/// A failing probe is only logged; the storage supervisor decides when to
/// drop the store and enter degraded mode.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.record_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "record store probe failed");
            }
        }
        None => warn!("healthcheck while degraded: no record store installed"),
    }

    HealthResponse::new(
        state.is_degraded().await,
        state.faceit().is_configured(),
        state.sessions().len(),
    )
}
