/// Client for the upstream FACEIT Data API.
pub mod faceit;
/// Persisted entity definitions shared by every backend.
pub mod models;
/// Record store trait and its backends.
pub mod record_store;
/// Backend-agnostic storage error types.
pub mod storage;
