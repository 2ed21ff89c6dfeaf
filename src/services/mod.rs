/// Challenge tracker orchestration with optimistic concurrency.
pub mod challenge_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// FACEIT lookups and recent-match aggregation.
pub mod faceit_service;
/// Health check service.
pub mod health_service;
/// Session issuance, resolution and expiry.
pub mod session_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
/// Profile reads and linked-account edits.
pub mod user_service;
/// Stats widget registry and URL generation.
pub mod widget_service;
