use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod challenges;
pub mod docs;
pub mod extract;
pub mod faceit;
pub mod health;
pub mod me;
pub mod widgets;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(auth::router())
        .merge(me::router())
        .merge(challenges::router())
        .merge(widgets::router())
        .merge(faceit::router());

    let docs_router = docs::router(&state);

    api_router.merge(docs_router).with_state(state)
}
