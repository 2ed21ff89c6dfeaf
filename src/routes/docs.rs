use axum::Router;
use utoipa::{OpenApi, openapi::Server};
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Swagger UI at `/docs`; the served document advertises the public base URL as its server.
pub fn router(state: &SharedState) -> Router<SharedState> {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(
        state.config().server.public_base_url.clone(),
    )]);

    SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", doc)
        .into()
}
