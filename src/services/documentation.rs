use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Overlay Hub Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::create_session,
        crate::routes::auth::revoke_session,
        crate::routes::me::get_profile,
        crate::routes::me::update_profile,
        crate::routes::challenges::list_challenges,
        crate::routes::challenges::create_challenge,
        crate::routes::challenges::get_challenge,
        crate::routes::challenges::update_challenge,
        crate::routes::challenges::delete_challenge,
        crate::routes::challenges::record_win,
        crate::routes::challenges::record_loss,
        crate::routes::challenges::reset_attempt,
        crate::routes::widgets::list_widgets,
        crate::routes::widgets::create_widget,
        crate::routes::widgets::update_widget,
        crate::routes::widgets::delete_widget,
        crate::routes::faceit::find_player,
        crate::routes::faceit::lifetime_stats,
        crate::routes::faceit::recent_matches,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::SessionResponse,
            crate::dto::user::UserDto,
            crate::dto::user::UserResponse,
            crate::dto::user::UpdateProfileRequest,
            crate::dto::challenge::ChallengeDto,
            crate::dto::challenge::ChallengeListResponse,
            crate::dto::challenge::ChallengeResponse,
            crate::dto::challenge::CreateChallengeRequest,
            crate::dto::challenge::UpdateChallengeRequest,
            crate::dto::challenge::LossResponse,
            crate::dto::challenge::MessageResponse,
            crate::dto::widget::ColorThemeDto,
            crate::dto::widget::WidgetDto,
            crate::dto::widget::WidgetListResponse,
            crate::dto::widget::WidgetResponse,
            crate::dto::widget::CreateWidgetRequest,
            crate::dto::widget::UpdateWidgetRequest,
            crate::dto::faceit::FaceitPlayerDto,
            crate::dto::faceit::RecentMatchesDto,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session issuance for the sign-in bridge"),
        (name = "profile", description = "Signed-in user profile and linked accounts"),
        (name = "challenges", description = "Win/loss challenge tracker"),
        (name = "widgets", description = "FACEIT stats widget registry"),
        (name = "faceit", description = "Read-only FACEIT Data API proxy"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by session-gated routes.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_tracker_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/challenges",
            "/challenges/{id}",
            "/challenges/{id}/win",
            "/challenges/{id}/lose",
            "/challenges/{id}/reset",
            "/widgets/{id}",
            "/faceit/matches",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
