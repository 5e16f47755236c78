//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST path from the inbound layer together with
//! the wire schemas and the session cookie security scheme. Swagger UI serves
//! it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    OperatingSystem, RegisterUserRequest, SubmitSurveyRequest, SurveyResult,
    UpdateProfileRequest, UserDto,
};
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by register and login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Survey backend API",
        description = "Accounts, developer surveys, and operating system labels."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::surveys::list_surveys,
        crate::inbound::http::surveys::submit_survey,
        crate::inbound::http::surveys::get_survey,
        crate::inbound::http::surveys::list_operating_systems,
        crate::inbound::http::surveys::get_operating_system,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserDto,
        RegisterUserRequest,
        UpdateProfileRequest,
        LoginRequest,
        SubmitSurveyRequest,
        SurveyResult,
        OperatingSystem,
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "surveys", description = "Survey results and operating systems"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
