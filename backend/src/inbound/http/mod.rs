//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers resolve the caller from the session cookie, delegate to the
//! driving ports held in [`state::HttpState`], and report failures as bare
//! status codes.

pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod surveys;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// JSON extractor configuration shared by every JSON endpoint.
///
/// Undecodable bodies become `400 Bad Request` with no body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(error::json_error_handler)
}

/// Register every API handler on `cfg`.
///
/// Mount under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(users::register)
        .service(users::current_user)
        .service(users::update_profile)
        .service(users::login)
        .service(users::logout)
        .service(surveys::list_surveys)
        .service(surveys::submit_survey)
        .service(surveys::get_survey)
        .service(surveys::list_operating_systems)
        .service(surveys::get_operating_system);
}
