//! Survey and operating system handlers.
//!
//! ```text
//! GET  /api/v1/survey/       list results
//! POST /api/v1/survey/       submit a result
//! GET  /api/v1/survey/{id}/  one result
//! GET  /api/v1/os/           list operating systems
//! GET  /api/v1/os/{id}/      one operating system
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{
    Error, OperatingSystem, OperatingSystemId, SubmitSurveyRequest, SurveyResult, SurveyResultId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Parse a path segment as a record id; anything else names no record.
fn parse_id(raw: &str, kind: &str) -> Result<i64, Error> {
    raw.parse::<i64>()
        .map_err(|_| Error::not_found(format!("{kind} {raw} not found")))
}

/// List every survey result with its operating system attached.
#[utoipa::path(
    get,
    path = "/api/v1/survey/",
    responses((status = 200, description = "Survey results", body = [SurveyResult])),
    tags = ["surveys"],
    operation_id = "listSurveys",
    security([])
)]
#[get("/survey/")]
pub async fn list_surveys(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<SurveyResult>>> {
    Ok(web::Json(state.surveys.list_results().await?))
}

/// Record a survey result for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/survey/",
    request_body = SubmitSurveyRequest,
    responses(
        (status = 201, description = "Result recorded", body = SurveyResult),
        (status = 400, description = "Missing or invalid ratings"),
        (status = 403, description = "Not signed in")
    ),
    tags = ["surveys"],
    operation_id = "submitSurvey"
)]
#[post("/survey/")]
pub async fn submit_survey(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitSurveyRequest>,
) -> ApiResult<HttpResponse> {
    let result = state
        .surveys
        .submit(session.claim()?, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

/// Fetch one survey result.
#[utoipa::path(
    get,
    path = "/api/v1/survey/{id}/",
    params(("id" = i64, Path, description = "Survey result id")),
    responses(
        (status = 200, description = "Survey result", body = SurveyResult),
        (status = 404, description = "No such result")
    ),
    tags = ["surveys"],
    operation_id = "getSurvey",
    security([])
)]
#[get("/survey/{id}/")]
pub async fn get_survey(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SurveyResult>> {
    let id = SurveyResultId::new(parse_id(&path, "survey result")?);
    Ok(web::Json(state.surveys.result(id).await?))
}

/// List every known operating system.
#[utoipa::path(
    get,
    path = "/api/v1/os/",
    responses((status = 200, description = "Operating systems", body = [OperatingSystem])),
    tags = ["surveys"],
    operation_id = "listOperatingSystems",
    security([])
)]
#[get("/os/")]
pub async fn list_operating_systems(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<OperatingSystem>>> {
    Ok(web::Json(state.surveys.list_operating_systems().await?))
}

/// Fetch one operating system.
#[utoipa::path(
    get,
    path = "/api/v1/os/{id}/",
    params(("id" = i64, Path, description = "Operating system id")),
    responses(
        (status = 200, description = "Operating system", body = OperatingSystem),
        (status = 404, description = "No such operating system")
    ),
    tags = ["surveys"],
    operation_id = "getOperatingSystem",
    security([])
)]
#[get("/os/{id}/")]
pub async fn get_operating_system(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<OperatingSystem>> {
    let id = OperatingSystemId::new(parse_id(&path, "operating system")?);
    Ok(web::Json(state.surveys.operating_system(id).await?))
}
