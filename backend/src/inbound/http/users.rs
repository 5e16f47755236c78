//! Account handlers.
//!
//! ```text
//! POST /api/v1/user/         register and sign in
//! GET  /api/v1/user/         current profile
//! PUT  /api/v1/user/         update profile
//! PUT  /api/v1/user/login/   sign in
//! POST /api/v1/user/logout/  sign out
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{
    Error, LoginCredentials, RegisterUserRequest, UpdateProfileRequest, User, UserDto,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `PUT /api/v1/user/login/`.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Missing or blank credentials cannot match any user.
    fn into_credentials(self) -> Result<LoginCredentials, Error> {
        LoginCredentials::try_from_parts(
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
        .map_err(|err| {
            debug!(reason = %err, "login rejected before lookup");
            Error::forbidden("invalid credentials")
        })
    }
}

/// Register an account and sign the caller in.
#[utoipa::path(
    post,
    path = "/api/v1/user/",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid registration"),
        (status = 409, description = "Username already taken")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/user/")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.accounts.register(payload.into_inner()).await?;
    session.persist_user(&user)?;
    Ok(HttpResponse::Created().json(user))
}

/// Return the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/user/",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 403, description = "Not signed in")
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/user/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user = state.accounts.profile(session.claim()?).await?;
    Ok(web::Json(user))
}

/// Update the signed-in user's username and/or name.
#[utoipa::path(
    put,
    path = "/api/v1/user/",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid update"),
        (status = 403, description = "Not signed in"),
        (status = 409, description = "Username already taken")
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/user/")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .accounts
        .update_profile(session.claim()?, payload.into_inner())
        .await?;
    Ok(web::Json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    put,
    path = "/api/v1/user/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 403, description = "Invalid credentials")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[put("/user/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials = payload.into_inner().into_credentials()?;
    let user = state.accounts.login(&credentials).await?;
    session.persist_user(&user)?;
    Ok(web::Json(user))
}

/// End the current session and revoke any copies of its cookie.
#[utoipa::path(
    post,
    path = "/api/v1/user/logout/",
    responses(
        (status = 200, description = "Signed out"),
        (status = 403, description = "Not signed in")
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/user/logout/")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.accounts.logout(session.claim()?).await?;
    session.purge();
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests;
