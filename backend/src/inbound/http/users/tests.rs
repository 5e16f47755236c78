//! Tests for account handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockSurveys, MockUserAccounts};
use crate::domain::{EmailAddress, SessionClaim, UserId, Username};
use crate::inbound::http::json_config;
use crate::inbound::http::test_utils::test_session_middleware;

fn ada(id: i64) -> User {
    User::new(
        UserId::new(id),
        Username::new("ada").expect("valid username"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        None,
    )
}

fn test_app(
    accounts: MockUserAccounts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(accounts), Arc::new(MockSurveys::new()));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(current_user)
                .service(update_profile)
                .service(login)
                .service(logout),
        )
}

fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

#[actix_web::test]
async fn register_returns_created_user_and_session() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_register()
        .withf(|request| request.username.as_deref() == Some("ada"))
        .return_once(|_| Ok(ada(1)));
    accounts
        .expect_profile()
        .withf(|caller| *caller == Some(SessionClaim::new(UserId::new(1), 0)))
        .return_once(|_| Ok(ada(1)));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/")
            .set_json(json!({"username": "ada", "email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res).expect("session cookie");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"id": 1, "username": "ada", "email": "ada@example.com", "first_name": "", "last_name": ""})
    );

    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[actix_web::test]
async fn register_failures_have_empty_bodies(#[case] failure: Error, #[case] expected: StatusCode) {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_register().return_once(move |_| Err(failure));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/")
            .set_json(json!({"username": "ada"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
    assert!(session_cookie(&res).is_none());
    assert!(actix_test::read_body(res).await.is_empty());
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = actix_test::init_service(test_app(MockUserAccounts::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(actix_test::read_body(res).await.is_empty());
}

#[rstest]
#[case(json!({}))]
#[case(json!({"username": "ada"}))]
#[case(json!({"username": "  ", "password": "pw"}))]
#[case(json!({"username": "ada", "password": ""}))]
#[actix_web::test]
async fn login_without_credentials_is_forbidden(#[case] body: Value) {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_login().times(0);
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn login_sets_session_and_returns_user() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_login()
        .withf(|credentials| {
            credentials.username() == "ada" && credentials.password().expose() == "secret"
        })
        .return_once(|_| Ok(ada(3)));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(json!({"username": "ada", "password": "secret"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_some());
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], 3);
}

#[actix_web::test]
async fn update_profile_passes_the_anonymous_caller_through() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_update_profile()
        .withf(|caller, request| caller.is_none() && request.first_name.as_deref() == Some("Jo3"))
        .return_once(|_, _| Err(Error::invalid_request("name contains a digit")));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/user/")
            .set_json(json!({"first_name": "Jo3", "last_name": "Doe"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_without_session_is_forbidden() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_logout()
        .withf(|caller| caller.is_none())
        .return_once(|_| Err(Error::forbidden("authentication required")));
    let app = actix_test::init_service(test_app(accounts)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/logout/")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn logout_clears_the_session_cookie() {
    let mut accounts = MockUserAccounts::new();
    accounts
        .expect_login()
        .return_once(|_| Ok(ada(5).with_session_epoch(2)));
    accounts
        .expect_logout()
        .withf(|caller| *caller == Some(SessionClaim::new(UserId::new(5), 2)))
        .times(1)
        .return_once(|_| Ok(()));
    let app = actix_test::init_service(test_app(accounts)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(json!({"username": "ada", "password": "secret"}))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res).expect("session cookie");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/logout/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let removal = session_cookie(&res).expect("removal cookie");
    assert_eq!(removal.value(), "");
    assert!(actix_test::read_body(res).await.is_empty());
}
