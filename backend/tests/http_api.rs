//! End-to-end behaviour of the REST API over the in-memory adapters.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::rstest;
use serde_json::{Value, json};

use survey_backend::Trace;
use survey_backend::domain::ports::{PasswordHashError, PasswordHasher};
use survey_backend::domain::{Password, PasswordHash, SurveyService, UserAccountService};
use survey_backend::inbound::http::configure_api;
use survey_backend::inbound::http::state::HttpState;
use survey_backend::outbound::memory::{InMemorySurveyStore, InMemoryUserRepository};

/// Reversible stand-in so tests do not pay for Argon2.
struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain:{}", password.expose())))
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain:{}", password.expose()))
    }
}

async fn api()
-> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let users = Arc::new(InMemoryUserRepository::new());
    let surveys = Arc::new(InMemorySurveyStore::new());
    let state = HttpState::new(
        Arc::new(UserAccountService::new(users.clone(), Arc::new(PlainHasher))),
        Arc::new(SurveyService::new(users, surveys.clone(), surveys)),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

struct Reply {
    status: StatusCode,
    cookie: Option<Cookie<'static>>,
    body: Value,
}

async fn send<S>(app: &S, req: test::TestRequest, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        cookie,
        body,
    }
}

async fn register<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        test::TestRequest::post().uri("/api/v1/user/").set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter2",
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.cookie.expect("registration signs in")
}

async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(json!({"username": username, "password": "hunter2"})),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.cookie.expect("login signs in")
}

fn survey(python: Value, rdb: Value, programming: Value, os: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/api/v1/survey/").set_json(json!({
        "python": python,
        "rdb": rdb,
        "programming": programming,
        "os": os,
    }))
}

#[actix_web::test]
async fn every_in_range_rating_is_accepted() {
    let app = api().await;
    let cookie = register(&app, "ada").await;

    for python in 1..=5 {
        for rdb in 1..=5 {
            for programming in 1..=5 {
                let reply = send(
                    &app,
                    survey(json!(python), json!(rdb), json!(programming), "Linux"),
                    Some(&cookie),
                )
                .await;
                assert_eq!(reply.status, StatusCode::CREATED);
                assert_eq!(reply.body["python"], python);
                assert_eq!(reply.body["rdb"], rdb);
                assert_eq!(reply.body["programming"], programming);
            }
        }
    }
}

#[rstest]
#[case(0, 3, 3, false)]
#[case(3, 6, 3, false)]
#[case(3, 3, -1, false)]
#[case(6, 3, 3, true)]
#[case(3, 0, 3, true)]
#[case(3, 3, 6, true)]
#[actix_web::test]
async fn out_of_range_ratings_are_rejected_regardless_of_session(
    #[case] python: i64,
    #[case] rdb: i64,
    #[case] programming: i64,
    #[case] signed_in: bool,
) {
    let app = api().await;
    let cookie = if signed_in {
        Some(register(&app, "ada").await)
    } else {
        None
    };

    let reply = send(
        &app,
        survey(json!(python), json!(rdb), json!(programming), "Linux"),
        cookie.as_ref(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, Value::Null);
}

#[actix_web::test]
async fn anonymous_complete_submission_is_forbidden() {
    let app = api().await;
    let reply = send(&app, survey(json!(1), json!(2), json!(3), "Linux"), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn anonymous_incomplete_submission_is_invalid() {
    let app = api().await;
    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/survey/")
            .set_json(json!({"python": 1, "rdb": 2, "os": "Linux"})),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn string_ratings_are_parsed() {
    let app = api().await;
    let cookie = register(&app, "ada").await;

    let reply = send(
        &app,
        survey(json!("3"), json!("5"), json!("1"), "Linux"),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["python"], 3);
    assert_eq!(reply.body["rdb"], 5);
    assert_eq!(reply.body["programming"], 1);
    assert_eq!(reply.body["os"]["name"], "Linux");
}

#[actix_web::test]
async fn repeated_operating_system_names_share_one_record() {
    let app = api().await;
    let cookie = register(&app, "ada").await;

    let first = send(&app, survey(json!(1), json!(1), json!(1), "Linux"), Some(&cookie)).await;
    let second = send(&app, survey(json!(2), json!(2), json!(2), "Linux"), Some(&cookie)).await;
    assert_eq!(first.body["os"], second.body["os"]);

    let systems = send(&app, test::TestRequest::get().uri("/api/v1/os/"), None).await;
    assert_eq!(systems.body, json!([first.body["os"].clone()]));

    let results = send(&app, test::TestRequest::get().uri("/api/v1/survey/"), None).await;
    let results = results.body.as_array().expect("result list").clone();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result["os"] == first.body["os"]));

    let os_id = first.body["os"]["id"].as_i64().expect("os id");
    let single = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/os/{os_id}/")),
        None,
    )
    .await;
    assert_eq!(single.body["name"], "Linux");
}

#[rstest]
#[case("/api/v1/survey/999/")]
#[case("/api/v1/survey/nine/")]
#[case("/api/v1/os/999/")]
#[actix_web::test]
async fn unknown_records_are_not_found(#[case] uri: &str) {
    let app = api().await;
    let reply = send(&app, test::TestRequest::get().uri(uri), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn duplicate_registration_conflicts_and_creates_nothing() {
    let app = api().await;
    register(&app, "ada").await;

    let reply = send(
        &app,
        test::TestRequest::post().uri("/api/v1/user/").set_json(json!({
            "username": "ada",
            "email": "other@example.com",
            "password": "different",
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert!(reply.cookie.is_none());

    let login = send(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(json!({"username": "ada", "password": "different"})),
        None,
    )
    .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn names_with_digits_are_invalid() {
    let app = api().await;
    let reply = send(
        &app,
        test::TestRequest::post().uri("/api/v1/user/").set_json(json!({
            "username": "jo",
            "email": "jo@example.com",
            "password": "pw",
            "first_name": "Jo3",
            "last_name": "Smith",
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn renaming_onto_a_taken_username_conflicts() {
    let app = api().await;
    register(&app, "ada").await;
    let grace = register(&app, "grace").await;

    let reply = send(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/user/")
            .set_json(json!({"username": "ada"})),
        Some(&grace),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let profile = send(&app, test::TestRequest::get().uri("/api/v1/user/"), Some(&grace)).await;
    assert_eq!(profile.body["username"], "grace");
}

#[actix_web::test]
async fn profile_updates_apply_to_the_caller() {
    let app = api().await;
    let cookie = register(&app, "ada").await;

    let reply = send(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/user/")
            .set_json(json!({"first_name": "Ada", "last_name": "Lovelace"})),
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["username"], "ada");
    assert_eq!(reply.body["first_name"], "Ada");
    assert_eq!(reply.body["last_name"], "Lovelace");
}

#[actix_web::test]
async fn logout_requires_a_session() {
    let app = api().await;
    let reply = send(&app, test::TestRequest::post().uri("/api/v1/user/logout/"), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = api().await;
    register(&app, "ada").await;

    let login = send(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/user/login/")
            .set_json(json!({"username": "ada", "password": "hunter2"})),
        None,
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["username"], "ada");
    let cookie = login.cookie.expect("login signs in");

    let logout = send(
        &app,
        test::TestRequest::post().uri("/api/v1/user/logout/"),
        Some(&cookie),
    )
    .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body, Value::Null);
    let cleared = logout.cookie.expect("removal cookie");
    assert_eq!(cleared.value(), "");

    let profile = send(&app, test::TestRequest::get().uri("/api/v1/user/"), Some(&cleared)).await;
    assert_eq!(profile.status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn logout_revokes_every_copy_of_the_session() {
    let app = api().await;
    let registered = register(&app, "ada").await;
    let signed_in = login(&app, "ada").await;

    let logout = send(
        &app,
        test::TestRequest::post().uri("/api/v1/user/logout/"),
        Some(&signed_in),
    )
    .await;
    assert_eq!(logout.status, StatusCode::OK);

    for stale in [&registered, &signed_in] {
        let profile = send(&app, test::TestRequest::get().uri("/api/v1/user/"), Some(stale)).await;
        assert_eq!(profile.status, StatusCode::FORBIDDEN);
        let again = send(
            &app,
            test::TestRequest::post().uri("/api/v1/user/logout/"),
            Some(stale),
        )
        .await;
        assert_eq!(again.status, StatusCode::FORBIDDEN);
        let submit = send(&app, survey(json!(1), json!(2), json!(3), "Linux"), Some(stale)).await;
        assert_eq!(submit.status, StatusCode::FORBIDDEN);
    }

    let fresh = login(&app, "ada").await;
    let profile = send(&app, test::TestRequest::get().uri("/api/v1/user/"), Some(&fresh)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["username"], "ada");
}
