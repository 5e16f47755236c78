//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or clearing a session claim.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionClaim, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const SESSION_EPOCH_KEY: &str = "session_epoch";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user` under its current session epoch.
    ///
    /// The session state is renewed first so a cookie issued before
    /// authentication cannot be reused afterwards.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        let claim = SessionClaim::issue(user);
        self.0.renew();
        self.insert(USER_ID_KEY, claim.user().get())?;
        self.insert(SESSION_EPOCH_KEY, claim.epoch())
    }

    /// Fetch the session claim, if one is present.
    ///
    /// Sessions missing either value, or holding values that do not decode,
    /// are treated as anonymous.
    pub fn claim(&self) -> Result<Option<SessionClaim>, Error> {
        let user = self.read_i64(USER_ID_KEY);
        let epoch = self.read_i64(SESSION_EPOCH_KEY);
        Ok(user
            .zip(epoch)
            .map(|(user, epoch)| SessionClaim::new(UserId::new(user), epoch)))
    }

    fn insert(&self, key: &str, value: i64) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read_i64(&self, key: &str) -> Option<i64> {
        self.0.get::<i64>(key).unwrap_or_else(|error| {
            tracing::warn!(key, "invalid value in session cookie: {error}");
            None
        })
    }

    /// Drop all session state; the response clears the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::domain::{EmailAddress, Username};

    fn ada() -> User {
        User::new(
            UserId::new(42),
            Username::new("ada").expect("valid username"),
            EmailAddress::new("ada@example.com").expect("valid email"),
            None,
        )
        .with_session_epoch(3)
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    session.persist_user(&ada())?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/set-legacy",
                web::get().to(|session: Session| async move {
                    session.insert(USER_ID_KEY, 42_i64).expect("set user id");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/set-invalid",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-number")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let body = session.claim()?.map_or_else(
                        || "anonymous".to_owned(),
                        |claim| format!("{}@{}", claim.user(), claim.epoch()),
                    );
                    Ok::<_, Error>(HttpResponse::Ok().body(body))
                }),
            )
            .route(
                "/purge",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::Ok()
                }),
            )
    }

    async fn get_with<S>(app: &S, path: &str, cookie: Option<Cookie<'static>>) -> ServiceResponse
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let mut req = test::TestRequest::get().uri(path);
        if let Some(cookie) = cookie {
            req = req.cookie(cookie);
        }
        test::call_service(app, req.to_request()).await
    }

    fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
            .expect("session cookie set")
    }

    async fn body_text(res: ServiceResponse) -> String {
        assert_eq!(res.status(), StatusCode::OK);
        String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn round_trips_the_claim() {
        let app = test::init_service(session_test_app()).await;
        let cookie = session_cookie(&get_with(&app, "/set", None).await);
        assert_eq!(body_text(get_with(&app, "/get", Some(cookie)).await).await, "42@3");
    }

    #[actix_web::test]
    async fn sessions_without_an_epoch_are_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let cookie = session_cookie(&get_with(&app, "/set-legacy", None).await);
        assert_eq!(
            body_text(get_with(&app, "/get", Some(cookie)).await).await,
            "anonymous"
        );
    }

    #[actix_web::test]
    async fn missing_cookie_is_anonymous() {
        let app = test::init_service(session_test_app()).await;
        assert_eq!(body_text(get_with(&app, "/get", None).await).await, "anonymous");
    }

    #[actix_web::test]
    async fn tampered_user_id_is_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let cookie = session_cookie(&get_with(&app, "/set-invalid", None).await);
        assert_eq!(
            body_text(get_with(&app, "/get", Some(cookie)).await).await,
            "anonymous"
        );
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let cookie = session_cookie(&get_with(&app, "/set", None).await);
        let removal = session_cookie(&get_with(&app, "/purge", Some(cookie)).await);
        assert_eq!(removal.value(), "");
    }
}
