use std::future::{ready, Ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};

pub use session::{Session, SessionStore};
pub use users::{User, UserStore};

use crate::error::CrmError;
use crate::state::AppState;

/// Login sessions.
mod session;
/// User accounts and password hashes.
mod users;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "crm_session";

/// Header htmx adds to every request it makes.
pub const HX_REQUEST: &str = "HX-Request";
/// Set by htmx when it refetches a whole page to restore browser history.
pub const HX_HISTORY_RESTORE_REQUEST: &str = "HX-History-Restore-Request";

/// The logged-in user. Taking this as a handler argument makes the route require a login.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub username: String,
    pub token: String,
}

impl CurrentUser {
    /// Looks up the session named by the request's cookie, if it is still valid.
    pub fn from_session(req: &HttpRequest) -> Option<CurrentUser> {
        let token = req.cookie(SESSION_COOKIE)?.value().to_string();
        let state = req.app_data::<Data<AppState>>()?;
        let session = state.sessions().get(&token)?;
        Some(CurrentUser { username: session.username, token })
    }
}

impl FromRequest for CurrentUser {
    type Error = CrmError;
    type Future = Ready<Result<CurrentUser, CrmError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = CurrentUser::from_session(req).ok_or_else(|| CrmError::Unauthorized {
            next: req.uri().path_and_query().map_or("/", |path| path.as_str()).to_string(),
            htmx: is_htmx(req),
        });
        ready(user)
    }
}

pub fn is_htmx(req: &HttpRequest) -> bool {
    req.headers().contains_key(HX_REQUEST)
}

/// An htmx request that still wants a full page back.
pub fn is_history_restore(req: &HttpRequest) -> bool {
    req.headers().contains_key(HX_HISTORY_RESTORE_REQUEST)
}

pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// A cookie that makes the browser forget the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}
