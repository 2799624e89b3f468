use actix_web::http::StatusCode;
use actix_web::web::{Bytes, Data, Query};
use actix_web::{get, post, HttpRequest, HttpResponse};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::auth::{removal_cookie, session_cookie, CurrentUser, SESSION_COOKIE};
use crate::error::CrmError;
use crate::forms::login::{local_path, LoginForm, LoginValues};
use crate::forms::FormErrors;
use crate::router::{html, redirect};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid username or password.";

#[derive(Deserialize)]
pub(super) struct LoginQuery {
    next: Option<String>,
}

#[derive(Serialize)]
struct LoginData<'a> {
    title: &'static str,
    form: &'a LoginValues,
    errors: &'a FormErrors,
    message: Option<&'static str>,
}

#[get("/login")]
pub(super) async fn login_form(req: HttpRequest, state: Data<AppState>, query: Query<LoginQuery>) -> Result<HttpResponse, CrmError> {
    if CurrentUser::from_session(&req).is_some() {
        return Ok(redirect("/"));
    }
    let values = LoginValues {
        username: None,
        next: query.next.as_deref().and_then(local_path),
    };
    render_login(&state, &values, &FormErrors::new(), None, StatusCode::OK)
}

#[post("/login")]
pub(super) async fn login(state: Data<AppState>, body: Bytes) -> Result<HttpResponse, CrmError> {
    let form = match LoginForm::from_request(&body) {
        Ok(form) => form,
        Err((values, errors)) => return render_login(&state, &values, &errors, None, StatusCode::UNPROCESSABLE_ENTITY),
    };

    let verified = state.users().verify(&form.username, &form.password);
    if !verified {
        warn!("failed login for user {}", form.username);
        let values = LoginValues { username: Some(form.username), next: form.next };
        return render_login(&state, &values, &FormErrors::new(), Some(BAD_CREDENTIALS), StatusCode::UNAUTHORIZED);
    }

    let token = state.sessions().create(&form.username);
    info!("user {} logged in", form.username);

    let mut response = redirect(form.next.as_deref().unwrap_or("/"));
    response.add_cookie(&session_cookie(&token))
        .map_err(|_| CrmError::Internal("could not set the session cookie"))?;
    Ok(response)
}

#[post("/logout")]
pub(super) async fn logout(req: HttpRequest, state: Data<AppState>) -> Result<HttpResponse, CrmError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Some(session) = state.sessions().remove(cookie.value()) {
            info!("user {} logged out", session.username);
        }
    }

    let mut response = redirect("/login");
    response.add_cookie(&removal_cookie())
        .map_err(|_| CrmError::Internal("could not clear the session cookie"))?;
    Ok(response)
}

fn render_login(state: &AppState, form: &LoginValues, errors: &FormErrors, message: Option<&'static str>, status: StatusCode) -> Result<HttpResponse, CrmError> {
    let body = state.templates.render("login", &LoginData {
        title: "Log in",
        form,
        errors,
        message,
    })?;
    Ok(html(status, body))
}
