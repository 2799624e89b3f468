use std::io::Error as IoError;

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use handlebars::{RenderError, TemplateError};
use log::error;
use thiserror::Error;

use crate::render;

/// Header htmx reads to perform a full-page redirect after an AJAX request.
pub const HX_REDIRECT: &str = "HX-Redirect";

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("The requested page does not exist.")]
    NotFound,
    #[error("A contact with the email {0} already exists.")]
    DuplicateEmail(String),
    /// Raised by protected routes. `next` is the path to return to after logging in.
    #[error("login required")]
    Unauthorized { next: String, htmx: bool },
    #[error("{0}")]
    InvalidUser(String),
    #[error("setup failed: {0}")]
    Setup(String),
    #[error("{0}")]
    Internal(&'static str),
    #[error("template rendering failed: {0}")]
    Template(#[from] RenderError),
    #[error("template is invalid: {0}")]
    TemplateSource(#[from] TemplateError),
    #[error("file error: {0}")]
    Io(#[from] IoError),
    #[error("could not (de)serialize store: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl CrmError {
    /// URL of the login page that sends the user back to `next` afterwards.
    pub fn login_url(next: &str) -> String {
        if next.is_empty() || next == "/" {
            return String::from("/login");
        }
        let encoded: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
        format!("/login?next={}", encoded)
    }
}

impl ResponseError for CrmError {
    fn status_code(&self) -> StatusCode {
        match self {
            CrmError::NotFound => StatusCode::NOT_FOUND,
            CrmError::DuplicateEmail(_) => StatusCode::CONFLICT,
            CrmError::InvalidUser(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CrmError::Unauthorized { htmx: true, .. } => StatusCode::UNAUTHORIZED,
            CrmError::Unauthorized { htmx: false, .. } => StatusCode::SEE_OTHER,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            CrmError::Unauthorized { htmx: true, .. } => HttpResponse::build(status)
                .insert_header((HX_REDIRECT, "/login"))
                .finish(),
            CrmError::Unauthorized { next, .. } => HttpResponse::build(status)
                .insert_header((LOCATION, CrmError::login_url(next)))
                .finish(),
            CrmError::NotFound
            | CrmError::DuplicateEmail(_)
            | CrmError::InvalidUser(_) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(render::error_page(status, &self.to_string())),
            _ => {
                error!("{}", self);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body("Internal Server Error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn login_url_keeps_the_original_path() {
        assert_eq!(CrmError::login_url("/"), "/login");
        assert_eq!(CrmError::login_url("/contacts?q=ann lee"), "/login?next=%2Fcontacts%3Fq%3Dann+lee");
    }

    #[test]
    fn unauthorized_redirects_browsers_to_login() {
        let err = CrmError::Unauthorized { next: String::from("/contacts"), htmx: false };
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login?next=%2Fcontacts");
    }

    #[test]
    fn unauthorized_htmx_requests_get_hx_redirect() {
        let err = CrmError::Unauthorized { next: String::from("/contacts"), htmx: true };
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(HX_REDIRECT).unwrap(), "/login");
        assert!(response.headers().get(LOCATION).is_none());
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let err = CrmError::Io(IoError::new(std::io::ErrorKind::Other, "disk on fire"));
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }

    #[actix_web::test]
    async fn not_found_renders_error_page() {
        let response = CrmError::NotFound.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("404"));
        assert!(body.contains("The requested page does not exist."));
    }
}
