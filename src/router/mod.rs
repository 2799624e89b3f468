use actix_web::http::header::{ContentType, LOCATION};
use actix_web::http::StatusCode;
use actix_web::web::{self, Data, Path};
use actix_web::{get, HttpResponse, Responder};
use serde::Serialize;

use crate::data::ContactStatus;
use crate::error::CrmError;
use crate::state::AppState;

/// Dashboard page and its chart data.
mod dashboard;
/// Contact list and CRUD pages.
mod contacts;
/// Logging in and out.
mod login;

/// One `<option>` of a status dropdown.
#[derive(Serialize)]
struct StatusOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

fn status_options(selected: Option<&str>) -> Vec<StatusOption> {
    ContactStatus::ALL.iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: selected == Some(status.as_str()),
        })
        .collect()
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

/// `303 See Other`, so a browser follows a form POST with a GET.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

#[get("/static/{file:.*}")]
async fn asset(state: Data<AppState>, file: Path<String>) -> Result<HttpResponse, CrmError> {
    let asset = state.assets.get(&file).ok_or(CrmError::NotFound)?;
    Ok(HttpResponse::Ok()
        .content_type(asset.content_type)
        .body(asset.body.clone()))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body("ok")
}

async fn not_found() -> Result<HttpResponse, CrmError> {
    Err(CrmError::NotFound)
}

pub fn init_routes(config: &mut web::ServiceConfig) {
    config
        .service(dashboard::dashboard)
        .service(dashboard::stats_json)
        .service(contacts::list)
        // before /contacts/{id} so "new" is not taken for an id
        .service(contacts::new_form)
        .service(contacts::create)
        .service(contacts::detail)
        .service(contacts::edit_form)
        .service(contacts::update)
        .service(contacts::delete)
        .service(login::login_form)
        .service(login::login)
        .service(login::logout)
        .service(asset)
        .service(health)
        .default_service(web::to(not_found));
}
