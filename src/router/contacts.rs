use actix_web::http::header::{ContentType, VARY};
use actix_web::http::StatusCode;
use actix_web::web::{Bytes, Data, Path, Query};
use actix_web::{get, post, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{is_history_restore, is_htmx, CurrentUser, HX_REQUEST};
use crate::data::{Contact, ContactFilter, ContactId, ContactStatus};
use crate::error::CrmError;
use crate::forms::contact::ContactForm;
use crate::forms::FormErrors;
use crate::router::{html, redirect, status_options, StatusOption};
use crate::state::AppState;

#[derive(Deserialize)]
pub(super) struct ListQuery {
    q: Option<String>,
    status: Option<String>,
}

#[derive(Serialize)]
struct ListData<'a> {
    title: &'static str,
    user: &'a str,
    q: &'a str,
    statuses: Vec<StatusOption>,
    contacts: Vec<Contact>,
}

#[derive(Serialize)]
struct FormData<'a> {
    title: &'static str,
    user: &'a str,
    action: String,
    cancel: String,
    form: &'a ContactForm,
    errors: &'a FormErrors,
    statuses: Vec<StatusOption>,
}

#[derive(Serialize)]
struct DetailData<'a> {
    title: &'a str,
    user: &'a str,
    contact: &'a Contact,
}

/// Full page for browsers and htmx history restores, only the table rows for htmx searches.
#[get("/contacts")]
pub(super) async fn list(req: HttpRequest, state: Data<AppState>, user: CurrentUser, query: Query<ListQuery>) -> Result<HttpResponse, CrmError> {
    let q = query.q.as_deref().unwrap_or_default().trim();
    let status = query.status.as_deref().and_then(ContactStatus::parse);

    let contacts = state.contacts().list(&ContactFilter {
        search: Some(q.to_string()),
        status,
    });
    let data = ListData {
        title: "Contacts",
        user: &user.username,
        q,
        statuses: status_options(status.as_ref().map(ContactStatus::as_str)),
        contacts,
    };

    let template = if is_htmx(&req) && !is_history_restore(&req) { "contact_rows" } else { "contacts" };
    // same URL, two bodies
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((VARY, HX_REQUEST))
        .body(state.templates.render(template, &data)?))
}

#[get("/contacts/new")]
pub(super) async fn new_form(state: Data<AppState>, user: CurrentUser) -> Result<HttpResponse, CrmError> {
    render_form(&state, &user, None, &ContactForm::default(), &FormErrors::new(), StatusCode::OK)
}

#[post("/contacts")]
pub(super) async fn create(state: Data<AppState>, user: CurrentUser, body: Bytes) -> Result<HttpResponse, CrmError> {
    let form = ContactForm::parse(&body);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return render_form(&state, &user, None, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY),
    };

    let created = state.contacts().create(fields);
    match created {
        Ok(contact) => Ok(redirect(&format!("/contacts/{}", contact.id))),
        Err(CrmError::DuplicateEmail(_)) => render_form(&state, &user, None, &form, &duplicate_email(), StatusCode::UNPROCESSABLE_ENTITY),
        Err(err) => Err(err),
    }
}

#[get("/contacts/{id}")]
pub(super) async fn detail(state: Data<AppState>, user: CurrentUser, id: Path<ContactId>) -> Result<HttpResponse, CrmError> {
    let contact = state.contacts().get(*id).ok_or(CrmError::NotFound)?;
    let body = state.templates.render("contact_detail", &DetailData {
        title: &contact.name,
        user: &user.username,
        contact: &contact,
    })?;
    Ok(html(StatusCode::OK, body))
}

#[get("/contacts/{id}/edit")]
pub(super) async fn edit_form(state: Data<AppState>, user: CurrentUser, id: Path<ContactId>) -> Result<HttpResponse, CrmError> {
    let contact = state.contacts().get(*id).ok_or(CrmError::NotFound)?;
    render_form(&state, &user, Some(contact.id), &ContactForm::from_contact(&contact), &FormErrors::new(), StatusCode::OK)
}

#[post("/contacts/{id}")]
pub(super) async fn update(state: Data<AppState>, user: CurrentUser, id: Path<ContactId>, body: Bytes) -> Result<HttpResponse, CrmError> {
    let id = id.into_inner();
    let form = ContactForm::parse(&body);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return render_form(&state, &user, Some(id), &form, &errors, StatusCode::UNPROCESSABLE_ENTITY),
    };

    let updated = state.contacts().update(id, fields);
    match updated {
        Ok(contact) => Ok(redirect(&format!("/contacts/{}", contact.id))),
        Err(CrmError::DuplicateEmail(_)) => render_form(&state, &user, Some(id), &form, &duplicate_email(), StatusCode::UNPROCESSABLE_ENTITY),
        Err(err) => Err(err),
    }
}

/// htmx swaps the deleted row out with the empty response; browsers go back to the list.
#[post("/contacts/{id}/delete")]
pub(super) async fn delete(req: HttpRequest, state: Data<AppState>, _user: CurrentUser, id: Path<ContactId>) -> Result<HttpResponse, CrmError> {
    state.contacts().delete(*id)?;
    if is_htmx(&req) {
        return Ok(HttpResponse::Ok().finish());
    }
    Ok(redirect("/contacts"))
}

fn duplicate_email() -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add("email", "A contact with this email already exists.");
    errors
}

fn render_form(state: &AppState, user: &CurrentUser, id: Option<ContactId>, form: &ContactForm, errors: &FormErrors, status: StatusCode) -> Result<HttpResponse, CrmError> {
    let (title, action, cancel) = match id {
        Some(id) => ("Edit contact", format!("/contacts/{}", id), format!("/contacts/{}", id)),
        None => ("New contact", String::from("/contacts"), String::from("/contacts")),
    };
    let selected = form.status.as_deref()
        .filter(|status| !status.is_empty())
        .unwrap_or(ContactStatus::default().as_str());

    let body = state.templates.render("contact_form", &FormData {
        title,
        user: &user.username,
        action,
        cancel,
        form,
        errors,
        statuses: status_options(Some(selected)),
    })?;
    Ok(html(status, body))
}
