use actix_web::cookie::Cookie;
use actix_web::web::Data;
use chrono::Duration;

use crmdesk::auth::session_cookie;
use crmdesk::data::{Contact, ContactStatus, NewContact};
use crmdesk::state::AppState;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct horse battery";

/// Application state with in-memory stores and one user.
pub fn test_state() -> Data<AppState> {
    test_state_with_ttl(Duration::hours(1))
}

pub fn test_state_with_ttl(session_ttl: Duration) -> Data<AppState> {
    let state = AppState::in_memory(session_ttl).unwrap();
    state.users().add_user(USERNAME, PASSWORD).unwrap();
    Data::new(state)
}

/// A session cookie for the test user, skipping the login form.
pub fn login(state: &Data<AppState>) -> Cookie<'static> {
    let token = state.sessions().create(USERNAME);
    session_cookie(&token)
}

pub fn add_contact(state: &Data<AppState>, name: &str, email: &str, status: ContactStatus) -> Contact {
    state.contacts().create(NewContact {
        name: name.to_string(),
        email: email.to_string(),
        status,
        ..Default::default()
    }).unwrap()
}

pub fn add_sample_contacts(state: &Data<AppState>) -> Vec<Contact> {
    vec![
        add_contact(state, "Ada Lovelace", "ada@engine.org", ContactStatus::Lead),
        add_contact(state, "Alan Turing", "alan@bletchley.uk", ContactStatus::Lead),
        add_contact(state, "Grace Hopper", "grace@navy.mil", ContactStatus::Customer),
    ]
}
