use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::data::{Contact, ContactStatus, NewContact};
use crate::forms::{decode, required, FormErrors};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_COMPANY_LEN: usize = 100;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^[0-9 +\-().]{7,20}$").unwrap();
}

/// The raw values of a submitted contact form. Kept around so a rejected form can be shown again as typed.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ContactForm {
    /// Parse requests with a Content-Type of `application/x-www-form-urlencoded`
    pub fn parse(request_body: &[u8]) -> ContactForm {
        let mut form_data = decode(request_body);
        ContactForm {
            name: form_data.remove("name"),
            email: form_data.remove("email"),
            phone: form_data.remove("phone"),
            company: form_data.remove("company"),
            status: form_data.remove("status"),
            notes: form_data.remove("notes"),
        }
    }

    /// Pre-fills the form with a stored contact.
    pub fn from_contact(contact: &Contact) -> ContactForm {
        ContactForm {
            name: Some(contact.name.clone()),
            email: Some(contact.email.clone()),
            phone: Some(contact.phone.clone()),
            company: Some(contact.company.clone()),
            status: Some(contact.status.as_str().to_string()),
            notes: Some(contact.notes.clone()),
        }
    }

    /// Parses and validates in one step.
    pub fn from_request(request_body: &[u8]) -> Result<NewContact, FormErrors> {
        ContactForm::parse(request_body).validate()
    }

    /// Checks every field, collecting all problems before giving up.
    pub fn validate(&self) -> Result<NewContact, FormErrors> {
        let mut errors = FormErrors::new();
        let form_data = self.present_fields();

        let name = required(&form_data, "name", &mut errors);
        if let Some(name) = &name {
            if name.chars().count() > MAX_NAME_LEN {
                errors.add("name", format!("Name must be at most {} characters.", MAX_NAME_LEN));
            }
        }

        let email = required(&form_data, "email", &mut errors).map(|email| email.to_lowercase());
        if let Some(email) = &email {
            if email.len() > MAX_EMAIL_LEN || !EMAIL.is_match(email) {
                errors.add("email", "Enter a valid email address.");
            }
        }

        let phone = trimmed(&self.phone);
        if !phone.is_empty() && (!PHONE.is_match(&phone) || !phone.chars().any(|c| c.is_ascii_digit())) {
            errors.add("phone", "Enter a phone number of 7 to 20 digits, spaces or + - ( ) . characters.");
        }

        let company = trimmed(&self.company);
        if company.chars().count() > MAX_COMPANY_LEN {
            errors.add("company", format!("Company must be at most {} characters.", MAX_COMPANY_LEN));
        }

        let status = match trimmed(&self.status).as_str() {
            "" => Some(ContactStatus::default()),
            value => ContactStatus::parse(value),
        };
        if status.is_none() {
            errors.add("status", "Choose one of lead, prospect, customer or lost.");
        }

        match (name, email, status) {
            (Some(name), Some(email), Some(status)) if errors.is_empty() => Ok(NewContact {
                name,
                email,
                phone,
                company,
                status,
                notes: trimmed(&self.notes),
            }),
            _ => Err(errors),
        }
    }

    fn present_fields(&self) -> HashMap<String, String> {
        [("name", &self.name), ("email", &self.email)].into_iter()
            .filter_map(|(field, value)| value.clone().map(|value| (field.to_string(), value)))
            .collect()
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}
