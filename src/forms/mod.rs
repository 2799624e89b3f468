use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

use form_urlencoded::parse as uri_parse;
use serde::Serialize;

/// Form for creating and editing contacts.
pub mod contact;
/// Form for logging in.
pub mod login;

/// Messages for the fields of a rejected form, keyed by field name.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn new() -> FormErrors {
        FormErrors::default()
    }

    /// Records a message for the field. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join(" "))
    }
}

/// Decodes a body with a Content-Type of `application/x-www-form-urlencoded`.
pub(crate) fn decode(request_body: &[u8]) -> HashMap<String, String> {
    HashMap::from_iter(uri_parse(request_body).into_owned())
}

/// Checks that a required field was sent and is not blank, returning its trimmed value.
pub(crate) fn required(form_data: &HashMap<String, String>, field: &'static str, errors: &mut FormErrors) -> Option<String> {
    match form_data.get(field) {
        None => {
            errors.add(field, format!("'{}' field is missing.", field));
            None
        }
        Some(value) if value.trim().is_empty() => {
            errors.add(field, format!("'{}' field provided with a blank value.", field));
            None
        }
        Some(value) => Some(value.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_handles_escapes_and_plus_signs() {
        let data = decode(b"name=Ada+Lovelace&email=ada%40engine.org&empty=");
        assert_eq!(data.get("name").unwrap(), "Ada Lovelace");
        assert_eq!(data.get("email").unwrap(), "ada@engine.org");
        assert_eq!(data.get("empty").unwrap(), "");
    }

    #[test]
    fn required_reports_missing_and_blank_fields() {
        let data = decode(b"name=%20%20&email=+x+");
        let mut errors = FormErrors::new();

        assert_eq!(required(&data, "name", &mut errors), None);
        assert_eq!(required(&data, "phone", &mut errors), None);
        assert_eq!(required(&data, "email", &mut errors).as_deref(), Some("x"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("'name' field provided with a blank value."));
        assert_eq!(errors.get("phone"), Some("'phone' field is missing."));
    }

    #[test]
    fn errors_serialize_as_a_map() {
        let mut errors = FormErrors::new();
        errors.add("email", "bad");
        errors.add("email", "ignored");
        assert_eq!(serde_json::to_string(&errors).unwrap(), r#"{"email":"bad"}"#);
        assert_eq!(errors.to_string(), "bad");
    }
}
