use serde::Serialize;

use crate::forms::{decode, required, FormErrors};

#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Where to go after logging in. Only ever a path on this site.
    pub next: Option<String>,
}

/// What gets echoed back into a rejected login form. The password never is.
#[derive(Serialize, Debug, Clone, Default)]
pub struct LoginValues {
    pub username: Option<String>,
    pub next: Option<String>,
}

impl LoginForm {
    /// Parse requests with a Content-Type of `application/x-www-form-urlencoded`
    pub fn from_request(request_body: &[u8]) -> Result<LoginForm, (LoginValues, FormErrors)> {
        let form_data = decode(request_body);
        let mut errors = FormErrors::new();

        let username = required(&form_data, "username", &mut errors);
        let password = form_data.get("password").filter(|password| !password.is_empty()).cloned();
        if password.is_none() {
            errors.add("password", "'password' field is missing.");
        }
        let next = form_data.get("next").and_then(|next| local_path(next));

        match (username, password) {
            (Some(username), Some(password)) => Ok(LoginForm { username, password, next }),
            (username, _) => Err((LoginValues { username, next }, errors)),
        }
    }
}

/// Accepts only paths on this site, so a crafted link cannot send the user elsewhere after login.
pub fn local_path(target: &str) -> Option<String> {
    let target = target.trim();
    let is_local = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(|c| c.is_control());
    is_local.then(|| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_credentials_and_next() {
        let form = LoginForm::from_request(b"username=admin&password=hunter2+hunter2&next=%2Fcontacts%3Fq%3Dada").unwrap();
        assert_eq!(form, LoginForm {
            username: String::from("admin"),
            password: String::from("hunter2 hunter2"),
            next: Some(String::from("/contacts?q=ada")),
        });
    }

    #[test]
    fn password_is_not_trimmed_or_echoed() {
        let form = LoginForm::from_request(b"username=admin&password=+secret+").unwrap();
        assert_eq!(form.password, " secret ");

        let (values, errors) = LoginForm::from_request(b"username=admin&password=").unwrap_err();
        assert_eq!(values.username.as_deref(), Some("admin"));
        assert_eq!(errors.get("password"), Some("'password' field is missing."));
        assert!(serde_json::to_string(&values).unwrap().find("password").is_none());
    }

    #[test]
    fn missing_username() {
        let (_, errors) = LoginForm::from_request(b"password=x").unwrap_err();
        assert_eq!(errors.get("username"), Some("'username' field is missing."));
    }

    #[test]
    fn only_local_next_targets_are_kept() {
        assert_eq!(local_path("/"), Some(String::from("/")));
        assert_eq!(local_path("/contacts/4"), Some(String::from("/contacts/4")));
        assert_eq!(local_path("https://evil.example"), None);
        assert_eq!(local_path("//evil.example"), None);
        assert_eq!(local_path("/\\evil.example"), None);
        assert_eq!(local_path("contacts"), None);
        assert_eq!(local_path("/a\r\nSet-Cookie: x"), None);
    }
}
