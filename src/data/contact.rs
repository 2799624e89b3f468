use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ContactId = u64;

/// Where a contact stands in the sales pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Lead,
    Prospect,
    Customer,
    Lost,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 4] = [
        ContactStatus::Lead,
        ContactStatus::Prospect,
        ContactStatus::Customer,
        ContactStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Lead => "lead",
            ContactStatus::Prospect => "prospect",
            ContactStatus::Customer => "customer",
            ContactStatus::Lost => "lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactStatus::Lead => "Lead",
            ContactStatus::Prospect => "Prospect",
            ContactStatus::Customer => "Customer",
            ContactStatus::Lost => "Lost",
        }
    }

    /// Parses the lowercase form used in URLs and form fields.
    pub fn parse(value: &str) -> Option<ContactStatus> {
        ContactStatus::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: ContactStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields of a contact a user can edit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: ContactStatus,
    pub notes: String,
}

impl Contact {
    pub(crate) fn new(id: ContactId, fields: NewContact, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            status: fields.status,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn apply(&mut self, fields: NewContact, now: DateTime<Utc>) {
        self.name = fields.name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.company = fields.company;
        self.status = fields.status;
        self.notes = fields.notes;
        self.updated_at = now;
    }

    /// Case-insensitive substring match over the searchable fields. `needle` must be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.company, &self.phone]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Narrows a contact listing. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub status: Option<ContactStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_serialized_form() {
        for status in ContactStatus::ALL {
            assert_eq!(ContactStatus::parse(status.as_str()), Some(status));
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", status.as_str()));
        }
        assert_eq!(ContactStatus::parse("Lead"), None);
        assert_eq!(ContactStatus::parse(""), None);
    }

    #[test]
    fn matches_searches_name_email_company_and_phone() {
        let contact = Contact::new(1, NewContact {
            name: String::from("Ada Lovelace"),
            email: String::from("ada@engine.org"),
            phone: String::from("+44 20 7946 0000"),
            company: String::from("Analytical Engines"),
            ..Default::default()
        }, Utc::now());

        assert!(contact.matches("lovelace"));
        assert!(contact.matches("engine.org"));
        assert!(contact.matches("analytical"));
        assert!(contact.matches("7946"));
        assert!(!contact.matches("babbage"));
    }
}
