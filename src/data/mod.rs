use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

pub use contact::*;

use crate::error::CrmError;

/// Contact record types.
mod contact;
/// JSON files on disk.
pub(crate) mod persist;

/// How many contacts the dashboard lists as recent.
const RECENT_CONTACTS: usize = 5;

/// On-disk layout of the contact store.
#[derive(Serialize, Deserialize, Default)]
struct ContactsFile {
    next_id: ContactId,
    contacts: Vec<Contact>,
}

/// Holds every contact, keyed by id. Backed by a JSON file unless created with [`DataStore::in_memory`].
pub struct DataStore {
    path: Option<PathBuf>,
    contacts: BTreeMap<ContactId, Contact>,
    next_id: ContactId,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: ContactStatus,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthCount {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// Figures shown on the dashboard and fed to its charts.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub leads: usize,
    pub by_status: Vec<StatusCount>,
    pub by_month: Vec<MonthCount>,
    pub recent: Vec<Contact>,
}

impl DataStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<DataStore, CrmError> {
        let path = path.into();
        let file: ContactsFile = persist::load_json(&path)?;

        let contacts: BTreeMap<ContactId, Contact> = file.contacts.into_iter()
            .map(|contact| (contact.id, contact))
            .collect();
        let after_last = contacts.keys().next_back().map_or(1, |id| id + 1);

        info!("loaded {} contacts from {}", contacts.len(), path.display());
        Ok(DataStore {
            path: Some(path),
            contacts,
            next_id: file.next_id.max(after_last),
        })
    }

    pub fn in_memory() -> DataStore {
        DataStore { path: None, contacts: BTreeMap::new(), next_id: 1 }
    }

    /// Contacts matching the filter, sorted by name.
    pub fn list(&self, filter: &ContactFilter) -> Vec<Contact> {
        let needle = filter.search.as_deref()
            .map(|search| search.trim().to_lowercase())
            .filter(|search| !search.is_empty());

        let mut contacts: Vec<Contact> = self.contacts.values()
            .filter(|contact| filter.status.map_or(true, |status| contact.status == status))
            .filter(|contact| needle.as_deref().map_or(true, |needle| contact.matches(needle)))
            .cloned()
            .collect();
        contacts.sort_by_cached_key(|contact| (contact.name.to_lowercase(), contact.id));
        contacts
    }

    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.contacts.get(&id).cloned()
    }

    pub fn create(&mut self, fields: NewContact) -> Result<Contact, CrmError> {
        self.check_unique_email(&fields.email, None)?;

        let id = self.next_id;
        let contact = Contact::new(id, fields, Utc::now());
        let mut contacts = self.contacts.clone();
        contacts.insert(id, contact.clone());

        self.commit(contacts, id + 1)?;
        info!("created contact {} <{}>", contact.id, contact.email);
        Ok(contact)
    }

    pub fn update(&mut self, id: ContactId, fields: NewContact) -> Result<Contact, CrmError> {
        if !self.contacts.contains_key(&id) {
            return Err(CrmError::NotFound);
        }
        self.check_unique_email(&fields.email, Some(id))?;

        let mut contacts = self.contacts.clone();
        let contact = contacts.get_mut(&id).ok_or(CrmError::NotFound)?;
        contact.apply(fields, Utc::now());
        let contact = contact.clone();

        self.commit(contacts, self.next_id)?;
        info!("updated contact {}", id);
        Ok(contact)
    }

    pub fn delete(&mut self, id: ContactId) -> Result<Contact, CrmError> {
        let mut contacts = self.contacts.clone();
        let contact = contacts.remove(&id).ok_or(CrmError::NotFound)?;

        self.commit(contacts, self.next_id)?;
        info!("deleted contact {}", id);
        Ok(contact)
    }

    pub fn count(&self) -> usize {
        self.contacts.len()
    }

    pub fn lead_count(&self) -> usize {
        self.contacts.values()
            .filter(|contact| contact.status == ContactStatus::Lead)
            .count()
    }

    pub fn stats(&self) -> DashboardStats {
        let by_status = ContactStatus::ALL.iter()
            .map(|status| StatusCount {
                status: *status,
                label: status.label(),
                count: self.contacts.values().filter(|contact| contact.status == *status).count(),
            })
            .collect();

        let mut months: BTreeMap<String, usize> = BTreeMap::new();
        for contact in self.contacts.values() {
            *months.entry(contact.created_at.format("%Y-%m").to_string()).or_default() += 1;
        }
        let by_month = months.into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect();

        let mut recent: Vec<Contact> = self.contacts.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recent.truncate(RECENT_CONTACTS);

        DashboardStats {
            total: self.count(),
            leads: self.lead_count(),
            by_status,
            by_month,
            recent,
        }
    }

    fn check_unique_email(&self, email: &str, except: Option<ContactId>) -> Result<(), CrmError> {
        let taken = self.contacts.values()
            .any(|contact| Some(contact.id) != except && contact.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(CrmError::DuplicateEmail(email.to_string()));
        }
        Ok(())
    }

    /// Persists the new state, then swaps it in. A failed write leaves the store unchanged.
    fn commit(&mut self, contacts: BTreeMap<ContactId, Contact>, next_id: ContactId) -> Result<(), CrmError> {
        if let Some(path) = &self.path {
            let file = ContactsFile { next_id, contacts: contacts.values().cloned().collect() };
            persist::save_json(path, &file)?;
        }
        self.contacts = contacts;
        self.next_id = next_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn fields(name: &str, email: &str, status: ContactStatus) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: email.to_string(),
            status,
            ..Default::default()
        }
    }

    fn sample_store() -> DataStore {
        let mut store = DataStore::in_memory();
        store.create(fields("grace Hopper", "grace@navy.mil", ContactStatus::Customer)).unwrap();
        store.create(fields("Alan Turing", "alan@bletchley.uk", ContactStatus::Lead)).unwrap();
        store.create(fields("Ada Lovelace", "ada@engine.org", ContactStatus::Lead)).unwrap();
        store
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let store = sample_store();
        let ids: Vec<ContactId> = store.contacts.keys().copied().collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn list_sorts_by_name_ignoring_case() {
        let store = sample_store();
        let names: Vec<String> = store.list(&ContactFilter::default()).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ada Lovelace", "Alan Turing", "grace Hopper"]);
    }

    #[test]
    fn list_filters_by_search_and_status() {
        let store = sample_store();

        let found = store.list(&ContactFilter { search: Some(String::from("  NAVY ")), status: None });
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "grace Hopper");

        let leads = store.list(&ContactFilter { search: None, status: Some(ContactStatus::Lead) });
        assert_eq!(leads.len(), 2);

        let none = store.list(&ContactFilter { search: Some(String::from("ada")), status: Some(ContactStatus::Customer) });
        assert!(none.is_empty());

        let blank = store.list(&ContactFilter { search: Some(String::from("   ")), status: None });
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn duplicate_email_is_rejected_on_create_and_update() {
        let mut store = sample_store();

        let err = store.create(fields("Other Ada", "ADA@engine.org", ContactStatus::Lead)).unwrap_err();
        assert!(matches!(err, CrmError::DuplicateEmail(_)));
        assert_eq!(store.count(), 3);

        let err = store.update(2, fields("Alan Turing", "ada@engine.org", ContactStatus::Lead)).unwrap_err();
        assert!(matches!(err, CrmError::DuplicateEmail(_)));

        // keeping its own email is fine
        let updated = store.update(3, fields("Ada King", "ada@engine.org", ContactStatus::Prospect)).unwrap();
        assert_eq!(updated.name, "Ada King");
        assert_eq!(updated.status, ContactStatus::Prospect);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn update_and_delete_missing_contact() {
        let mut store = sample_store();
        assert!(matches!(store.update(42, NewContact::default()), Err(CrmError::NotFound)));
        assert!(matches!(store.delete(42), Err(CrmError::NotFound)));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut store = sample_store();
        store.delete(3).unwrap();
        let contact = store.create(fields("Edsger Dijkstra", "ewd@utexas.edu", ContactStatus::Lead)).unwrap();
        assert_eq!(contact.id, 4);
        assert!(store.get(3).is_none());
    }

    #[test]
    fn lead_count_and_stats() {
        let store = sample_store();
        assert_eq!(store.lead_count(), 2);

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.leads, 2);
        let counts: Vec<(ContactStatus, usize)> = stats.by_status.iter().map(|s| (s.status, s.count)).collect();
        assert_eq!(counts, vec![
            (ContactStatus::Lead, 2),
            (ContactStatus::Prospect, 0),
            (ContactStatus::Customer, 1),
            (ContactStatus::Lost, 0),
        ]);
        assert_eq!(stats.by_month.len(), 1);
        assert_eq!(stats.by_month[0].count, 3);
        assert_eq!(stats.recent.len(), 3);
        assert_eq!(stats.recent[0].id, 3);
    }

    #[test]
    fn stats_on_empty_store() {
        let stats = DataStore::in_memory().stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.len(), 4);
        assert!(stats.by_month.is_empty());
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn reopening_keeps_contacts_and_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        {
            let mut store = DataStore::open(&path).unwrap();
            store.create(fields("Ada Lovelace", "ada@engine.org", ContactStatus::Lead)).unwrap();
            store.create(fields("Alan Turing", "alan@bletchley.uk", ContactStatus::Lead)).unwrap();
            store.delete(2).unwrap();
        }

        let mut store = DataStore::open(&path).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(1).unwrap().email, "ada@engine.org");
        let contact = store.create(fields("Grace Hopper", "grace@navy.mil", ContactStatus::Lead)).unwrap();
        assert_eq!(contact.id, 3);
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("contacts.json");
        let mut store = DataStore::open(&path).unwrap();

        let result = store.create(fields("Ada Lovelace", "ada@engine.org", ContactStatus::Lead));
        assert!(matches!(result, Err(CrmError::Io(_))));
        assert_eq!(store.count(), 0);
        assert_eq!(store.next_id, 1);
    }

    #[test]
    fn corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(DataStore::open(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2");
    }
}
