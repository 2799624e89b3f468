use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Duration;

use crate::assets::Assets;
use crate::auth::{SessionStore, UserStore};
use crate::config::Config;
use crate::data::DataStore;
use crate::error::CrmError;
use crate::render::Templates;

/// Everything handlers share. Each store sits behind its own lock, held for one store call at a time.
pub struct AppState {
    contacts: Mutex<DataStore>,
    users: Mutex<UserStore>,
    sessions: Mutex<SessionStore>,
    pub templates: Templates,
    pub assets: Assets,
}

impl AppState {
    pub fn new(contacts: DataStore, users: UserStore, sessions: SessionStore, templates: Templates, assets: Assets) -> AppState {
        AppState {
            contacts: Mutex::new(contacts),
            users: Mutex::new(users),
            sessions: Mutex::new(sessions),
            templates,
            assets,
        }
    }

    /// Opens the stores in the configured data directory.
    pub fn open(config: &Config) -> Result<AppState, CrmError> {
        Ok(AppState::new(
            DataStore::open(config.contacts_path())?,
            UserStore::open(config.users_path())?,
            SessionStore::new(config.session_ttl),
            Templates::load(config.pages_dir.as_deref())?,
            Assets::new(&config.assets_dir),
        ))
    }

    /// State with empty stores that never touch the disk, and only built-in pages and assets.
    pub fn in_memory(session_ttl: Duration) -> Result<AppState, CrmError> {
        Ok(AppState::new(
            DataStore::in_memory(),
            UserStore::in_memory(),
            SessionStore::new(session_ttl),
            Templates::load(None)?,
            Assets::builtin(),
        ))
    }

    pub fn contacts(&self) -> MutexGuard<'_, DataStore> {
        self.contacts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn users(&self) -> MutexGuard<'_, UserStore> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sessions(&self) -> MutexGuard<'_, SessionStore> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
