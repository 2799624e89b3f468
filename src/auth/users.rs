use std::collections::BTreeMap;
use std::path::PathBuf;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use log::info;
use serde::{Deserialize, Serialize};

use crate::data::persist;
use crate::error::CrmError;

pub const MAX_USERNAME_LEN: usize = 64;
pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    /// Verified against when the username is unknown, so both cases cost the same.
    static ref DUMMY_HASH: Option<String> = hash_password("not the password of anyone").ok();
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    /// PHC string produced by Argon2.
    pub password_hash: String,
}

/// Accounts allowed to log in. Backed by a JSON file unless created with [`UserStore::in_memory`].
pub struct UserStore {
    path: Option<PathBuf>,
    users: BTreeMap<String, User>,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<UserStore, CrmError> {
        let path = path.into();
        let users: Vec<User> = persist::load_json(&path)?;
        Ok(UserStore {
            path: Some(path),
            users: users.into_iter().map(|user| (user.username.clone(), user)).collect(),
        })
    }

    pub fn in_memory() -> UserStore {
        UserStore { path: None, users: BTreeMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn add_user(&mut self, username: &str, password: &str) -> Result<(), CrmError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CrmError::InvalidUser(String::from("Username must not be blank.")));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(CrmError::InvalidUser(format!("Username must be at most {} characters.", MAX_USERNAME_LEN)));
        }
        if self.users.contains_key(username) {
            return Err(CrmError::InvalidUser(format!("User {} already exists.", username)));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CrmError::InvalidUser(format!("Password must be at least {} characters.", MIN_PASSWORD_LEN)));
        }

        let user = User {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        let mut users = self.users.clone();
        users.insert(user.username.clone(), user);

        if let Some(path) = &self.path {
            let list: Vec<&User> = users.values().collect();
            persist::save_json(path, &list)?;
        }
        self.users = users;
        info!("added user {}", username);
        Ok(())
    }

    /// True if the username exists and the password matches its hash.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(user) => verify_password(&user.password_hash, password),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    verify_password(dummy, password);
                }
                false
            }
        }
    }
}

fn hash_password(password: &str) -> Result<String, CrmError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CrmError::PasswordHash(err.to_string()))
}

fn verify_password(password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
