use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// Bytes of randomness in a session token.
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Logged-in sessions keyed by the token stored in the session cookie. Lives in memory only.
pub struct SessionStore {
    ttl: Duration,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> SessionStore {
        SessionStore { ttl, sessions: HashMap::new() }
    }

    /// Starts a session and returns its token.
    pub fn create(&mut self, username: &str) -> String {
        self.purge_expired();

        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.sessions.insert(token.clone(), Session {
            username: username.to_string(),
            expires_at: Utc::now() + self.ttl,
        });
        token
    }

    /// The live session for the token. An expired session is dropped.
    pub fn get(&mut self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?;
        if session.expires_at <= Utc::now() {
            self.sessions.remove(token);
            return None;
        }
        Some(session.clone())
    }

    pub fn remove(&mut self, token: &str) -> Option<Session> {
        self.sessions.remove(token)
    }

    pub fn purge_expired(&mut self) {
        let now = Utc::now();
        self.sessions.retain(|_, session| session.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
