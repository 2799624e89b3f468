use std::path::PathBuf;

use chrono::Duration;
use log::LevelFilter;

use crate::args::Args;

/// File holding every contact.
pub const CONTACTS_FILE: &str = "contacts.json";
/// File holding the user accounts.
pub const USERS_FILE: &str = "users.json";

/// The config for a crmdesk server.
#[derive(Debug, Clone)]
pub struct Config {
    /// The address to bind the server listener to.
    pub addr: String,
    /// Directory for the persisted stores.
    pub data_dir: PathBuf,
    /// Optional directory whose templates replace the built-in ones.
    pub pages_dir: Option<PathBuf>,
    /// Directory searched first for static files.
    pub assets_dir: PathBuf,
    /// How long a login session lasts.
    pub session_ttl: Duration,
    /// Worker thread count, or the framework default when None.
    pub workers: Option<usize>,
    /// Most verbose level the terminal logger prints.
    pub log_level: LevelFilter,
    /// Answer setup questions without prompting.
    pub assume_yes: bool,
}

impl Config {
    pub fn contacts_path(&self) -> PathBuf {
        self.data_dir.join(CONTACTS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Config {
        Config {
            addr: format!("{}:{}", args.host, args.port),
            data_dir: args.data,
            pages_dir: args.pages,
            assets_dir: args.assets,
            session_ttl: Duration::hours(i64::from(args.session_hours)),
            workers: args.workers,
            log_level: args.log_level,
            assume_yes: args.yes,
        }
    }
}
