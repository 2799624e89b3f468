use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
/// Longest accepted `--session-hours`.
pub const MAX_SESSION_HOURS: i64 = 24 * 365;

/// The HTTP server for crmdesk. Point it at a data directory to get started!
#[derive(Parser, Debug)]
#[command(author = AUTHORS, version = VERSION, about)]
pub struct Args {
    /// (Optional) Host name or IP address to serve from.
    #[arg(long, default_value_t = String::from("127.0.0.1"))]
    pub host: String,
    #[arg(short, long, default_value_t = 4000)]
    /// (Optional) Port number to open on host.
    pub port: u16,
    /// (Optional) Directory holding contacts.json and users.json.
    #[arg(short, long, default_value = "./data")]
    pub data: PathBuf,
    /// (Optional) Directory of .hbs files overriding the built-in pages.
    #[arg(long)]
    pub pages: Option<PathBuf>,
    /// (Optional) Directory of static files served under /static.
    #[arg(long, default_value = "./static")]
    pub assets: PathBuf,
    /// (Optional) Hours a login session stays valid, up to a year.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=MAX_SESSION_HOURS))]
    pub session_hours: u32,
    /// (Optional) One of off, error, warn, info, debug, trace.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
    /// (Optional) Number of worker threads. Defaults to the number of CPUs.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Skip setup prompts. The admin account is then read from CRM_ADMIN_USER and CRM_ADMIN_PASSWORD.
    #[arg(short, long)]
    pub yes: bool,
}
