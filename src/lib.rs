use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use crate::state::AppState;

/// Command-line argument parser
pub mod args;
/// Server configuration built from the command line.
pub mod config;
/// Application error type and its HTTP mapping.
pub mod error;
/// Shared state handed to every request handler.
pub mod state;

/// Contact records and the file-backed store holding them.
pub mod data;
/// Data models for form POSTs
pub mod forms;
/// User accounts, password hashing and login sessions.
pub mod auth;
/// Handlebars templates for every page.
pub mod render;
/// Static files for the web frontend.
pub mod assets;
/// URL routes and request handlers.
pub mod router;
/// First-run checks for the data directory and the admin account.
pub mod setup;

/// Starts the HTTP server on the given listener. The returned server must be awaited to run.
pub fn run(listener: TcpListener, state: web::Data<AppState>, workers: Option<usize>) -> Result<Server, std::io::Error> {
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(router::init_routes)
    });

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    Ok(server.listen(listener)?.run())
}
