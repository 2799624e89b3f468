use std::net::TcpListener;
use std::process;

use actix_web::web::Data;
use clap::Parser;
use crmdesk::args::Args;
use crmdesk::config::Config;
use crmdesk::setup;
use crmdesk::state::AppState;
use log::{error, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from(Args::parse());

    if let Err(err) = TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("could not start logging: {}", err);
    }

    if let Err(err) = setup::ensure_data_dir(&config.data_dir, config.assume_yes) {
        error!("{}", err);
        process::exit(1);
    }

    let state = match AppState::open(&config) {
        Ok(state) => state,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = setup::ensure_admin(&mut state.users(), config.assume_yes) {
        error!("{}", err);
        process::exit(1);
    }

    let listener = TcpListener::bind(&config.addr)?;
    info!("running on http://{}", config.addr);

    crmdesk::run(listener, Data::new(state), config.workers)?.await
}
