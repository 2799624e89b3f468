use std::env;
use std::fs;
use std::path::Path;

use inquire::{Confirm, Password, Text};
use log::{error, info};

use crate::auth::UserStore;
use crate::error::CrmError;

/// Environment variables holding the admin account for non-interactive setup.
pub const ADMIN_USER_VAR: &str = "CRM_ADMIN_USER";
pub const ADMIN_PASSWORD_VAR: &str = "CRM_ADMIN_PASSWORD";

/// Creates the data directory if it is missing, asking first unless `assume_yes` is set.
pub fn ensure_data_dir(dir: &Path, assume_yes: bool) -> Result<(), CrmError> {
    if dir.is_dir() {
        return Ok(());
    }

    if !assume_yes {
        let create = prompt_to_confirm(
            "No data directory found. Would you like to create it?",
            &format!("This will create \"{}\" to hold contacts and users.", dir.display()),
        )?;
        if !create {
            return Err(CrmError::Setup(format!("data directory {} does not exist", dir.display())));
        }
    }

    fs::create_dir_all(dir)?;
    info!("created data directory {}", dir.display());
    Ok(())
}

/// Makes sure at least one user can log in.
pub fn ensure_admin(users: &mut UserStore, assume_yes: bool) -> Result<(), CrmError> {
    if !users.is_empty() {
        return Ok(());
    }

    let (username, password) = if assume_yes {
        admin_from_vars(env::var(ADMIN_USER_VAR).ok(), env::var(ADMIN_PASSWORD_VAR).ok())?
    } else {
        prompt_for_admin()?
    };
    create_admin(users, &username, &password)
}

fn create_admin(users: &mut UserStore, username: &str, password: &str) -> Result<(), CrmError> {
    users.add_user(username, password)?;
    info!("created admin account {}", username.trim());
    Ok(())
}

fn admin_from_vars(username: Option<String>, password: Option<String>) -> Result<(String, String), CrmError> {
    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(CrmError::Setup(format!(
            "no users exist; set {} and {} to create the admin account",
            ADMIN_USER_VAR, ADMIN_PASSWORD_VAR
        ))),
    }
}

fn prompt_for_admin() -> Result<(String, String), CrmError> {
    let create = prompt_to_confirm(
        "No users found. Would you like to create an admin account?",
        "Nobody can log in until an account exists.",
    )?;
    if !create {
        return Err(CrmError::Setup(String::from("no users exist")));
    }

    let username = Text::new("Admin username:")
        .with_default("admin")
        .prompt()
        .map_err(prompt_error)?;
    let password = Password::new("Admin password:")
        .with_help_message("At least 8 characters.")
        .prompt()
        .map_err(prompt_error)?;
    Ok((username, password))
}

fn prompt_to_confirm(text: &str, subtext: &str) -> Result<bool, CrmError> {
    Confirm::new(text)
        .with_default(true)
        .with_help_message(subtext)
        .prompt()
        .map_err(prompt_error)
}

fn prompt_error(err: inquire::InquireError) -> CrmError {
    error!("{}", err);
    CrmError::Setup(err.to_string())
}
