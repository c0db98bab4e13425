//! Login / logout commands.
//!
//! There are no passwords: a session is just the role-tagged principal
//! written into the config file.

use std::path::Path;

use anyhow::Result;
use hms_core::{Principal, Role};

use super::{print_json, Output};
use crate::config::ClientConfig;

pub fn login(role: Role, id: &str, name: &str, config_path: &Path) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        anyhow::bail!("--id cannot be empty.");
    }
    let name = match name.trim() {
        "" => match role {
            Role::Admin => "Admin",
            Role::Incharge => "Incharge",
        },
        n => n,
    };

    let mut config = ClientConfig::load(config_path)?;
    config.session = Some(Principal::new(id, name, role));
    config.save(config_path)?;

    println!("Logged in as {} ({}, id {}).", name, role, id);
    Ok(())
}

pub fn logout(config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    match config.session.take() {
        Some(p) => {
            config.save(config_path)?;
            println!("Logged out {}.", p.name);
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn whoami(output: Output, config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let principal = config.session()?;
    if output == Output::Json {
        return print_json(principal);
    }
    println!("{} ({}, id {})", principal.name, principal.role, principal.id);
    Ok(())
}
