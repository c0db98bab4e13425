//! Command implementations.

pub mod admin;
pub mod demand;
pub mod export;
pub mod format;
pub mod report;
pub mod session;
pub mod usage;

use anyhow::Result;
use hms_core::{Principal, Role, ServiceError};
use inventory::{Demand, InventoryService};
use serde::Serialize;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    Table,
    Json,
}

/// What every data command runs against: the open service, the logged-in
/// caller and the output mode.
pub struct Ctx {
    pub service: InventoryService,
    pub principal: Principal,
    pub output: Output,
}

impl Ctx {
    /// Owner restriction for listings. Incharges only see their own records.
    pub fn scope(&self) -> Option<String> {
        match self.principal.role {
            Role::Admin => None,
            Role::Incharge => Some(self.principal.id.clone()),
        }
    }

    /// Load a demand the caller is allowed to look at.
    pub fn visible_demand(&self, id: &str) -> Result<Demand> {
        let demand = self.service.get_demand(id)?;
        if let Some(owner) = self.scope() {
            if demand.owner_id != owner {
                return Err(ServiceError::PermissionDenied(format!(
                    "demand '{id}' belongs to another incharge"
                ))
                .into());
            }
        }
        Ok(demand)
    }

    pub fn json(&self) -> bool {
        self.output == Output::Json
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask on stderr; anything but `y` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N]: ");
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}
