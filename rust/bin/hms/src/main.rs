//! `hms` — the hospital inventory CLI.
//!
//! Incharges raise demands and record usage against them; admins review
//! demands and read the dashboard. Everything is stored locally in redb.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use hms_core::{Role, ServiceError};
use hms_kv::MemoryStore;
use inventory::{
    CreateDemand, DemandFilter, DemandStatus, InventoryError, InventoryService, RecordUsage,
    UsageFilter,
};

use commands::export::ExportKind;
use commands::{Ctx, Output};
use config::ClientConfig;

/// Hospital inventory tool.
#[derive(Parser, Debug)]
#[command(name = "hms", version, about = "Hospital inventory: demands, usage and stock")]
struct Cli {
    /// Path to client config file (default: ~/.hms/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value = "table")]
    output: Output,

    /// Data directory, overriding the config file.
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of the database file.
    #[arg(long = "in-memory", global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a session as an admin or incharge.
    Login {
        #[arg(long)]
        role: Role,
        /// Identifier recorded as the owner of your demands and usage.
        #[arg(long)]
        id: String,
        /// Display name.
        #[arg(long, default_value = "")]
        name: String,
    },

    /// End the current session.
    Logout,

    /// Show the current session.
    Whoami,

    /// Emergency demands.
    Demand {
        #[command(subcommand)]
        action: DemandAction,
    },

    /// Usage against demands.
    Usage {
        #[command(subcommand)]
        action: UsageAction,
    },

    /// Requested, used and remaining quantity per demand.
    Stock {
        /// Only this demand.
        demand_id: Option<String>,
    },

    /// Dashboard counters (admin).
    Stats,

    /// Export a ledger as CSV.
    Export {
        #[arg(value_enum)]
        what: ExportKind,
        /// Output file or directory (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete all demands and usage records (admin).
    Reset {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show the department / item / subcategory catalog.
    Catalog,
}

#[derive(Subcommand, Debug)]
enum DemandAction {
    /// Raise a new demand (incharge).
    Create(CreateArgs),
    /// List demands.
    List {
        #[arg(long)]
        status: Option<DemandStatus>,
        #[arg(long)]
        department: Option<String>,
        /// Match department, item or subcategory.
        #[arg(long)]
        search: Option<String>,
    },
    /// Approve a pending demand (admin).
    Approve {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Reject a pending demand (admin).
    Reject {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Show one demand with its usage.
    Show { id: String },
    /// Print a shareable request message.
    Share { id: String },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    department: String,
    #[arg(long)]
    item: String,
    #[arg(long)]
    subcategory: String,
    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,
    /// Date needed, YYYY-MM-DD (default: today).
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand, Debug)]
enum UsageAction {
    /// Record usage against one of your demands (incharge).
    Record {
        #[arg(long)]
        demand: String,
        #[arg(long)]
        patient: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Your demands that usage can be recorded against (incharge).
    Demands,
    /// List usage records.
    List {
        #[arg(long)]
        demand: Option<String>,
        #[arg(long)]
        department: Option<String>,
        /// Match patient id or item.
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete all of your usage records (incharge).
    Clear {
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli.output;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(e, output));
            ExitCode::FAILURE
        }
    }
}

/// Error line for stderr: `error [CODE]: message`, or the
/// `{"code", "message"}` object under `-o json`.
fn render_error(err: anyhow::Error, output: Output) -> String {
    let err = match err.downcast::<InventoryError>() {
        Ok(e) => anyhow::Error::from(ServiceError::from(e)),
        Err(e) => e,
    };
    match (err.downcast_ref::<ServiceError>(), output) {
        (Some(e), Output::Json) => e.to_json().to_string(),
        (Some(e), Output::Table) => format!("error [{}]: {}", e.error_code(), e),
        (None, Output::Json) => ServiceError::Internal(format!("{err:#}")).to_json().to_string(),
        (None, Output::Table) => format!("error: {err:#}"),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ClientConfig::default_path);

    match &cli.command {
        Commands::Login { role, id, name } => {
            return commands::session::login(*role, id, name, &config_path);
        }
        Commands::Logout => return commands::session::logout(&config_path),
        Commands::Whoami => return commands::session::whoami(cli.output, &config_path),
        Commands::Catalog => {
            let config = ClientConfig::load(&config_path)?;
            return commands::report::catalog(&config.catalog()?, cli.output);
        }
        _ => {}
    }

    let config = ClientConfig::load(&config_path)?;
    let ctx = open(&config, cli.data_dir, cli.in_memory, cli.output)?;

    match cli.command {
        Commands::Demand { action } => match action {
            DemandAction::Create(args) => {
                let date = args
                    .date
                    .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
                commands::demand::create(
                    &ctx,
                    CreateDemand {
                        department: args.department,
                        item: args.item,
                        subcategory: args.subcategory,
                        quantity: args.quantity,
                        date,
                    },
                )?;
            }
            DemandAction::List {
                status,
                department,
                search,
            } => {
                commands::demand::list(
                    &ctx,
                    DemandFilter {
                        status,
                        department,
                        search,
                        owner_id: None,
                    },
                )?;
            }
            DemandAction::Approve { id, yes } => review(&ctx, &id, DemandStatus::Approved, yes)?,
            DemandAction::Reject { id, yes } => review(&ctx, &id, DemandStatus::Rejected, yes)?,
            DemandAction::Show { id } => commands::demand::show(&ctx, &id)?,
            DemandAction::Share { id } => {
                commands::demand::share(&ctx, &id)?;
            }
        },

        Commands::Usage { action } => match action {
            UsageAction::Record {
                demand,
                patient,
                quantity,
            } => {
                commands::usage::record(
                    &ctx,
                    RecordUsage {
                        demand_id: demand,
                        patient_id: patient,
                        quantity,
                    },
                )?;
            }
            UsageAction::Demands => {
                commands::usage::targets(&ctx)?;
            }
            UsageAction::List {
                demand,
                department,
                search,
            } => {
                commands::usage::list(
                    &ctx,
                    UsageFilter {
                        department,
                        owner_id: None,
                        demand_id: demand,
                        search,
                    },
                )?;
            }
            UsageAction::Clear { yes } => {
                commands::usage::clear(&ctx, yes)?;
            }
        },

        Commands::Stock { demand_id } => commands::report::stock(&ctx, demand_id.as_deref())?,

        Commands::Stats => commands::admin::stats(&ctx)?,

        Commands::Export { what, out } => {
            commands::export::run(&ctx, what, out.as_deref())?;
        }

        Commands::Reset { yes } => {
            commands::admin::reset(&ctx, yes)?;
        }

        Commands::Login { .. } | Commands::Logout | Commands::Whoami | Commands::Catalog => {}
    }

    Ok(())
}

fn review(ctx: &Ctx, id: &str, status: DemandStatus, yes: bool) -> anyhow::Result<()> {
    ctx.principal.require(Role::Admin)?;
    if !commands::demand::confirm_review(id, status, yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    commands::demand::review(ctx, id, status)?;
    Ok(())
}

/// Open the store for a logged-in caller.
fn open(
    config: &ClientConfig,
    data_dir: Option<PathBuf>,
    in_memory: bool,
    output: Output,
) -> anyhow::Result<Ctx> {
    let principal = config.session()?.clone();
    let catalog = config.catalog()?;

    let service = if in_memory {
        tracing::debug!("using in-memory store");
        InventoryService::with_catalog(Arc::new(MemoryStore::new()), catalog)
    } else {
        inventory::open(&config.service_config(data_dir), catalog)?
    };

    Ok(Ctx {
        service,
        principal,
        output,
    })
}
