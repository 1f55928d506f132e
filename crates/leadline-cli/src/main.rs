mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{agents, backup, completions, import, leads, Context};
use crate::error::{exit_code_for, report_error};
use leadline_config as config;
use leadline_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "leadline", version, about = "leadline CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Acting agent; falls back to `default_actor` from the config file.
    #[arg(long, global = true)]
    actor: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "add-lead")]
    AddLead(leads::AddLeadArgs),
    #[command(name = "edit-lead")]
    EditLead(leads::EditLeadArgs),
    Show(leads::ShowArgs),
    List(leads::ListArgs),
    Delete(leads::DeleteArgs),
    /// Bulk-import leads from a JSON file
    Import(import::ImportArgs),
    #[command(subcommand)]
    Agent(agents::AgentCommand),
    Backup(backup::BackupArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        actor,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path.clone()) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }
            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;

            if verbose {
                debug!(path = %db_path.display(), "database path resolved");
            }

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
                actor,
            };

            match command {
                Command::AddLead(args) => leads::add_lead(&ctx, args),
                Command::EditLead(args) => leads::edit_lead(&ctx, args),
                Command::Show(args) => leads::show_lead(&ctx, args),
                Command::List(args) => leads::list_leads(&ctx, args),
                Command::Delete(args) => leads::delete_lead(&ctx, args),
                Command::Import(args) => import::import_leads(&ctx, args),
                Command::Agent(cmd) => match cmd {
                    agents::AgentCommand::Add(args) => agents::add_agent(&ctx, args),
                    agents::AgentCommand::Ls(args) => agents::list_agents(&ctx, args),
                },
                Command::Backup(args) => backup::backup(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
