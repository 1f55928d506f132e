use crate::error::invalid_input;
use anyhow::Result;
use leadline_config::AppConfig;
use leadline_core::domain::{Agent, AgentName};
use leadline_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod agents;
pub mod backup;
pub mod completions;
pub mod import;
pub mod leads;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
    /// Raw `--actor` value; resolved against the agent directory on demand.
    pub actor: Option<String>,
}

/// Resolves the acting principal for commands that need one: the `--actor`
/// flag wins, then `default_actor` from the config file.
pub fn resolve_actor(ctx: &Context<'_>) -> Result<Agent> {
    let raw = match ctx.actor.as_deref() {
        Some(value) => value.to_string(),
        None => ctx.config.default_actor.clone().ok_or_else(|| {
            invalid_input("no actor: pass --actor or set default_actor in the config file")
        })?,
    };
    let name = AgentName::new(&raw)?;
    Ok(ctx.store.agents().require(&name)?)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
