use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::Result;
use clap::{Args, Subcommand};
use leadline_core::domain::{AgentName, Role};

#[derive(Debug, Subcommand)]
pub enum AgentCommand {
    /// Register an agent in the directory
    Add(AddAgentArgs),
    /// List the agent directory
    Ls(ListAgentsArgs),
}

#[derive(Debug, Args)]
pub struct AddAgentArgs {
    pub name: String,
    #[arg(long, default_value = "user")]
    pub role: String,
}

#[derive(Debug, Args)]
pub struct ListAgentsArgs {}

pub fn add_agent(ctx: &Context<'_>, args: AddAgentArgs) -> Result<()> {
    let name = AgentName::new(&args.name)?;
    let role = Role::parse(&args.role)?;
    let agent = ctx.store.agents().add(now_utc(), &name, role)?;
    if ctx.json {
        print_json(&agent)?;
    } else {
        println!("added {} ({})", agent.user_name, agent.role.as_str());
    }
    Ok(())
}

pub fn list_agents(ctx: &Context<'_>, _args: ListAgentsArgs) -> Result<()> {
    let agents = ctx.store.agents().list_all()?;
    if ctx.json {
        print_json(&agents)?;
        return Ok(());
    }
    if agents.is_empty() {
        println!("no agents");
        return Ok(());
    }
    for agent in agents {
        println!("{}  {}", agent.user_name, agent.role.as_str());
    }
    Ok(())
}
