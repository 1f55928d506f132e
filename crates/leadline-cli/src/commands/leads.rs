use crate::commands::{print_json, resolve_actor, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{
    format_timestamp_datetime, local_offset, now_utc, parse_lead_id, parse_local_timestamp,
};
use anyhow::Result;
use clap::Args;
use leadline_core::domain::{parse_status, AgentName, Lead, Role};
use leadline_core::dto::{FollowUpEventDto, LeadDetailDto, LeadListItemDto};
use leadline_store::repo::{LeadNew, LeadPatch};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct AddLeadArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub mobile: String,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub job_role: Option<String>,
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub next_action_at: Option<String>,
    #[arg(long)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditLeadArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub job_role: Option<String>,
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub next_action_at: Option<String>,
    #[arg(long)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Serialize)]
struct EditReport<'a> {
    lead: &'a Lead,
    transferred_to: Option<String>,
    returned_to: Option<String>,
}

pub fn add_lead(ctx: &Context<'_>, args: AddLeadArgs) -> Result<()> {
    let actor = resolve_actor(ctx)?;
    let now = now_utc();
    let offset = local_offset();

    let status = match args.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => None,
    };
    let next_action_at = match args.next_action_at {
        Some(value) => Some(parse_local_timestamp(&value)?),
        None => None,
    };
    let assigned_to = parse_owner(args.assigned_to)?.flatten();

    let lead = ctx.store.leads().create(
        now,
        offset,
        &actor,
        LeadNew {
            name: args.name,
            mobile: args.mobile,
            status,
            source: args.source,
            job_role: args.job_role,
            budget: args.budget,
            project: args.project,
            remarks: args.remarks,
            next_action_at,
            assigned_to,
        },
    )?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("created {} {}", lead.id, lead.mobile);
        if let Some(owner) = &lead.assigned_to {
            println!("assigned to {}", owner);
        }
    }
    Ok(())
}

pub fn edit_lead(ctx: &Context<'_>, args: EditLeadArgs) -> Result<()> {
    let actor = resolve_actor(ctx)?;
    let now = now_utc();
    let offset = local_offset();
    let id = parse_lead_id(&args.id)?;

    let mut patch = LeadPatch::default();
    if let Some(value) = args.name {
        patch.name = Some(normalize_optional_value(value));
    }
    if let Some(raw) = args.status {
        patch.status = Some(parse_status(&raw)?);
    }
    if let Some(value) = args.source {
        patch.source = Some(normalize_optional_value(value));
    }
    if let Some(value) = args.job_role {
        patch.job_role = Some(normalize_optional_value(value));
    }
    if let Some(value) = args.budget {
        patch.budget = Some(normalize_optional_value(value));
    }
    if let Some(value) = args.project {
        patch.project = Some(normalize_optional_value(value));
    }
    if let Some(value) = args.remarks {
        patch.remarks = Some(normalize_optional_value(value));
    }
    if let Some(raw) = args.next_action_at {
        patch.next_action_at = Some(if raw.trim().is_empty() {
            None
        } else {
            Some(parse_local_timestamp(&raw)?)
        });
    }
    if let Some(raw) = args.assigned_to {
        patch.assigned_to = Some(parse_owner(Some(raw))?.flatten());
    }

    if patch_is_empty(&patch) {
        return Err(invalid_input("no updates provided"));
    }

    let outcome = ctx.store.leads().update(now, offset, &actor, id, patch)?;

    if ctx.json {
        let report = EditReport {
            lead: &outcome.lead,
            transferred_to: outcome.transferred_to.as_ref().map(|name| name.to_string()),
            returned_to: outcome.returned_to.as_ref().map(|name| name.to_string()),
        };
        print_json(&report)?;
    } else {
        println!("updated {}", outcome.lead.id);
        if let Some(target) = &outcome.transferred_to {
            println!("transferred to {} for verification", target);
        }
        if let Some(owner) = &outcome.returned_to {
            println!("returned to {}", owner);
        }
    }
    Ok(())
}

pub fn show_lead(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx
        .store
        .leads()
        .get(id)?
        .ok_or_else(|| not_found("lead not found"))?;

    let events = ctx
        .store
        .follow_ups()
        .events_for_lead(lead.id, ctx.config.history_limit, 0)?;
    let recent_events: Vec<FollowUpEventDto> = events
        .iter()
        .map(|event| FollowUpEventDto {
            date: event.date,
            status: event.status.as_str().to_string(),
            remarks: event.remarks.clone(),
        })
        .collect();

    let detail = LeadDetailDto {
        id: lead.id,
        name: lead.name.clone(),
        mobile: lead.mobile.clone(),
        status: lead.status.map(|status| status.as_str().to_string()),
        source: lead.source.clone(),
        job_role: lead.job_role.clone(),
        budget: lead.budget.clone(),
        project: lead.project.clone(),
        remarks: lead.remarks.clone(),
        next_action_at: lead.next_action_at,
        assigned_to: lead.assigned_to.as_ref().map(|name| name.to_string()),
        escalated: lead.escalated,
        escalated_from: lead.escalated_from.as_ref().map(|name| name.to_string()),
        escalated_at: lead.escalated_at,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
        recent_events,
    };

    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    println!("id: {}", detail.id);
    if let Some(name) = detail.name.as_deref() {
        println!("name: {}", name);
    }
    println!("mobile: {}", detail.mobile);
    if let Some(status) = detail.status.as_deref() {
        println!("status: {}", status);
    }
    if let Some(source) = detail.source.as_deref() {
        println!("source: {}", source);
    }
    if let Some(job_role) = detail.job_role.as_deref() {
        println!("job_role: {}", job_role);
    }
    if let Some(budget) = detail.budget.as_deref() {
        println!("budget: {}", budget);
    }
    if let Some(project) = detail.project.as_deref() {
        println!("project: {}", project);
    }
    if let Some(remarks) = detail.remarks.as_deref() {
        println!("remarks: {}", remarks);
    }
    if let Some(next) = detail.next_action_at {
        println!("next_action_at: {}", format_timestamp_datetime(next));
    }
    if let Some(owner) = detail.assigned_to.as_deref() {
        println!("assigned_to: {}", owner);
    }
    if detail.escalated {
        let from = detail.escalated_from.as_deref().unwrap_or("-");
        println!("escalated: yes (from {})", from);
        if let Some(at) = detail.escalated_at {
            println!("escalated_at: {}", format_timestamp_datetime(at));
        }
    }
    println!(
        "created_at: {}",
        format_timestamp_datetime(detail.created_at)
    );
    println!(
        "updated_at: {}",
        format_timestamp_datetime(detail.updated_at)
    );

    if detail.recent_events.is_empty() {
        println!("follow-ups: none");
    } else {
        println!("follow-ups:");
        for event in detail.recent_events {
            let when = format_timestamp_datetime(event.date);
            let remarks = event.remarks.as_deref().unwrap_or("(no remarks)");
            println!("  {} [{}] {}", when, event.status, remarks);
        }
    }

    Ok(())
}

pub fn list_leads(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let actor = resolve_actor(ctx)?;
    let status = match args.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => None,
    };

    let leads = match actor.role {
        Role::Admin => ctx.store.leads().list_for_admin(now_utc(), status)?,
        Role::User => ctx.store.leads().list_for_agent(&actor.user_name, status)?,
    };

    let items: Vec<LeadListItemDto> = leads
        .into_iter()
        .map(|lead| LeadListItemDto {
            id: lead.id,
            name: lead.name,
            mobile: lead.mobile,
            status: lead.status.map(|status| status.as_str().to_string()),
            next_action_at: lead.next_action_at,
            assigned_to: lead.assigned_to.map(|name| name.to_string()),
            escalated: lead.escalated,
        })
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("no leads");
        return Ok(());
    }

    for item in items {
        let name = item.name.as_deref().unwrap_or("-");
        let status = item.status.as_deref().unwrap_or("-");
        let date = item
            .next_action_at
            .map(format_timestamp_datetime)
            .unwrap_or_else(|| "-".to_string());
        let owner = item.assigned_to.as_deref().unwrap_or("-");
        let flag = if item.escalated { " (escalated)" } else { "" };
        println!(
            "{}  {}  {}  [{}]  {}  {}{}",
            item.id, name, item.mobile, status, date, owner, flag
        );
    }

    Ok(())
}

pub fn delete_lead(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let actor = resolve_actor(ctx)?;
    if !actor.is_admin() {
        return Err(invalid_input("delete requires an admin actor"));
    }
    let id = parse_lead_id(&args.id)?;
    ctx.store.leads().delete(id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

fn normalize_optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Blank owner input clears the assignment; anything else must be a valid
/// agent name.
fn parse_owner(raw: Option<String>) -> Result<Option<Option<AgentName>>> {
    match raw {
        Some(value) => {
            if value.trim().is_empty() {
                Ok(Some(None))
            } else {
                Ok(Some(Some(AgentName::new(&value)?)))
            }
        }
        None => Ok(None),
    }
}

fn patch_is_empty(patch: &LeadPatch) -> bool {
    patch.name.is_none()
        && patch.source.is_none()
        && patch.status.is_none()
        && patch.job_role.is_none()
        && patch.budget.is_none()
        && patch.project.is_none()
        && patch.remarks.is_none()
        && patch.next_action_at.is_none()
        && patch.assigned_to.is_none()
}
