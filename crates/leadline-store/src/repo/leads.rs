use crate::error::{Result, StoreError};
use crate::repo::{agents, follow_ups, rotation};
use chrono::FixedOffset;
use leadline_core::domain::{
    normalize_mobile, parse_status, Agent, AgentName, Lead, LeadId, LeadStatus, Role,
};
use leadline_core::dto::{ImportReportDto, ImportRowDto, ImportRowErrorDto};
use leadline_core::rules::{
    completes_streak, pick_transfer_target, resolve_next_action, STREAK_WINDOW,
};
use leadline_core::time::parse_local_timestamp;
use leadline_core::CoreError;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct LeadNew {
    pub name: Option<String>,
    /// Raw entry; normalized to the canonical 10-digit form here.
    pub mobile: String,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub job_role: Option<String>,
    pub budget: Option<String>,
    pub project: Option<String>,
    pub remarks: Option<String>,
    pub next_action_at: Option<i64>,
    pub assigned_to: Option<AgentName>,
}

/// Partial update: an outer `Some` means the field was present in the
/// request, the inner `Option` carries the new value (None clears).
#[derive(Debug, Clone, Default)]
pub struct LeadPatch {
    pub name: Option<Option<String>>,
    pub source: Option<Option<String>>,
    pub status: Option<Option<LeadStatus>>,
    pub job_role: Option<Option<String>>,
    pub budget: Option<Option<String>>,
    pub project: Option<Option<String>>,
    pub remarks: Option<Option<String>>,
    pub next_action_at: Option<Option<i64>>,
    pub assigned_to: Option<Option<AgentName>>,
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub lead: Lead,
    pub transferred_to: Option<AgentName>,
    pub returned_to: Option<AgentName>,
}

pub struct LeadsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> LeadsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(
        &self,
        now_utc: i64,
        local_offset: FixedOffset,
        actor: &Agent,
        input: LeadNew,
    ) -> Result<Lead> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let lead = create_inner(&tx, now_utc, local_offset, actor, input)?;
            tx.commit()?;
            Ok(lead)
        } else {
            create_inner(self.conn, now_utc, local_offset, actor, input)
        }
    }

    pub fn update(
        &self,
        now_utc: i64,
        local_offset: FixedOffset,
        actor: &Agent,
        id: LeadId,
        patch: LeadPatch,
    ) -> Result<UpdateOutcome> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let outcome = update_inner(&tx, now_utc, local_offset, actor, id, patch)?;
            tx.commit()?;
            Ok(outcome)
        } else {
            update_inner(self.conn, now_utc, local_offset, actor, id, patch)
        }
    }

    pub fn import_batch(
        &self,
        now_utc: i64,
        local_offset: FixedOffset,
        actor: &Agent,
        rows: &[ImportRowDto],
    ) -> Result<ImportReportDto> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let report = import_batch_inner(&tx, now_utc, local_offset, actor, rows)?;
            tx.commit()?;
            Ok(report)
        } else {
            import_batch_inner(self.conn, now_utc, local_offset, actor, rows)
        }
    }

    pub fn get(&self, id: LeadId) -> Result<Option<Lead>> {
        get_inner(self.conn, id)
    }

    pub fn find_by_mobile(&self, mobile: &str) -> Result<Option<Lead>> {
        let canonical = normalize_mobile(mobile).map_err(StoreError::Core)?;
        find_by_mobile_inner(self.conn, &canonical)
    }

    pub fn delete(&self, id: LeadId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM leads WHERE lead_id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Administrator view: heal ownerless leads through the rotation, then
    /// return everything.
    pub fn list_for_admin(
        &self,
        now_utc: i64,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            backfill_unassigned_inner(&tx, now_utc)?;
            let leads = list_inner(&tx, None, status)?;
            tx.commit()?;
            Ok(leads)
        } else {
            backfill_unassigned_inner(self.conn, now_utc)?;
            list_inner(self.conn, None, status)
        }
    }

    pub fn list_for_agent(
        &self,
        owner: &AgentName,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>> {
        list_inner(self.conn, Some(owner), status)
    }
}

fn create_inner(
    conn: &Connection,
    now_utc: i64,
    local_offset: FixedOffset,
    actor: &Agent,
    input: LeadNew,
) -> Result<Lead> {
    let mobile = normalize_mobile(&input.mobile).map_err(StoreError::Core)?;
    if let Some(existing) = find_by_mobile_inner(conn, &mobile)? {
        return Err(StoreError::DuplicateMobile {
            mobile,
            lead_id: existing.id.to_string(),
        });
    }

    let (next_action_at, next_action_auto) =
        resolve_next_action(input.status, input.next_action_at, now_utc, local_offset)
            .map_err(StoreError::Core)?;

    let assigned_to = match input.assigned_to {
        Some(owner) => Some(owner),
        None => match actor.role {
            Role::User => Some(actor.user_name.clone()),
            Role::Admin => {
                let pool = agents::assignment_pool_inner(conn)?;
                if pool.is_empty() {
                    None
                } else {
                    let start = rotation::take_slots_inner(conn, 1)?;
                    Some(pool[slot_index(start, 0, pool.len())].clone())
                }
            }
        },
    };

    let assigned_at = assigned_to.as_ref().map(|_| now_utc);
    let lead = Lead {
        id: LeadId::new(),
        name: normalize_text(input.name),
        mobile,
        status: input.status,
        source: normalize_text(input.source),
        job_role: normalize_text(input.job_role),
        budget: normalize_text(input.budget),
        project: normalize_text(input.project),
        remarks: normalize_text(input.remarks),
        next_action_at,
        next_action_auto,
        assigned_to,
        assigned_at,
        escalated: false,
        escalated_from: None,
        escalated_at: None,
        created_at: now_utc,
        updated_at: now_utc,
        created_by: Some(actor.user_name.clone()),
        updated_by: Some(actor.user_name.clone()),
    };
    lead.validate().map_err(StoreError::Core)?;

    insert_lead_inner(conn, &lead)?;

    if let Some(status) = lead.status {
        follow_ups::append_event_inner(
            conn,
            now_utc,
            lead.id,
            lead.next_action_at.unwrap_or(now_utc),
            status,
            lead.remarks.as_deref(),
        )?;
    }
    follow_ups::sync_with_lead_inner(conn, now_utc, &lead)?;

    Ok(lead)
}

fn update_inner(
    conn: &Connection,
    now_utc: i64,
    local_offset: FixedOffset,
    actor: &Agent,
    id: LeadId,
    patch: LeadPatch,
) -> Result<UpdateOutcome> {
    let mut lead = get_inner(conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    // A date-only edit cannot move an auto-set date while the status locks
    // the schedule.
    if patch.next_action_at.is_some() && patch.status.is_none() && lead.next_action_auto {
        if let Some(current) = lead.status {
            if current.locks_schedule(lead.escalated) {
                return Err(StoreError::Core(CoreError::ScheduleLocked(
                    current.as_str().to_string(),
                )));
            }
        }
    }

    let status_set: Option<LeadStatus> = patch.status.flatten();

    let mut next_action_auto = lead.next_action_auto;
    let mut next_action_at = match patch.next_action_at {
        Some(value) => {
            next_action_auto = false;
            value
        }
        None => lead.next_action_at,
    };
    if let Some(status) = status_set {
        let (resolved, defaulted) =
            resolve_next_action(Some(status), next_action_at, now_utc, local_offset)
                .map_err(StoreError::Core)?;
        next_action_at = resolved;
        if defaulted {
            next_action_auto = true;
        }
    }

    let mut transferred_to = None;
    let mut returned_to = None;
    if lead.escalated {
        if let Some(status) = status_set {
            if status != LeadStatus::Busy {
                let owner = lead.escalated_from.take();
                lead.assigned_to = owner.clone();
                if owner.is_some() {
                    lead.assigned_at = Some(now_utc);
                }
                lead.escalated = false;
                lead.escalated_at = None;
                returned_to = owner;
            }
        }
    } else if let Some(status) = status_set {
        if status.counts_toward_streak() {
            let recent = follow_ups::recent_statuses_inner(conn, lead.id, STREAK_WINDOW)?;
            if completes_streak(status, &recent) {
                let candidates =
                    agents::open_lead_counts_inner(conn, lead.assigned_to.as_ref())?;
                if let Some(target) = pick_transfer_target(&candidates).cloned() {
                    lead.escalated = true;
                    lead.escalated_from = lead.assigned_to.take();
                    lead.escalated_at = Some(now_utc);
                    lead.assigned_to = Some(target.clone());
                    lead.assigned_at = Some(now_utc);
                    transferred_to = Some(target);
                }
            }
        }
    }

    if let Some(value) = patch.name {
        lead.name = normalize_text(value);
    }
    if let Some(value) = patch.source {
        lead.source = normalize_text(value);
    }
    if let Some(value) = patch.job_role {
        lead.job_role = normalize_text(value);
    }
    if let Some(value) = patch.budget {
        lead.budget = normalize_text(value);
    }
    if let Some(value) = patch.project {
        lead.project = normalize_text(value);
    }
    if let Some(value) = patch.remarks {
        lead.remarks = normalize_text(value);
    }
    if patch.status.is_some() {
        lead.status = status_set;
    }
    lead.next_action_at = next_action_at;
    lead.next_action_auto = next_action_auto && next_action_at.is_some();
    if let Some(owner) = patch.assigned_to {
        lead.assigned_to = owner;
        if lead.assigned_to.is_some() {
            lead.assigned_at = Some(now_utc);
        }
    }
    lead.updated_at = now_utc;
    lead.updated_by = Some(actor.user_name.clone());
    lead.validate().map_err(StoreError::Core)?;

    persist_lead_inner(conn, &lead)?;

    if let Some(status) = status_set {
        follow_ups::append_event_inner(
            conn,
            now_utc,
            lead.id,
            lead.next_action_at.unwrap_or(now_utc),
            status,
            lead.remarks.as_deref(),
        )?;
    }
    follow_ups::sync_with_lead_inner(conn, now_utc, &lead)?;

    Ok(UpdateOutcome {
        lead,
        transferred_to,
        returned_to,
    })
}

struct PendingRow {
    name: Option<String>,
    mobile: String,
    status: Option<LeadStatus>,
    source: Option<String>,
    job_role: Option<String>,
    budget: Option<String>,
    project: Option<String>,
    remarks: Option<String>,
    next_action_at: Option<i64>,
    next_action_auto: bool,
    assigned_to: Option<AgentName>,
}

fn import_batch_inner(
    conn: &Connection,
    now_utc: i64,
    local_offset: FixedOffset,
    actor: &Agent,
    rows: &[ImportRowDto],
) -> Result<ImportReportDto> {
    let received = rows.len();
    let mut invalid = Vec::new();
    let mut pending = Vec::new();
    let mut seen = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match prepare_row(row, now_utc, local_offset) {
            Ok(prepared) => {
                if seen.insert(prepared.mobile.clone()) {
                    pending.push(prepared);
                } else {
                    invalid.push(ImportRowErrorDto {
                        row: row_number,
                        mobile: row.mobile.clone(),
                        reason: "duplicate mobile within batch".to_string(),
                    });
                }
            }
            Err(reason) => invalid.push(ImportRowErrorDto {
                row: row_number,
                mobile: row.mobile.clone(),
                reason,
            }),
        }
    }

    let valid = pending.len();
    let mut skipped_existing = 0;
    let mut fresh = Vec::new();
    for row in pending {
        if find_by_mobile_inner(conn, &row.mobile)?.is_some() {
            skipped_existing += 1;
        } else {
            fresh.push(row);
        }
    }

    match actor.role {
        Role::User => {
            for row in &mut fresh {
                if row.assigned_to.is_none() {
                    row.assigned_to = Some(actor.user_name.clone());
                }
            }
        }
        Role::Admin => {
            // Ownership waits until after the existing-mobile filter so the
            // cursor advances once, by the number of rows actually assigned.
            let unowned = fresh.iter().filter(|row| row.assigned_to.is_none()).count();
            let pool = agents::assignment_pool_inner(conn)?;
            if unowned > 0 && !pool.is_empty() {
                let start = rotation::take_slots_inner(conn, unowned)?;
                let mut slot = 0;
                for row in &mut fresh {
                    if row.assigned_to.is_none() {
                        row.assigned_to = Some(pool[slot_index(start, slot, pool.len())].clone());
                        slot += 1;
                    }
                }
            }
        }
    }

    let mut inserted = 0;
    for row in fresh {
        let assigned_at = row.assigned_to.as_ref().map(|_| now_utc);
        let lead = Lead {
            id: LeadId::new(),
            name: row.name,
            mobile: row.mobile,
            status: row.status,
            source: row.source,
            job_role: row.job_role,
            budget: row.budget,
            project: row.project,
            remarks: row.remarks,
            next_action_at: row.next_action_at,
            next_action_auto: row.next_action_auto,
            assigned_to: row.assigned_to,
            assigned_at,
            escalated: false,
            escalated_from: None,
            escalated_at: None,
            created_at: now_utc,
            updated_at: now_utc,
            created_by: Some(actor.user_name.clone()),
            updated_by: Some(actor.user_name.clone()),
        };
        lead.validate().map_err(StoreError::Core)?;

        // INSERT OR IGNORE keeps one conflicting row from sinking the batch.
        let changed = insert_or_ignore_lead_inner(conn, &lead)?;
        if changed == 0 {
            skipped_existing += 1;
            continue;
        }
        inserted += 1;

        if let Some(status) = lead.status {
            follow_ups::append_event_inner(
                conn,
                now_utc,
                lead.id,
                lead.next_action_at.unwrap_or(now_utc),
                status,
                lead.remarks.as_deref(),
            )?;
        }
        follow_ups::sync_with_lead_inner(conn, now_utc, &lead)?;
    }

    Ok(ImportReportDto {
        received,
        valid,
        inserted,
        skipped_existing,
        invalid,
    })
}

fn prepare_row(
    row: &ImportRowDto,
    now_utc: i64,
    local_offset: FixedOffset,
) -> std::result::Result<PendingRow, String> {
    let mobile = normalize_mobile(&row.mobile).map_err(|err| err.to_string())?;
    let status = match row.status.as_deref() {
        Some(raw) => parse_status(raw).map_err(|err| err.to_string())?,
        None => None,
    };
    let provided_date = match row.next_action_at.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            Some(parse_local_timestamp(raw).map_err(|err| err.to_string())?)
        }
        _ => None,
    };
    let (next_action_at, next_action_auto) =
        resolve_next_action(status, provided_date, now_utc, local_offset)
            .map_err(|err| err.to_string())?;
    let assigned_to = match row.assigned_to.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            Some(AgentName::new(raw).map_err(|err| err.to_string())?)
        }
        _ => None,
    };

    Ok(PendingRow {
        name: normalize_text(row.name.clone()),
        mobile,
        status,
        source: normalize_text(row.source.clone()),
        job_role: normalize_text(row.job_role.clone()),
        budget: normalize_text(row.budget.clone()),
        project: normalize_text(row.project.clone()),
        remarks: normalize_text(row.remarks.clone()),
        next_action_at,
        next_action_auto,
        assigned_to,
    })
}

fn backfill_unassigned_inner(conn: &Connection, now_utc: i64) -> Result<usize> {
    let mut stmt = conn.prepare(
        "SELECT lead_id FROM leads
         WHERE assigned_to IS NULL OR TRIM(assigned_to) = ''
         ORDER BY created_at ASC, lead_id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        ids.push(raw);
    }
    if ids.is_empty() {
        return Ok(0);
    }

    let pool = agents::assignment_pool_inner(conn)?;
    if pool.is_empty() {
        return Ok(0);
    }

    let start = rotation::take_slots_inner(conn, ids.len())?;
    for (offset, id) in ids.iter().enumerate() {
        let owner = &pool[slot_index(start, offset, pool.len())];
        conn.execute(
            "UPDATE leads SET assigned_to = ?2, assigned_at = ?3, updated_at = ?3
             WHERE lead_id = ?1;",
            params![id, owner.as_str(), now_utc],
        )?;
    }
    Ok(ids.len())
}

fn list_inner(
    conn: &Connection,
    owner: Option<&AgentName>,
    status: Option<LeadStatus>,
) -> Result<Vec<Lead>> {
    let mut stmt = conn.prepare(
        "SELECT lead_id, name, mobile, status, source, job_role, budget, project, remarks, next_action_at, next_action_auto, assigned_to, assigned_at, escalated, escalated_from, escalated_at, created_at, updated_at, created_by, updated_by
         FROM leads
         WHERE (?1 IS NULL OR LOWER(TRIM(COALESCE(assigned_to, ''))) = ?1)
           AND (?2 IS NULL OR status = ?2)
         ORDER BY created_at DESC, lead_id ASC;",
    )?;
    let mut rows = stmt.query(params![
        owner.map(|name| name.as_str()),
        status.map(|status| status.as_str()),
    ])?;
    let mut leads = Vec::new();
    while let Some(row) = rows.next()? {
        leads.push(lead_from_row(row)?);
    }
    Ok(leads)
}

fn get_inner(conn: &Connection, id: LeadId) -> Result<Option<Lead>> {
    let mut stmt = conn.prepare(
        "SELECT lead_id, name, mobile, status, source, job_role, budget, project, remarks, next_action_at, next_action_auto, assigned_to, assigned_at, escalated, escalated_from, escalated_at, created_at, updated_at, created_by, updated_by
         FROM leads WHERE lead_id = ?1;",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        Ok(Some(lead_from_row(row)?))
    } else {
        Ok(None)
    }
}

fn find_by_mobile_inner(conn: &Connection, canonical_mobile: &str) -> Result<Option<Lead>> {
    let mut stmt = conn.prepare(
        "SELECT lead_id, name, mobile, status, source, job_role, budget, project, remarks, next_action_at, next_action_auto, assigned_to, assigned_at, escalated, escalated_from, escalated_at, created_at, updated_at, created_by, updated_by
         FROM leads WHERE mobile = ?1;",
    )?;
    let mut rows = stmt.query([canonical_mobile])?;
    if let Some(row) = rows.next()? {
        Ok(Some(lead_from_row(row)?))
    } else {
        Ok(None)
    }
}

fn insert_lead_inner(conn: &Connection, lead: &Lead) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO leads (lead_id, name, mobile, status, source, job_role, budget, project, remarks, next_action_at, next_action_auto, assigned_to, assigned_at, escalated, escalated_from, escalated_at, created_at, updated_at, created_by, updated_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20);",
        params![
            lead.id.to_string(),
            lead.name,
            lead.mobile,
            lead.status.map(|status| status.as_str()),
            lead.source,
            lead.job_role,
            lead.budget,
            lead.project,
            lead.remarks,
            lead.next_action_at,
            lead.next_action_auto,
            lead.assigned_to.as_ref().map(|name| name.as_str()),
            lead.assigned_at,
            lead.escalated,
            lead.escalated_from.as_ref().map(|name| name.as_str()),
            lead.escalated_at,
            lead.created_at,
            lead.updated_at,
            lead.created_by.as_ref().map(|name| name.as_str()),
            lead.updated_by.as_ref().map(|name| name.as_str()),
        ],
    );
    match result {
        Ok(_) => Ok(()),
        // The UNIQUE mobile column is the race backstop behind the friendly
        // pre-check.
        Err(err) if is_unique_violation(&err) => {
            match find_by_mobile_inner(conn, &lead.mobile)? {
                Some(existing) => Err(StoreError::DuplicateMobile {
                    mobile: lead.mobile.clone(),
                    lead_id: existing.id.to_string(),
                }),
                None => Err(err.into()),
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn insert_or_ignore_lead_inner(conn: &Connection, lead: &Lead) -> Result<usize> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO leads (lead_id, name, mobile, status, source, job_role, budget, project, remarks, next_action_at, next_action_auto, assigned_to, assigned_at, escalated, escalated_from, escalated_at, created_at, updated_at, created_by, updated_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20);",
        params![
            lead.id.to_string(),
            lead.name,
            lead.mobile,
            lead.status.map(|status| status.as_str()),
            lead.source,
            lead.job_role,
            lead.budget,
            lead.project,
            lead.remarks,
            lead.next_action_at,
            lead.next_action_auto,
            lead.assigned_to.as_ref().map(|name| name.as_str()),
            lead.assigned_at,
            lead.escalated,
            lead.escalated_from.as_ref().map(|name| name.as_str()),
            lead.escalated_at,
            lead.created_at,
            lead.updated_at,
            lead.created_by.as_ref().map(|name| name.as_str()),
            lead.updated_by.as_ref().map(|name| name.as_str()),
        ],
    )?;
    Ok(changed)
}

fn persist_lead_inner(conn: &Connection, lead: &Lead) -> Result<()> {
    conn.execute(
        "UPDATE leads SET name = ?2, mobile = ?3, status = ?4, source = ?5, job_role = ?6, budget = ?7, project = ?8, remarks = ?9, next_action_at = ?10, next_action_auto = ?11, assigned_to = ?12, assigned_at = ?13, escalated = ?14, escalated_from = ?15, escalated_at = ?16, created_at = ?17, updated_at = ?18, created_by = ?19, updated_by = ?20
         WHERE lead_id = ?1;",
        params![
            lead.id.to_string(),
            lead.name,
            lead.mobile,
            lead.status.map(|status| status.as_str()),
            lead.source,
            lead.job_role,
            lead.budget,
            lead.project,
            lead.remarks,
            lead.next_action_at,
            lead.next_action_auto,
            lead.assigned_to.as_ref().map(|name| name.as_str()),
            lead.assigned_at,
            lead.escalated,
            lead.escalated_from.as_ref().map(|name| name.as_str()),
            lead.escalated_at,
            lead.created_at,
            lead.updated_at,
            lead.created_by.as_ref().map(|name| name.as_str()),
            lead.updated_by.as_ref().map(|name| name.as_str()),
        ],
    )?;
    Ok(())
}

fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead> {
    let id_str: String = row.get(0)?;
    let id = LeadId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let status_raw: Option<String> = row.get(3)?;
    let status = match status_raw.as_deref() {
        Some(raw) => parse_status(raw)
            .ok()
            .flatten()
            .map(Some)
            .ok_or_else(|| StoreError::InvalidStoredStatus(raw.to_string()))?,
        None => None,
    };
    Ok(Lead {
        id,
        name: row.get(1)?,
        mobile: row.get(2)?,
        status,
        source: row.get(4)?,
        job_role: row.get(5)?,
        budget: row.get(6)?,
        project: row.get(7)?,
        remarks: row.get(8)?,
        next_action_at: row.get(9)?,
        next_action_auto: row.get(10)?,
        assigned_to: owner_from_db(row.get(11)?),
        assigned_at: row.get(12)?,
        escalated: row.get(13)?,
        escalated_from: owner_from_db(row.get(14)?),
        escalated_at: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
        created_by: owner_from_db(row.get(18)?),
        updated_by: owner_from_db(row.get(19)?),
    })
}

fn owner_from_db(raw: Option<String>) -> Option<AgentName> {
    raw.as_deref().and_then(|value| AgentName::new(value).ok())
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn slot_index(start: i64, offset: usize, pool_len: usize) -> usize {
    ((start + offset as i64).rem_euclid(pool_len as i64)) as usize
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
