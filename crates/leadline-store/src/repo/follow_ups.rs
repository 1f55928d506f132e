use crate::error::{Result, StoreError};
use leadline_core::domain::{
    parse_status, FollowUp, FollowUpEvent, FollowUpEventId, Lead, LeadId, LeadStatus,
};
use leadline_core::rules::wants_follow_up;
use rusqlite::{params, Connection};
use std::str::FromStr;

pub struct FollowUpsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> FollowUpsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn current_for_lead(&self, lead_id: LeadId) -> Result<Option<FollowUp>> {
        let mut stmt = self.conn.prepare(
            "SELECT lead_id, date, status, remarks, name, mobile, source, job_role, budget, project, created_at, updated_at
             FROM follow_ups WHERE lead_id = ?1;",
        )?;
        let mut rows = stmt.query([lead_id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(follow_up_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn events_for_lead(
        &self,
        lead_id: LeadId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowUpEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, date, status, remarks, created_at
             FROM follow_up_events
             WHERE lead_id = ?1
             ORDER BY date DESC, created_at DESC
             LIMIT ?2 OFFSET ?3;",
        )?;
        let mut rows = stmt.query(params![lead_id.to_string(), limit, offset])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(event_from_row(row)?);
        }
        Ok(events)
    }

    /// Most recent ledger statuses, newest first, for streak counting.
    pub fn recent_statuses(&self, lead_id: LeadId, limit: usize) -> Result<Vec<LeadStatus>> {
        recent_statuses_inner(self.conn, lead_id, limit)
    }

    /// Recomputes the mirror row for a lead: upsert while the lead is
    /// tracked with remarks, delete otherwise. Idempotent, so it doubles as
    /// a repair step.
    pub fn sync_with_lead(&self, now_utc: i64, lead: &Lead) -> Result<()> {
        sync_with_lead_inner(self.conn, now_utc, lead)
    }
}

pub(crate) fn recent_statuses_inner(
    conn: &Connection,
    lead_id: LeadId,
    limit: usize,
) -> Result<Vec<LeadStatus>> {
    let mut stmt = conn.prepare(
        "SELECT status FROM follow_up_events
         WHERE lead_id = ?1
         ORDER BY date DESC, created_at DESC
         LIMIT ?2;",
    )?;
    let mut rows = stmt.query(params![lead_id.to_string(), limit as i64])?;
    let mut statuses = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        statuses.push(status_from_raw(&raw)?);
    }
    Ok(statuses)
}

pub(crate) fn append_event_inner(
    conn: &Connection,
    now_utc: i64,
    lead_id: LeadId,
    date: i64,
    status: LeadStatus,
    remarks: Option<&str>,
) -> Result<FollowUpEvent> {
    let id = FollowUpEventId::new();
    conn.execute(
        "INSERT INTO follow_up_events (id, lead_id, date, status, remarks, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            id.to_string(),
            lead_id.to_string(),
            date,
            status.as_str(),
            remarks,
            now_utc,
        ],
    )?;
    Ok(FollowUpEvent {
        id,
        lead_id,
        date,
        status,
        remarks: remarks.map(|value| value.to_string()),
        created_at: now_utc,
    })
}

pub(crate) fn sync_with_lead_inner(conn: &Connection, now_utc: i64, lead: &Lead) -> Result<()> {
    if !wants_follow_up(lead.status, lead.remarks.as_deref()) {
        conn.execute(
            "DELETE FROM follow_ups WHERE lead_id = ?1;",
            [lead.id.to_string()],
        )?;
        return Ok(());
    }

    let Some(status) = lead.status else {
        return Ok(());
    };
    let Some(remarks) = lead.remarks.as_deref() else {
        return Ok(());
    };
    let date = lead.next_action_at.unwrap_or(now_utc);

    // created_at is absent from the conflict clause, so the first insert's
    // value survives every later sync.
    conn.execute(
        "INSERT INTO follow_ups (lead_id, date, status, remarks, name, mobile, source, job_role, budget, project, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
         ON CONFLICT (lead_id) DO UPDATE SET
             date = excluded.date,
             status = excluded.status,
             remarks = excluded.remarks,
             name = excluded.name,
             mobile = excluded.mobile,
             source = excluded.source,
             job_role = excluded.job_role,
             budget = excluded.budget,
             project = excluded.project,
             updated_at = excluded.updated_at;",
        params![
            lead.id.to_string(),
            date,
            status.as_str(),
            remarks,
            lead.name,
            lead.mobile,
            lead.source,
            lead.job_role,
            lead.budget,
            lead.project,
            now_utc,
        ],
    )?;
    Ok(())
}

fn status_from_raw(raw: &str) -> Result<LeadStatus> {
    parse_status(raw)
        .ok()
        .flatten()
        .ok_or_else(|| StoreError::InvalidStoredStatus(raw.to_string()))
}

fn follow_up_from_row(row: &rusqlite::Row<'_>) -> Result<FollowUp> {
    let id_str: String = row.get(0)?;
    let lead_id = LeadId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let status_raw: String = row.get(2)?;
    Ok(FollowUp {
        lead_id,
        date: row.get(1)?,
        status: status_from_raw(&status_raw)?,
        remarks: row.get(3)?,
        name: row.get(4)?,
        mobile: row.get(5)?,
        source: row.get(6)?,
        job_role: row.get(7)?,
        budget: row.get(8)?,
        project: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn event_from_row(row: &rusqlite::Row<'_>) -> Result<FollowUpEvent> {
    let id_str: String = row.get(0)?;
    let id =
        FollowUpEventId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let lead_id_str: String = row.get(1)?;
    let lead_id =
        LeadId::from_str(&lead_id_str).map_err(|_| StoreError::InvalidId(lead_id_str.clone()))?;
    let status_raw: String = row.get(3)?;
    Ok(FollowUpEvent {
        id,
        lead_id,
        date: row.get(2)?,
        status: status_from_raw(&status_raw)?,
        remarks: row.get(4)?,
        created_at: row.get(5)?,
    })
}
