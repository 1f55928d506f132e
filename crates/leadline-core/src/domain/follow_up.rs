use crate::domain::ids::{FollowUpEventId, LeadId};
use crate::domain::status::LeadStatus;
use serde::{Deserialize, Serialize};

/// Current-state mirror of a tracked lead, one row per lead. `created_at`
/// survives upserts; `updated_at` moves with every sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub lead_id: LeadId,
    pub date: i64,
    pub status: LeadStatus,
    pub remarks: String,
    pub name: Option<String>,
    pub mobile: String,
    pub source: Option<String>,
    pub job_role: Option<String>,
    pub budget: Option<String>,
    pub project: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Append-only history entry, one per status-setting action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpEvent {
    pub id: FollowUpEventId,
    pub lead_id: LeadId,
    pub date: i64,
    pub status: LeadStatus,
    pub remarks: Option<String>,
    pub created_at: i64,
}
