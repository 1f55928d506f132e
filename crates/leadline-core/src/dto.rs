use crate::domain::LeadId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadListItemDto {
    pub id: LeadId,
    pub name: Option<String>,
    pub mobile: String,
    pub status: Option<String>,
    pub next_action_at: Option<i64>,
    pub assigned_to: Option<String>,
    pub escalated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpEventDto {
    pub date: i64,
    pub status: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetailDto {
    pub id: LeadId,
    pub name: Option<String>,
    pub mobile: String,
    pub status: Option<String>,
    pub source: Option<String>,
    pub job_role: Option<String>,
    pub budget: Option<String>,
    pub project: Option<String>,
    pub remarks: Option<String>,
    pub next_action_at: Option<i64>,
    pub assigned_to: Option<String>,
    pub escalated: bool,
    pub escalated_from: Option<String>,
    pub escalated_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub recent_events: Vec<FollowUpEventDto>,
}

/// Raw intake row as it arrives from a bulk file; everything in it is
/// validated during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowDto {
    #[serde(default)]
    pub name: Option<String>,
    pub mobile: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub next_action_at: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowErrorDto {
    pub row: usize,
    pub mobile: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReportDto {
    pub received: usize,
    pub valid: usize,
    pub inserted: usize,
    pub skipped_existing: usize,
    pub invalid: Vec<ImportRowErrorDto>,
}
