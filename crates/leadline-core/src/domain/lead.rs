use crate::domain::agent::AgentName;
use crate::domain::ids::LeadId;
use crate::domain::mobile::mobile_is_canonical;
use crate::domain::status::LeadStatus;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: Option<String>,
    pub mobile: String,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub job_role: Option<String>,
    pub budget: Option<String>,
    pub project: Option<String>,
    pub remarks: Option<String>,
    pub next_action_at: Option<i64>,
    /// True while the stored next action date was defaulted by the engine
    /// rather than supplied by a user.
    pub next_action_auto: bool,
    pub assigned_to: Option<AgentName>,
    pub assigned_at: Option<i64>,
    pub escalated: bool,
    pub escalated_from: Option<AgentName>,
    pub escalated_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: Option<AgentName>,
    pub updated_by: Option<AgentName>,
}

impl Lead {
    /// Whole-record invariants, checked after every merge and before every
    /// persist.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !mobile_is_canonical(&self.mobile) {
            return Err(CoreError::InvalidMobile(self.mobile.clone()));
        }
        if self.status.is_some_and(|s| s.requires_visit_date()) && self.next_action_at.is_none() {
            return Err(CoreError::VisitDateRequired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Lead;
    use crate::domain::{LeadId, LeadStatus};

    fn lead() -> Lead {
        Lead {
            id: LeadId::new(),
            name: None,
            mobile: "9876543210".to_string(),
            status: None,
            source: None,
            job_role: None,
            budget: None,
            project: None,
            remarks: None,
            next_action_at: None,
            next_action_auto: false,
            assigned_to: None,
            assigned_at: None,
            escalated: false,
            escalated_from: None,
            escalated_at: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            created_by: None,
            updated_by: None,
        }
    }

    #[test]
    fn validate_accepts_canonical_lead() {
        assert!(lead().validate().is_ok());
    }

    #[test]
    fn validate_rejects_raw_mobile() {
        let mut lead = lead();
        lead.mobile = "+919876543210".to_string();
        assert!(lead.validate().is_err());
    }

    #[test]
    fn validate_rejects_dateless_visit() {
        let mut lead = lead();
        lead.status = Some(LeadStatus::VisitScheduled);
        assert!(lead.validate().is_err());
        lead.next_action_at = Some(1_700_100_000);
        assert!(lead.validate().is_ok());
    }
}
