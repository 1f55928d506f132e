use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed pipeline vocabulary. Wire strings are the historical labels the
/// sales team uses, so parsing and storage round-trip through `as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "Visit Scheduled")]
    VisitScheduled,
    /// Not reachable / switched off.
    #[serde(rename = "NR/SF")]
    NotReachable,
    /// Ringing, no response.
    #[serde(rename = "RNR")]
    RingNoReply,
    #[serde(rename = "Details_shared")]
    DetailsShared,
    #[serde(rename = "Site Visited")]
    SiteVisited,
    #[serde(rename = "Booked")]
    Booked,
    #[serde(rename = "Invalid")]
    Invalid,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Location Issue")]
    LocationIssue,
    /// Channel partner.
    #[serde(rename = "CP")]
    ChannelPartner,
    #[serde(rename = "Budget Issue")]
    BudgetIssue,
    #[serde(rename = "Visit Postponed")]
    VisitPostponed,
    #[serde(rename = "Busy")]
    Busy,
    #[serde(rename = "Closed")]
    Closed,
}

pub const ALL_STATUSES: [LeadStatus; 14] = [
    LeadStatus::VisitScheduled,
    LeadStatus::NotReachable,
    LeadStatus::RingNoReply,
    LeadStatus::DetailsShared,
    LeadStatus::SiteVisited,
    LeadStatus::Booked,
    LeadStatus::Invalid,
    LeadStatus::NotInterested,
    LeadStatus::LocationIssue,
    LeadStatus::ChannelPartner,
    LeadStatus::BudgetIssue,
    LeadStatus::VisitPostponed,
    LeadStatus::Busy,
    LeadStatus::Closed,
];

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::VisitScheduled => "Visit Scheduled",
            LeadStatus::NotReachable => "NR/SF",
            LeadStatus::RingNoReply => "RNR",
            LeadStatus::DetailsShared => "Details_shared",
            LeadStatus::SiteVisited => "Site Visited",
            LeadStatus::Booked => "Booked",
            LeadStatus::Invalid => "Invalid",
            LeadStatus::NotInterested => "Not Interested",
            LeadStatus::LocationIssue => "Location Issue",
            LeadStatus::ChannelPartner => "CP",
            LeadStatus::BudgetIssue => "Budget Issue",
            LeadStatus::VisitPostponed => "Visit Postponed",
            LeadStatus::Busy => "Busy",
            LeadStatus::Closed => "Closed",
        }
    }

    /// Whether the status participates in follow-up tracking. Every current
    /// variant does; the exhaustive match keeps a future untracked status a
    /// compiler-checked one-line change.
    pub fn is_tracked(self) -> bool {
        match self {
            LeadStatus::VisitScheduled
            | LeadStatus::NotReachable
            | LeadStatus::RingNoReply
            | LeadStatus::DetailsShared
            | LeadStatus::SiteVisited
            | LeadStatus::Booked
            | LeadStatus::Invalid
            | LeadStatus::NotInterested
            | LeadStatus::LocationIssue
            | LeadStatus::ChannelPartner
            | LeadStatus::BudgetIssue
            | LeadStatus::VisitPostponed
            | LeadStatus::Busy
            | LeadStatus::Closed => true,
        }
    }

    /// Statuses that get a next-day 09:00 follow-up date when none is given.
    pub fn defaults_next_day(self) -> bool {
        matches!(
            self,
            LeadStatus::NotReachable
                | LeadStatus::RingNoReply
                | LeadStatus::DetailsShared
                | LeadStatus::SiteVisited
                | LeadStatus::Busy
        )
    }

    /// A visit cannot be scheduled without an explicit date.
    pub fn requires_visit_date(self) -> bool {
        matches!(self, LeadStatus::VisitScheduled)
    }

    /// Statuses whose auto-set follow-up date cannot be edited on its own.
    /// `Busy` only locks while the lead is escalated.
    pub fn locks_schedule(self, escalated: bool) -> bool {
        match self {
            LeadStatus::NotReachable | LeadStatus::RingNoReply => true,
            LeadStatus::Busy => escalated,
            _ => false,
        }
    }

    /// Outcomes that count toward the repeated-non-contact streak.
    pub fn counts_toward_streak(self) -> bool {
        matches!(
            self,
            LeadStatus::Busy | LeadStatus::NotReachable | LeadStatus::RingNoReply
        )
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a raw status entry. Whitespace-only input collapses to `None`;
/// matching is case-insensitive against the canonical labels.
pub fn parse_status(raw: &str) -> Result<Option<LeadStatus>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    ALL_STATUSES
        .iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
        .copied()
        .map(Some)
        .ok_or_else(|| CoreError::UnknownStatus(trimmed.to_string()))
}
