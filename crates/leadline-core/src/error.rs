use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid mobile number {0:?}: expected 10 digits starting 6-9")]
    InvalidMobile(String),
    #[error("unknown lead status: {0}")]
    UnknownStatus(String),
    #[error("a scheduled visit requires an explicit date")]
    VisitDateRequired,
    #[error("next action date is locked while status is {0}")]
    ScheduleLocked(String),
    #[error("agent name cannot be empty")]
    EmptyAgentName,
    #[error("unknown agent role: {0}")]
    UnknownRole(String),
    #[error("invalid timestamp")]
    InvalidTimestamp,
}
