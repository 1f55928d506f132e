use crate::domain::agent::AgentName;
use crate::domain::status::LeadStatus;

/// Third consecutive occurrence of the same non-contact outcome transfers
/// the lead.
pub const ESCALATION_STREAK: usize = 3;
/// How far back in the ledger the streak looks.
pub const STREAK_WINDOW: usize = 3;

/// `recent` holds the ledger statuses newest-first. The incoming outcome
/// itself counts as one occurrence.
pub fn completes_streak(status: LeadStatus, recent: &[LeadStatus]) -> bool {
    if !status.counts_toward_streak() {
        return false;
    }
    let prior = recent
        .iter()
        .take(STREAK_WINDOW)
        .filter(|s| **s == status)
        .count();
    prior + 1 >= ESCALATION_STREAK
}

/// Least-loaded pick over `(agent, open lead count)` pairs. Candidates
/// arrive in pool order; ties keep the earliest.
pub fn pick_transfer_target(candidates: &[(AgentName, i64)]) -> Option<&AgentName> {
    candidates
        .iter()
        .min_by_key(|(_, load)| *load)
        .map(|(name, _)| name)
}
