use crate::domain::status::LeadStatus;

/// The mirror row exists iff the lead carries a tracked status and
/// non-empty remarks.
pub fn wants_follow_up(status: Option<LeadStatus>, remarks: Option<&str>) -> bool {
    let tracked = status.is_some_and(|s| s.is_tracked());
    let has_remarks = remarks.is_some_and(|r| !r.trim().is_empty());
    tracked && has_remarks
}
