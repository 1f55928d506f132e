use crate::domain::status::LeadStatus;
use crate::error::CoreError;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// Defaulted follow-ups land at 09:00 local on the next day.
pub const FOLLOW_UP_HOUR: u32 = 9;

pub fn next_day_follow_up(now_utc: i64, local_offset: FixedOffset) -> Result<i64, CoreError> {
    let now = DateTime::<Utc>::from_timestamp(now_utc, 0).ok_or(CoreError::InvalidTimestamp)?;
    let tomorrow = now.with_timezone(&local_offset).date_naive() + Duration::days(1);
    let naive = tomorrow
        .and_hms_opt(FOLLOW_UP_HOUR, 0, 0)
        .ok_or(CoreError::InvalidTimestamp)?;
    let local = local_offset
        .from_local_datetime(&naive)
        .single()
        .ok_or(CoreError::InvalidTimestamp)?;
    Ok(local.with_timezone(&Utc).timestamp())
}

/// Applies the status-driven date rules to the effective next action date
/// (the patch value when one was given, else the stored one). Returns the
/// resolved date and whether it was defaulted.
pub fn resolve_next_action(
    status: Option<LeadStatus>,
    effective: Option<i64>,
    now_utc: i64,
    local_offset: FixedOffset,
) -> Result<(Option<i64>, bool), CoreError> {
    match (status, effective) {
        (Some(status), None) if status.requires_visit_date() => Err(CoreError::VisitDateRequired),
        (Some(status), None) if status.defaults_next_day() => {
            Ok((Some(next_day_follow_up(now_utc, local_offset)?), true))
        }
        (_, effective) => Ok((effective, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_day_follow_up, resolve_next_action};
    use crate::domain::LeadStatus;
    use crate::error::CoreError;
    use chrono::{FixedOffset, TimeZone, Utc};

    const IST: i32 = 5 * 3600 + 1800;

    #[test]
    fn next_day_follow_up_is_tomorrow_at_nine_local() {
        let offset = FixedOffset::east_opt(IST).unwrap();
        // 2024-06-10 23:30 IST
        let now = offset
            .with_ymd_and_hms(2024, 6, 10, 23, 30, 0)
            .unwrap()
            .with_timezone(&Utc)
            .timestamp();
        let expected = offset
            .with_ymd_and_hms(2024, 6, 11, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
            .timestamp();
        assert_eq!(next_day_follow_up(now, offset).unwrap(), expected);
    }

    #[test]
    fn next_day_follow_up_ignores_time_of_day() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let morning = Utc
            .with_ymd_and_hms(2024, 6, 10, 0, 5, 0)
            .unwrap()
            .timestamp();
        let evening = Utc
            .with_ymd_and_hms(2024, 6, 10, 22, 55, 0)
            .unwrap()
            .timestamp();
        assert_eq!(
            next_day_follow_up(morning, offset).unwrap(),
            next_day_follow_up(evening, offset).unwrap()
        );
    }

    #[test]
    fn visit_without_date_is_rejected() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let err = resolve_next_action(Some(LeadStatus::VisitScheduled), None, 1_700_000_000, offset)
            .unwrap_err();
        assert_eq!(err, CoreError::VisitDateRequired);
    }

    #[test]
    fn visit_with_date_is_kept_as_given() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let (resolved, auto) = resolve_next_action(
            Some(LeadStatus::VisitScheduled),
            Some(1_700_100_000),
            1_700_000_000,
            offset,
        )
        .unwrap();
        assert_eq!(resolved, Some(1_700_100_000));
        assert!(!auto);
    }

    #[test]
    fn busy_without_date_defaults_to_next_day() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = Utc
            .with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
            .unwrap()
            .timestamp();
        let (resolved, auto) =
            resolve_next_action(Some(LeadStatus::Busy), None, now, offset).unwrap();
        assert_eq!(resolved, Some(next_day_follow_up(now, offset).unwrap()));
        assert!(auto);
    }

    #[test]
    fn non_defaulting_status_leaves_date_absent() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let (resolved, auto) =
            resolve_next_action(Some(LeadStatus::Booked), None, 1_700_000_000, offset).unwrap();
        assert_eq!(resolved, None);
        assert!(!auto);
        let (resolved, _) = resolve_next_action(None, None, 1_700_000_000, offset).unwrap();
        assert_eq!(resolved, None);
    }
}
