use crate::error::invalid_input;
use anyhow::Result;
use chrono::FixedOffset;
use leadline_core::domain::LeadId;
use leadline_core::time;
use std::str::FromStr;

pub fn now_utc() -> i64 {
    time::now_utc()
}

pub fn local_offset() -> FixedOffset {
    time::local_offset()
}

pub fn parse_local_timestamp(input: &str) -> Result<i64> {
    Ok(time::parse_local_timestamp(input)?)
}

pub fn format_timestamp_date(ts: i64) -> String {
    time::format_timestamp_date(ts)
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    time::format_timestamp_datetime(ts)
}

pub fn parse_lead_id(raw: &str) -> Result<LeadId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("lead id cannot be empty"));
    }
    LeadId::from_str(trimmed).map_err(|_| invalid_input("invalid lead id"))
}
