//! The fixed reporting window and timestamp formatting.

use chrono::{DateTime, Local, TimeZone};

use crate::base::types::Res;

/// Format used for message times in reports.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An inclusive range of epoch seconds to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditWindow {
    pub oldest: i64,
    pub latest: i64,
    /// Human name for the window, shown in the report header.
    pub label: String,
}

impl AuditWindow {
    /// 2025-07-05 00:00:00 through 2025-07-28 23:59:59, local time.
    pub fn fixed() -> Res<Self> {
        Ok(Self {
            oldest: local_epoch(2025, 7, 5, 0, 0, 0)?,
            latest: local_epoch(2025, 7, 28, 23, 59, 59)?,
            label: "July 2025".to_string(),
        })
    }
}

fn local_epoch(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Res<i64> {
    Local
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .earliest()
        .map(|time| time.timestamp())
        .ok_or_else(|| anyhow::anyhow!("{year}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02} does not exist in the local timezone"))
}

/// Formats a Slack message timestamp (`"1751700000.123456"`) as local time.
pub fn format_message_ts(ts: &str) -> Res<String> {
    let seconds: f64 = ts.parse().map_err(|e| anyhow::anyhow!("Invalid message timestamp `{}`: {}", ts, e))?;

    let time = DateTime::from_timestamp(seconds.trunc() as i64, 0).ok_or_else(|| anyhow::anyhow!("Message timestamp `{}` is out of range", ts))?;

    Ok(time.with_timezone(&Local).format(TIME_FORMAT).to_string())
}
