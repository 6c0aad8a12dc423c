//! Ledger date/time text helpers.
//!
//! Stage stamps are stored as `dd/mm/yyyy` and `HH:MM:SS`. Older rows may carry
//! unpadded day or month values (`1/2/2024`), so parsing accepts one or two
//! digits while formatting always pads.

use chrono::{NaiveDate, NaiveTime};

/// Parse a `d/m/yyyy` ledger date. Returns `None` for anything else.
pub fn parse_ledger_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date as `dd/mm/yyyy`.
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a time as `HH:MM:SS`.
pub fn format_ledger_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}
