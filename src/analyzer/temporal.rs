use chrono::{Datelike, NaiveDateTime};

use crate::config::DashboardConfig;

/// Sortable period key: `YYYY-MM`. Lexicographic order is chronological order.
pub fn year_month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Display label: `<abbr>/<YYYY>` from the configured month table, e.g. "Abr/2024".
pub fn year_month_label(year: i32, month: u32, config: &DashboardConfig) -> String {
    format!("{}/{:04}", config.month_abbr(month), year)
}

/// Calendar attributes of an opening timestamp: (year, month, key, label).
pub fn calendar_parts(
    opened_at: &NaiveDateTime,
    config: &DashboardConfig,
) -> (i32, u32, String, String) {
    let year = opened_at.year();
    let month = opened_at.month();
    (
        year,
        month,
        year_month_key(year, month),
        year_month_label(year, month, config),
    )
}

/// True when the case was resolved on the calendar day it was opened.
pub fn is_same_day(opened_at: &NaiveDateTime, resolved_at: Option<&NaiveDateTime>) -> bool {
    resolved_at.is_some_and(|r| r.date() == opened_at.date())
}
