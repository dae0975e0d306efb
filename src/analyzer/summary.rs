use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::stats::{pct, round1};
use crate::parser::types::CaseRecord;

/// Headline figures shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_cases: usize,
    pub total_reopens: u64,
    pub same_day_count: usize,
    /// Share of all cases resolved on their opening day, one decimal.
    pub same_day_pct: f64,
    pub open_cases: usize,
    /// Most recent opening date ("data updated until").
    pub latest_opened_at: Option<NaiveDateTime>,
    pub period_count: usize,
    /// Rows dropped by the normalizer, carried through so the empty state can explain itself.
    pub excluded_rows: usize,
}

pub fn summarize(records: &[CaseRecord], excluded_rows: usize) -> Summary {
    let total_cases = records.len();
    let same_day_count = records.iter().filter(|r| r.same_day_resolution).count();
    let periods: BTreeSet<&str> = records.iter().map(|r| r.year_month_key.as_str()).collect();

    Summary {
        total_cases,
        total_reopens: records.iter().map(|r| u64::from(r.reopen_count)).sum(),
        same_day_count,
        same_day_pct: round1(pct(same_day_count, total_cases)),
        open_cases: records.iter().filter(|r| r.resolved_at.is_none()).count(),
        latest_opened_at: records.iter().map(|r| r.opened_at).max(),
        period_count: periods.len(),
        excluded_rows,
    }
}
