use std::collections::BTreeMap;

use serde::Serialize;

use super::stats::pct;
use crate::parser::types::CaseRecord;

/// Same-day resolution index of one responsible party in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRate {
    pub responsible: String,
    pub total_cases: usize,
    pub same_day: usize,
    /// `same_day / total_cases * 100`, 0 when there are no cases.
    pub rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub period_key: String,
    pub period_label: String,
    pub rows: Vec<ResolutionRate>,
}

/// Resolution index per grouped responsible party for the cases opened in
/// `period_key`. Open cases count in `total_cases` but never in `same_day`.
/// Rows are sorted by party name.
pub fn resolution_rate(records: &[CaseRecord], period_key: &str) -> Vec<ResolutionRate> {
    let mut by_party: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for r in records.iter().filter(|r| r.year_month_key == period_key) {
        let entry = by_party.entry(r.responsible_grouped.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if r.same_day_resolution {
            entry.1 += 1;
        }
    }
    by_party
        .into_iter()
        .map(|(responsible, (total_cases, same_day))| ResolutionRate {
            responsible: responsible.to_string(),
            total_cases,
            same_day,
            rate_pct: pct(same_day, total_cases),
        })
        .collect()
}
