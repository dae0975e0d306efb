use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::parser::types::CaseRecord;

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    pub period_key: String,
    pub period_label: String,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDimensionCount {
    pub period_key: String,
    pub period_label: String,
    pub value: String,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSum {
    pub period_key: String,
    pub period_label: String,
    pub total: u64,
}

/// One bar of the month-of-year layout: the same calendar month compared across years.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalValue {
    pub month: u32,
    pub month_abbr: String,
    pub year: i32,
    pub total: u64,
}

/// Categorical columns a monthly breakdown can be split by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Origin,
    CaseType,
    /// The grouped responsible party (low-volume names folded into "Other").
    Responsible,
}

impl Dimension {
    pub fn value_of(self, record: &CaseRecord) -> &str {
        match self {
            Dimension::Origin => &record.origin,
            Dimension::CaseType => &record.case_type,
            Dimension::Responsible => &record.responsible_grouped,
        }
    }
}

// ─── Monthly aggregates ──────────────────────────────────────────────────────

/// Case count per period, ascending by period key.
pub fn monthly_totals(records: &[CaseRecord]) -> Vec<PeriodCount> {
    let mut by_period: BTreeMap<&str, (&str, usize)> = BTreeMap::new();
    for r in records {
        by_period
            .entry(r.year_month_key.as_str())
            .or_insert((r.year_month_label.as_str(), 0))
            .1 += 1;
    }
    by_period
        .into_iter()
        .map(|(key, (label, total))| PeriodCount {
            period_key: key.to_string(),
            period_label: label.to_string(),
            total,
        })
        .collect()
}

/// Case count per (period, dimension value). Sparse: combinations without
/// any case are not emitted. Sorted by period key, then value.
pub fn monthly_totals_by(records: &[CaseRecord], dimension: Dimension) -> Vec<PeriodDimensionCount> {
    let mut by_pair: BTreeMap<(&str, &str), (&str, usize)> = BTreeMap::new();
    for r in records {
        by_pair
            .entry((r.year_month_key.as_str(), dimension.value_of(r)))
            .or_insert((r.year_month_label.as_str(), 0))
            .1 += 1;
    }
    by_pair
        .into_iter()
        .map(|((key, value), (label, total))| PeriodDimensionCount {
            period_key: key.to_string(),
            period_label: label.to_string(),
            value: value.to_string(),
            total,
        })
        .collect()
}

/// Sum of reopen counts per period, ascending by period key.
pub fn monthly_reopen_sums(records: &[CaseRecord]) -> Vec<PeriodSum> {
    let mut by_period: BTreeMap<&str, (&str, u64)> = BTreeMap::new();
    for r in records {
        by_period
            .entry(r.year_month_key.as_str())
            .or_insert((r.year_month_label.as_str(), 0))
            .1 += u64::from(r.reopen_count);
    }
    by_period
        .into_iter()
        .map(|(key, (label, total))| PeriodSum {
            period_key: key.to_string(),
            period_label: label.to_string(),
            total,
        })
        .collect()
}

// ─── Month-of-year layout ────────────────────────────────────────────────────

/// Case count per (month of year, year), sorted by month then year.
pub fn seasonal_totals(records: &[CaseRecord], config: &DashboardConfig) -> Vec<SeasonalValue> {
    seasonal(records, config, |_| 1)
}

/// Reopen sum per (month of year, year), sorted by month then year.
pub fn seasonal_reopen_sums(records: &[CaseRecord], config: &DashboardConfig) -> Vec<SeasonalValue> {
    seasonal(records, config, |r| u64::from(r.reopen_count))
}

fn seasonal(
    records: &[CaseRecord],
    config: &DashboardConfig,
    weight: impl Fn(&CaseRecord) -> u64,
) -> Vec<SeasonalValue> {
    let mut by_month_year: BTreeMap<(u32, i32), u64> = BTreeMap::new();
    for r in records {
        *by_month_year.entry((r.month, r.year)).or_insert(0) += weight(r);
    }
    by_month_year
        .into_iter()
        .map(|((month, year), total)| SeasonalValue {
            month,
            month_abbr: config.month_abbr(month).to_string(),
            year,
            total,
        })
        .collect()
}
