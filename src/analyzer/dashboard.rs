/// Dashboard report — filters a dataset and computes every table the page displays.
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::accounts::{top_accounts, AccountCount};
use super::filter::{apply_filters, FilterCriteria};
use super::ordering::{Period, PeriodOrdering};
use super::ranking::{monthly_totals_by_stable_responsible, stable_categories, StableCategories};
use super::resolution::{resolution_rate, ResolutionReport};
use super::summary::{summarize, Summary};
use super::volumes::{
    monthly_reopen_sums, monthly_totals, monthly_totals_by, seasonal_reopen_sums,
    seasonal_totals, Dimension, PeriodCount, PeriodDimensionCount, PeriodSum, SeasonalValue,
};
use crate::config::DashboardConfig;
use crate::parser::types::{CaseRecord, Dataset};

// ─── Data Structures ─────────────────────────────────────────────────────────

/// What the presentation layer asks for on every filter change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    pub criteria: FilterCriteria,
    /// Period for the resolution table, as key (`2024-01`) or label (`Jan/2024`).
    /// Falls back to the latest period when absent or not in the filtered set.
    pub selected_period: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub meta: DashboardMeta,
    pub ordering: PeriodOrdering,
    pub summary: Summary,
    pub monthly_totals: Vec<PeriodCount>,
    pub by_origin: Vec<PeriodDimensionCount>,
    pub by_type: Vec<PeriodDimensionCount>,
    pub by_responsible: Vec<PeriodDimensionCount>,
    pub stable_categories: StableCategories,
    pub stable_responsible: Vec<PeriodDimensionCount>,
    pub reopen_sums: Vec<PeriodSum>,
    pub seasonal_totals: Vec<SeasonalValue>,
    pub seasonal_reopens: Vec<SeasonalValue>,
    pub top_accounts: Vec<AccountCount>,
    pub resolution: Option<ResolutionReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_records: usize,
    pub filtered_records: usize,
    pub excluded_rows: usize,
    pub period_count: usize,
    /// No record survived the filters; every table below is empty.
    pub is_empty: bool,
    pub duration_ms: u64,
}

// ─── Builders ────────────────────────────────────────────────────────────────

/// Picks the resolution period: the requested one when the filtered set has
/// it, otherwise the latest.
fn resolve_period<'a>(ordering: &'a PeriodOrdering, requested: Option<&str>) -> Option<&'a Period> {
    let requested_pos = requested.and_then(|p| ordering.position_of_label(p));
    if let (Some(p), None) = (requested, requested_pos) {
        log::debug!("Period {:?} not in filtered set, using latest", p);
    }
    requested_pos
        .map(|i| &ordering.periods()[i])
        .or_else(|| ordering.latest())
}

fn build_resolution(
    records: &[CaseRecord],
    ordering: &PeriodOrdering,
    requested: Option<&str>,
) -> Option<ResolutionReport> {
    let period = resolve_period(ordering, requested)?;
    Some(ResolutionReport {
        period_key: period.key.clone(),
        period_label: period.label.clone(),
        rows: resolution_rate(records, &period.key),
    })
}

fn by_dimension(
    records: &[CaseRecord],
    ordering: &PeriodOrdering,
    dimension: Dimension,
) -> Vec<PeriodDimensionCount> {
    let mut rows = monthly_totals_by(records, dimension);
    ordering.sort_by_period(&mut rows, |r| r.period_key.as_str());
    rows
}

/// Builds the complete dashboard report for one filter selection.
///
/// Runs filter, aggregates and ordering in one synchronous pass over an
/// immutable dataset. An empty filter result is a valid report with
/// `meta.is_empty` set, not an error.
pub fn build_dashboard_report(
    dataset: &Dataset,
    request: &ReportRequest,
    config: &DashboardConfig,
) -> DashboardReport {
    let start = Instant::now();

    let filtered = apply_filters(&dataset.records, &request.criteria);
    let ordering = PeriodOrdering::from_records(&filtered);

    let mut monthly = monthly_totals(&filtered);
    ordering.sort_by_period(&mut monthly, |r| r.period_key.as_str());
    let mut reopen_sums = monthly_reopen_sums(&filtered);
    ordering.sort_by_period(&mut reopen_sums, |r| r.period_key.as_str());

    let categories = stable_categories(
        &filtered,
        config.top_responsibles,
        &config.others_bucket_label,
    );
    let mut stable_responsible = monthly_totals_by_stable_responsible(&filtered, &categories);
    ordering.sort_by_period(&mut stable_responsible, |r| r.period_key.as_str());

    let report = DashboardReport {
        summary: summarize(&filtered, dataset.skipped_rows),
        monthly_totals: monthly,
        by_origin: by_dimension(&filtered, &ordering, Dimension::Origin),
        by_type: by_dimension(&filtered, &ordering, Dimension::CaseType),
        by_responsible: by_dimension(&filtered, &ordering, Dimension::Responsible),
        stable_categories: categories,
        stable_responsible,
        reopen_sums,
        seasonal_totals: seasonal_totals(&filtered, config),
        seasonal_reopens: seasonal_reopen_sums(&filtered, config),
        top_accounts: top_accounts(&filtered, config.top_accounts),
        resolution: build_resolution(&filtered, &ordering, request.selected_period.as_deref()),
        meta: DashboardMeta {
            total_records: dataset.records.len(),
            filtered_records: filtered.len(),
            excluded_rows: dataset.skipped_rows,
            period_count: ordering.len(),
            is_empty: filtered.is_empty(),
            duration_ms: start.elapsed().as_millis() as u64,
        },
        ordering,
    };

    log::info!(
        "Dashboard report: {}/{} records, {} periods in {} ms",
        report.meta.filtered_records,
        report.meta.total_records,
        report.meta.period_count,
        report.meta.duration_ms
    );
    report
}

// ─── Tests ───────────────────────────────────────────────────────────────────
