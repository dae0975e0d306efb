pub mod accounts;
pub mod dashboard;
pub mod filter;
pub mod ordering;
pub mod ranking;
pub mod resolution;
pub mod stats;
pub mod summary;
pub mod temporal;
pub mod volumes;

#[cfg(test)]
pub(crate) mod fixtures;

pub use accounts::{top_accounts, AccountCount};
pub use dashboard::{build_dashboard_report, DashboardMeta, DashboardReport, ReportRequest};
pub use filter::{apply_filters, FilterCriteria, FilterOptions};
pub use ordering::{Period, PeriodOrdering};
pub use ranking::{
    monthly_totals_by_stable_responsible, responsible_ranking, stable_categories, PartyVolume,
    StableCategories,
};
pub use resolution::{resolution_rate, ResolutionRate, ResolutionReport};
pub use summary::{summarize, Summary};
pub use volumes::{
    monthly_reopen_sums, monthly_totals, monthly_totals_by, seasonal_reopen_sums,
    seasonal_totals, Dimension, PeriodCount, PeriodDimensionCount, PeriodSum, SeasonalValue,
};
