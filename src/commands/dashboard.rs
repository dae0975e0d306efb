use crate::analyzer::dashboard::{build_dashboard_report, DashboardReport, ReportRequest};
use crate::error::AppError;
use crate::state::{AppState, DatasetAccess};

/// Returns the complete dashboard payload for one filter selection.
///
/// The report is recomputed from the cached dataset on every call; an empty
/// selection yields a report with `meta.isEmpty` set.
pub fn get_dashboard_report(
    state: &AppState,
    request: &ReportRequest,
) -> Result<DashboardReport, AppError> {
    state.with_dataset(|dataset, config| build_dashboard_report(dataset, request, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::filter::{FilterCriteria, FilterOptions};
    use crate::analyzer::fixtures::sample_records;
    use crate::config::DashboardConfig;
    use crate::parser::types::Dataset;

    #[test]
    fn test_report_through_state() {
        let state = AppState::new(DashboardConfig::default());
        let dataset = state
            .replace(Dataset::new(sample_records()), chrono::Utc::now())
            .unwrap();
        let request = ReportRequest {
            criteria: FilterCriteria::select_all(&FilterOptions::from_records(&dataset.records)),
            selected_period: Some("Jan/2024".into()),
        };

        let report = get_dashboard_report(&state, &request).unwrap();
        assert_eq!(report.meta.filtered_records, 3);
        assert_eq!(report.resolution.unwrap().period_key, "2024-01");
    }

    #[test]
    fn test_serialized_payload_is_camel_case() {
        let state = AppState::new(DashboardConfig::default());
        state
            .replace(Dataset::new(sample_records()), chrono::Utc::now())
            .unwrap();
        let report = get_dashboard_report(&state, &ReportRequest::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["meta"]["isEmpty"], true);
        assert!(json["meta"]["durationMs"].is_u64());
        assert!(json["monthlyTotals"].as_array().unwrap().is_empty());
        assert!(json["resolution"].is_null());
    }
}
