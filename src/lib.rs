pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod parser;
pub mod state;

pub use analyzer::{build_dashboard_report, DashboardReport, FilterCriteria, FilterOptions, ReportRequest};
pub use config::DashboardConfig;
pub use error::AppError;
pub use parser::{CaseRecord, CaseRowRaw, Dataset};
pub use state::{AppState, CsvFileLoader, DatasetAccess, DatasetCache, DatasetLoader};

// ─── E2E Integration Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod e2e_tests {
    use crate::analyzer::{
        apply_filters, monthly_reopen_sums, monthly_totals, resolution_rate, top_accounts,
        FilterCriteria, FilterOptions, ReportRequest,
    };
    use crate::config::DashboardConfig;
    use crate::parser::{normalize_rows, parse_csv_reader, CaseRowRaw, Dataset};
    use crate::state::AppState;

    fn raw(opened: &str, resolved: &str, origin: &str, responsible: &str, account: &str, reopen: &str) -> CaseRowRaw {
        CaseRowRaw {
            opened_at: Some(opened.into()),
            resolved_at: Some(resolved.into()),
            origin: Some(origin.into()),
            responsible: Some(responsible.into()),
            account: Some(account.into()),
            case_type: Some("Incident".into()),
            reopen_count: Some(reopen.into()),
        }
    }

    /// Three cases over two months: normalize → aggregate.
    #[test]
    fn test_e2e_three_row_example() {
        let config = DashboardConfig::default();
        let out = normalize_rows(
            vec![
                raw("2024-01-05", "", "Web", "Ana Silva", "Acme Corp", "1"),
                raw("2024-01-20", "", "Phone", "Ana Silva", "Acme Corp", "0"),
                raw("2024-02-02", "", "Web", "Bruno Lima", "Beta Ltd", "2"),
            ],
            &config,
        );
        assert_eq!(out.skipped_rows, 0);

        let totals: Vec<(String, usize)> = monthly_totals(&out.records)
            .into_iter()
            .map(|p| (p.period_key, p.total))
            .collect();
        assert_eq!(totals, vec![("2024-01".into(), 2), ("2024-02".into(), 1)]);

        let reopens: Vec<(String, u64)> = monthly_reopen_sums(&out.records)
            .into_iter()
            .map(|p| (p.period_key, p.total))
            .collect();
        assert_eq!(reopens, vec![("2024-01".into(), 1), ("2024-02".into(), 2)]);

        let top = top_accounts(&out.records, 1);
        assert_eq!(top.len(), 1);
        assert_eq!((top[0].account.as_str(), top[0].total), ("Acme Corp", 2));
    }

    /// Same timestamp → same day; next day → not; open → counted in total only.
    #[test]
    fn test_e2e_same_day_scenarios() {
        let config = DashboardConfig::default();
        let out = normalize_rows(
            vec![
                raw("2024-03-04 10:00:00", "2024-03-04 10:00:00", "Web", "Ana Silva", "Acme", "0"),
                raw("2024-03-04 10:00:00", "2024-03-05 10:00:00", "Web", "Ana Silva", "Acme", "0"),
                raw("2024-03-04 10:00:00", "", "Web", "Ana Silva", "Acme", "0"),
            ],
            &config,
        );
        let flags: Vec<bool> = out.records.iter().map(|r| r.same_day_resolution).collect();
        assert_eq!(flags, vec![true, false, false]);

        let rows = resolution_rate(&out.records, "2024-03");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_cases, 3);
        assert_eq!(rows[0].same_day, 1);
        assert!((rows[0].rate_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_e2e_absent_year_is_empty_not_error() {
        let config = DashboardConfig::default();
        let out = normalize_rows(
            vec![raw("2024-01-05", "", "Web", "Ana Silva", "Acme Corp", "1")],
            &config,
        );
        let mut criteria = FilterCriteria::select_all(&FilterOptions::from_records(&out.records));
        criteria.years = [2019].into_iter().collect();
        assert!(apply_filters(&out.records, &criteria).is_empty());
    }

    /// CSV text → state → report, the path the presentation layer takes.
    #[test]
    fn test_e2e_csv_to_report() {
        let csv = "Abertura;Solução;Origem;Responsável;Conta;Tipo;Qt Reab.\n\
                   05/01/2024 09:00;05/01/2024 17:30;Web;Ana Silva;Acme Corp Brasil;Incident;1\n\
                   20/01/2024 10:00;;Phone;;Acme Corp;Incident;0\n\
                   ;;Web;Bruno Lima;Beta Ltd;Request;0\n\
                   02/02/2024 11:00;03/02/2024 08:00;Web;Susan Carboni;Beta Ltd;Request;2.0\n";
        let config = DashboardConfig::default();
        let output = parse_csv_reader(csv.as_bytes(), &config, |_, _| {}).unwrap();
        assert_eq!(output.skipped_rows, 1);

        let state = AppState::new(config);
        let dataset = state
            .replace(Dataset::from(output), chrono::Utc::now())
            .unwrap();

        let options = FilterOptions::from_records(&dataset.records);
        assert_eq!(options.responsibles, vec!["Ana Silva", "Not informed", "Other"]);

        let request = ReportRequest {
            criteria: FilterCriteria::select_all(&options),
            selected_period: Some("Jan/2024".into()),
        };
        let report = crate::commands::dashboard::get_dashboard_report(&state, &request).unwrap();

        assert_eq!(report.meta.filtered_records, 3);
        assert_eq!(report.meta.excluded_rows, 1);
        assert_eq!(report.summary.total_reopens, 3);
        assert_eq!(report.summary.same_day_count, 1);
        assert_eq!(
            report.ordering.labels().collect::<Vec<_>>(),
            vec!["Jan/2024", "Fev/2024"]
        );
        assert_eq!(report.top_accounts[0].account, "Acme Corp");
        assert_eq!(report.top_accounts[0].total, 2);

        let resolution = report.resolution.unwrap();
        assert_eq!(resolution.period_key, "2024-01");
        let ana = resolution
            .rows
            .iter()
            .find(|r| r.responsible == "Ana Silva")
            .unwrap();
        assert_eq!((ana.total_cases, ana.same_day), (1, 1));
        assert_eq!(ana.rate_pct, 100.0);
    }
}
