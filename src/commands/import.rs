use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use chrono::{NaiveDateTime, Utc};

use crate::error::AppError;
use crate::parser::types::{Dataset, ParseWarning};
use crate::state::{AppState, CsvFileLoader};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum ImportEvent {
    #[serde(rename_all = "camelCase")]
    Progress {
        rows_parsed: usize,
        records_accepted: usize,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        duration_ms: u64,
        total_cases: usize,
        skipped_rows: usize,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub filename: String,
    pub total_cases: usize,
    pub open_cases: usize,
    pub resolved_cases: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub unique_origins: Vec<String>,
    pub unique_responsibles: Vec<String>,
    pub unique_types: Vec<String>,
    pub date_range_from: Option<NaiveDateTime>,
    pub date_range_to: Option<NaiveDateTime>,
    pub parse_duration_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub total_cases: usize,
    pub skipped_rows: usize,
    pub loaded_at: Option<chrono::DateTime<Utc>>,
}

/// Parses the CSV export at `path`, installs it as the current dataset and
/// remembers the file as the source for later refreshes.
pub fn load_dataset(
    state: &AppState,
    path: &str,
    on_progress: impl Fn(ImportEvent),
) -> Result<ImportResult, AppError> {
    let start = Instant::now();

    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();

    let parse_output = crate::parser::parse_csv(path, &state.config, |rows_parsed, records_accepted| {
        on_progress(ImportEvent::Progress {
            rows_parsed,
            records_accepted,
        });
    })?;

    let records = &parse_output.records;
    let total_cases = records.len();
    let open_cases = records.iter().filter(|r| r.resolved_at.is_none()).count();
    let date_range_from = records.iter().map(|r| r.opened_at).min();
    let date_range_to = records.iter().map(|r| r.opened_at).max();

    let result = ImportResult {
        filename,
        total_cases,
        open_cases,
        resolved_cases: total_cases - open_cases,
        skipped_rows: parse_output.skipped_rows,
        warnings: parse_output.warnings.clone(),
        detected_columns: parse_output.detected_columns.clone(),
        missing_optional_columns: parse_output.missing_optional_columns.clone(),
        unique_origins: parse_output.unique_origins.clone(),
        unique_responsibles: parse_output.unique_responsibles.clone(),
        unique_types: parse_output.unique_types.clone(),
        date_range_from,
        date_range_to,
        parse_duration_ms: parse_output.parse_duration_ms,
    };

    state.set_loader(Box::new(CsvFileLoader::new(path, state.config.clone())))?;
    state.replace(Dataset::from(parse_output), Utc::now())?;

    let duration_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "Imported {}: {} cases, {} rows skipped in {} ms",
        result.filename,
        result.total_cases,
        result.skipped_rows,
        duration_ms
    );
    on_progress(ImportEvent::Complete {
        duration_ms,
        total_cases,
        skipped_rows: result.skipped_rows,
    });

    Ok(result)
}

/// Reloads the dataset from its source, replacing the current one as a whole.
pub fn refresh_dataset(state: &AppState) -> Result<DatasetStatus, AppError> {
    state.refresh(Utc::now())?;
    get_dataset_status(state)
}

pub fn get_dataset_status(state: &AppState) -> Result<DatasetStatus, AppError> {
    Ok(match state.current()? {
        Some(cache) => DatasetStatus {
            total_cases: cache.dataset.len(),
            skipped_rows: cache.dataset.skipped_rows,
            loaded_at: Some(cache.loaded_at),
        },
        None => DatasetStatus {
            total_cases: 0,
            skipped_rows: 0,
            loaded_at: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    use crate::config::DashboardConfig;

    const CSV: &str = "Abertura;Solução;Origem;Responsável;Conta;Tipo;Qt Reab.\n\
        2024-01-05 09:00:00;2024-01-05 15:00:00;Web;Ana Silva;Acme Corp Brasil;Incident;1\n\
        2024-01-20 10:00:00;;Phone;Ana Silva;Acme Corp;Incident;0\n\
        not a date;;Web;Bruno Lima;Beta Ltd;Request;0\n\
        2024-02-02 11:00:00;2024-02-03 08:00:00;Web;Bruno Lima;Beta Ltd;Request;2\n";

    fn write_csv(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("case_metrics_{}_{}.csv", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_dataset_installs_and_reports() {
        let path = write_csv("load", CSV);
        let state = AppState::new(DashboardConfig::default());
        let events = RefCell::new(Vec::new());

        let result = load_dataset(&state, path.to_str().unwrap(), |e| {
            events.borrow_mut().push(e)
        })
        .unwrap();

        assert_eq!(result.total_cases, 3);
        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.open_cases, 1);
        assert_eq!(result.resolved_cases, 2);
        assert_eq!(result.unique_origins, vec!["Phone", "Web"]);
        assert!(result.missing_optional_columns.is_empty());
        assert_eq!(
            result.date_range_to.unwrap().format("%Y-%m-%d").to_string(),
            "2024-02-02"
        );
        assert!(matches!(
            events.borrow().last(),
            Some(ImportEvent::Complete { total_cases: 3, .. })
        ));

        let status = get_dataset_status(&state).unwrap();
        assert_eq!(status.total_cases, 3);
        assert_eq!(status.skipped_rows, 1);
        assert!(status.loaded_at.is_some());

        // The file is now the refresh source
        let refreshed = refresh_dataset(&state).unwrap();
        assert_eq!(refreshed.total_cases, 3);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_dataset_missing_columns_keeps_previous() {
        let good = write_csv("good", CSV);
        let bad = write_csv("bad", "Abertura;Origem\n2024-01-05;Web\n");
        let state = AppState::new(DashboardConfig::default());
        load_dataset(&state, good.to_str().unwrap(), |_| {}).unwrap();

        let err = load_dataset(&state, bad.to_str().unwrap(), |_| {}).unwrap_err();
        assert!(matches!(err, AppError::MissingColumns(_)));
        assert_eq!(get_dataset_status(&state).unwrap().total_cases, 3);

        std::fs::remove_file(good).ok();
        std::fs::remove_file(bad).ok();
    }

    #[test]
    fn test_refresh_without_source() {
        let state = AppState::new(DashboardConfig::default());
        assert!(matches!(refresh_dataset(&state), Err(AppError::NoDataset(_))));
        assert!(get_dataset_status(&state).unwrap().loaded_at.is_none());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(ImportEvent::Progress {
            rows_parsed: 500,
            records_accepted: 498,
        })
        .unwrap();
        assert_eq!(json["event"], "progress");
        assert_eq!(json["data"]["rowsParsed"], 500);
    }
}
