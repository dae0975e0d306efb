use crate::config::DashboardConfig;
use crate::parser::normalize_row;
use crate::parser::types::{CaseRecord, CaseRowRaw};

pub(crate) fn record(
    opened: &str,
    origin: &str,
    responsible: &str,
    account: &str,
    case_type: &str,
    reopen: u32,
) -> CaseRecord {
    let raw = CaseRowRaw {
        opened_at: Some(opened.to_string()),
        resolved_at: None,
        origin: Some(origin.to_string()),
        responsible: Some(responsible.to_string()),
        account: Some(account.to_string()),
        case_type: Some(case_type.to_string()),
        reopen_count: Some(reopen.to_string()),
    };
    normalize_row(&raw, &DashboardConfig::default()).unwrap()
}

pub(crate) fn resolved(opened: &str, resolved_at: Option<&str>, responsible: &str) -> CaseRecord {
    let raw = CaseRowRaw {
        opened_at: Some(opened.to_string()),
        resolved_at: resolved_at.map(str::to_string),
        origin: Some("Web".to_string()),
        responsible: Some(responsible.to_string()),
        account: Some("Acme Corp".to_string()),
        case_type: Some("Incident".to_string()),
        reopen_count: None,
    };
    normalize_row(&raw, &DashboardConfig::default()).unwrap()
}

/// Three cases over two months.
pub(crate) fn sample_records() -> Vec<CaseRecord> {
    vec![
        record("2024-01-05", "Web", "Ana Silva", "Acme Corp", "Incident", 1),
        record("2024-01-20", "Phone", "Ana Silva", "Acme Corp", "Incident", 0),
        record("2024-02-02", "Web", "Bruno Lima", "Beta Ltd", "Request", 2),
    ]
}
