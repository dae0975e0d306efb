use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// One spreadsheet row before normalization. Every cell is optional text.
#[derive(Debug, Clone, Default)]
pub struct CaseRowRaw {
    pub opened_at: Option<String>,
    pub resolved_at: Option<String>,
    pub origin: Option<String>,
    pub responsible: Option<String>,
    pub account: Option<String>,
    pub case_type: Option<String>,
    pub reopen_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub opened_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    pub origin: String,
    pub responsible: String,
    pub responsible_grouped: String,
    pub account: Option<String>,
    pub account_short: Option<String>,
    pub case_type: String,
    pub reopen_count: u32,
    pub year: i32,
    pub month: u32,
    pub year_month_key: String,
    pub year_month_label: String,
    pub same_day_resolution: bool,
}

/// A row that could not be normalized. The row is excluded, never half-kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("Missing opening date")]
    MissingOpenedAt,

    #[error("Invalid opening date: {0:?}")]
    MalformedOpenedAt(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

/// A complete normalized record set, as handed to the analyzers.
/// Replaced as a whole on reload, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<CaseRecord>,
    /// Rows excluded during normalization.
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
}

impl Dataset {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        Dataset {
            records,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
