use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use chrono::{Datelike, NaiveDateTime};

use crate::analyzer::temporal::{calendar_parts, is_same_day};
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::parser::columns::{validate_columns, Column, ColumnMap};
use crate::parser::deserializers::{non_blank, parse_count, parse_flexible_datetime};
use crate::parser::types::{CaseRecord, CaseRowRaw, Dataset, ParseWarning, RowError};

/// Result of normalizing already-decoded rows.
#[derive(Debug)]
pub struct NormalizeOutput {
    pub records: Vec<CaseRecord>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    /// Rows excluded because they could not be normalized.
    pub skipped_rows: usize,
}

/// Output of `parse_csv` — normalized records plus import metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub records: Vec<CaseRecord>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub unique_origins: Vec<String>,
    pub unique_responsibles: Vec<String>,
    pub unique_types: Vec<String>,
    pub parse_duration_ms: u64,
}

impl From<NormalizeOutput> for Dataset {
    fn from(out: NormalizeOutput) -> Self {
        Dataset {
            records: out.records,
            skipped_rows: out.skipped_rows,
            warnings: out.warnings,
        }
    }
}

impl From<ParseOutput> for Dataset {
    fn from(out: ParseOutput) -> Self {
        Dataset {
            records: out.records,
            skipped_rows: out.skipped_rows,
            warnings: out.warnings,
        }
    }
}

/// Normalize one raw row. Fails only when the opening date is missing or unparseable.
pub fn normalize_row(raw: &CaseRowRaw, config: &DashboardConfig) -> Result<CaseRecord, RowError> {
    let opened_str = raw.opened_at.as_deref().map(str::trim).unwrap_or("");
    if opened_str.is_empty() {
        return Err(RowError::MissingOpenedAt);
    }
    let opened_at = parse_flexible_datetime(opened_str)
        .filter(has_four_digit_year)
        .ok_or_else(|| RowError::MalformedOpenedAt(opened_str.to_string()))?;

    let resolved_at = raw
        .resolved_at
        .as_deref()
        .and_then(parse_flexible_datetime)
        .filter(has_four_digit_year);

    let responsible = non_blank(raw.responsible.as_deref())
        .unwrap_or_else(|| config.not_informed_label.clone());
    let responsible_grouped = if config.is_other_responsible(&responsible) {
        config.other_label.clone()
    } else {
        responsible.clone()
    };

    let account = non_blank(raw.account.as_deref());
    let account_short = account.as_deref().map(shorten_account);

    let reopen_count = match raw.reopen_count.as_deref() {
        None => 0,
        Some(s) => parse_count(s).unwrap_or_else(|| {
            log::debug!("Unreadable reopen count {:?}, using 0", s);
            0
        }),
    };

    let (year, month, year_month_key, year_month_label) = calendar_parts(&opened_at, config);
    let same_day_resolution = is_same_day(&opened_at, resolved_at.as_ref());

    Ok(CaseRecord {
        opened_at,
        resolved_at,
        origin: raw.origin.as_deref().unwrap_or("").trim().to_string(),
        responsible,
        responsible_grouped,
        account,
        account_short,
        case_type: raw.case_type.as_deref().unwrap_or("").trim().to_string(),
        reopen_count,
        year,
        month,
        year_month_key,
        year_month_label,
        same_day_resolution,
    })
}

/// Period keys are `YYYY-MM` strings; signed or five-digit years would sort
/// out of chronological order.
fn has_four_digit_year(dt: &NaiveDateTime) -> bool {
    (0..=9999).contains(&dt.year())
}

/// First two whitespace-separated tokens ("Acme Corp Brasil Ltda" → "Acme Corp").
pub fn shorten_account(account: &str) -> String {
    account.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Normalize decoded rows. Rows that fail are excluded and reported in
/// `warnings`/`skipped_rows`; the batch itself never fails.
pub fn normalize_rows<I>(rows: I, config: &DashboardConfig) -> NormalizeOutput
where
    I: IntoIterator<Item = CaseRowRaw>,
{
    let mut acc = Accumulator::new(config);
    for (idx, raw) in rows.into_iter().enumerate() {
        acc.push(idx + 1, &raw);
    }
    acc.log_summary();
    NormalizeOutput {
        total_rows_processed: acc.records.len() + acc.skipped,
        records: acc.records,
        warnings: acc.warnings,
        skipped_rows: acc.skipped,
    }
}

/// Parse a case spreadsheet exported as CSV from `path`.
/// `progress_cb(rows_processed, records_accepted)` is called every 500 rows.
pub fn parse_csv(
    path: impl AsRef<Path>,
    config: &DashboardConfig,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_csv_reader(std::io::BufReader::new(file), config, progress_cb)
}

/// Core parsing logic — accepts any `Read` source, useful for tests.
pub fn parse_csv_reader<R: Read>(
    reader: R,
    config: &DashboardConfig,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let delimiter = u8::try_from(config.csv_delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            AppError::InvalidConfig(format!(
                "csvDelimiter must be an ASCII character, got {:?}",
                config.csv_delimiter
            ))
        })?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    // Phase 2: normalize records
    let mut acc = Accumulator::new(config);
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        if row_idx % 500 == 0 {
            progress_cb(row_idx, acc.records.len());
        }

        // +1 for the header row
        let line = row_idx + 1;
        match result {
            Ok(record) => acc.push(line, &record_to_raw(&col_map, &record)),
            Err(err) => acc.reject(line, err.to_string()),
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }
    acc.log_summary();

    let unique = |f: fn(&CaseRecord) -> &str| -> Vec<String> {
        acc.records
            .iter()
            .map(f)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };
    let unique_origins = unique(|r| r.origin.as_str());
    let unique_responsibles = unique(|r| r.responsible_grouped.as_str());
    let unique_types = unique(|r| r.case_type.as_str());

    Ok(ParseOutput {
        records: acc.records,
        warnings: acc.warnings,
        total_rows_processed: row_idx,
        skipped_rows: acc.skipped,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
        unique_origins,
        unique_responsibles,
        unique_types,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> CaseRowRaw {
    let cell = |col| col_map.get(record, col).map(str::to_string);
    CaseRowRaw {
        opened_at: cell(Column::OpenedAt),
        resolved_at: cell(Column::ResolvedAt),
        origin: cell(Column::Origin),
        responsible: cell(Column::Responsible),
        account: cell(Column::Account),
        case_type: cell(Column::CaseType),
        reopen_count: cell(Column::ReopenCount),
    }
}

struct Accumulator<'a> {
    config: &'a DashboardConfig,
    records: Vec<CaseRecord>,
    warnings: Vec<ParseWarning>,
    skipped: usize,
}

impl<'a> Accumulator<'a> {
    fn new(config: &'a DashboardConfig) -> Self {
        Accumulator {
            config,
            records: Vec::new(),
            warnings: Vec::new(),
            skipped: 0,
        }
    }

    fn push(&mut self, line: usize, raw: &CaseRowRaw) {
        match normalize_row(raw, self.config) {
            Ok(record) => self.records.push(record),
            Err(err) => self.reject(line, err.to_string()),
        }
    }

    fn reject(&mut self, line: usize, message: String) {
        log::debug!("Row {} excluded: {}", line, message);
        self.warnings.push(ParseWarning { line, message });
        self.skipped += 1;
    }

    fn log_summary(&self) {
        if self.skipped > 0 {
            log::warn!(
                "{} row(s) excluded during normalization, {} kept",
                self.skipped,
                self.records.len()
            );
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
