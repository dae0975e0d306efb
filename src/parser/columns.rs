use std::collections::HashMap;

use crate::error::AppError;

/// Logical columns of a case spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    OpenedAt,
    ResolvedAt,
    Origin,
    Responsible,
    Account,
    CaseType,
    ReopenCount,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::OpenedAt,
        Column::ResolvedAt,
        Column::Origin,
        Column::Responsible,
        Column::Account,
        Column::CaseType,
        Column::ReopenCount,
    ];

    /// Header names accepted for this column. The first one is the canonical name.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::OpenedAt => &["Abertura", "opened_at", "Data de Abertura"],
            Column::ResolvedAt => &["Solução", "resolved_at", "Solucao"],
            Column::Origin => &["Origem", "origin"],
            Column::Responsible => &["Responsável", "responsible", "Responsavel"],
            Column::Account => &["Conta", "account"],
            Column::CaseType => &["Tipo", "case_type", "type"],
            Column::ReopenCount => &["Qt Reab.", "reopen_count", "Qt Reab"],
        }
    }

    pub fn canonical_name(self) -> &'static str {
        self.aliases()[0]
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Column::ResolvedAt | Column::ReopenCount)
    }
}

/// Maps logical columns to their index in a CSV record.
pub struct ColumnMap {
    indices: HashMap<Column, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed and compared case-insensitively against the aliases.
    /// When two headers match the same column, the first one wins.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().trim_start_matches('\u{FEFF}').to_string();
            let lowered = name.to_lowercase();
            for col in Column::ALL {
                if col.aliases().iter().any(|a| a.to_lowercase() == lowered) {
                    indices.entry(col).or_insert(i);
                }
            }
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: Column) -> Option<&'a str> {
        self.indices.get(&col).and_then(|&i| record.get(i))
    }

    pub fn has(&self, col: Column) -> bool {
        self.indices.contains_key(&col)
    }

    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the CSV.
    pub present: Vec<String>,
    /// Optional columns that are absent from the CSV (canonical names).
    pub missing_optional: Vec<String>,
}

/// Returns `AppError::MissingColumns` if any required column is absent.
pub fn validate_columns(col_map: &ColumnMap) -> Result<ColumnValidation, AppError> {
    let missing_required: Vec<String> = Column::ALL
        .iter()
        .filter(|c| c.is_required() && !col_map.has(**c))
        .map(|c| c.canonical_name().to_string())
        .collect();

    if !missing_required.is_empty() {
        return Err(AppError::MissingColumns(missing_required));
    }

    let missing_optional = Column::ALL
        .iter()
        .filter(|c| !c.is_required() && !col_map.has(**c))
        .map(|c| c.canonical_name().to_string())
        .collect();

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_optional,
    })
}
