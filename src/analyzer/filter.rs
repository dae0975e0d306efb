use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::parser::types::CaseRecord;

/// Choices offered for each filter dimension, sorted and distinct.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub origins: Vec<String>,
    pub responsibles: Vec<String>,
    pub case_types: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let distinct = |f: fn(&CaseRecord) -> &String| -> Vec<String> {
            records
                .iter()
                .map(f)
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        FilterOptions {
            years: years.into_iter().collect(),
            origins: distinct(|r| &r.origin),
            responsibles: distinct(|r| &r.responsible_grouped),
            case_types: distinct(|r| &r.case_type),
        }
    }
}

/// Selected values per dimension. Each set is an inclusion test and the
/// dimensions are combined with AND.
///
/// An empty set matches nothing, like a multi-select with nothing checked.
/// Use [`FilterCriteria::select_all`] to start from "everything selected".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub years: BTreeSet<i32>,
    pub origins: BTreeSet<String>,
    pub responsibles: BTreeSet<String>,
    pub case_types: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn select_all(options: &FilterOptions) -> Self {
        FilterCriteria {
            years: options.years.iter().copied().collect(),
            origins: options.origins.iter().cloned().collect(),
            responsibles: options.responsibles.iter().cloned().collect(),
            case_types: options.case_types.iter().cloned().collect(),
        }
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        self.years.contains(&record.year)
            && self.origins.contains(&record.origin)
            && self.responsibles.contains(&record.responsible_grouped)
            && self.case_types.contains(&record.case_type)
    }
}

/// Returns the records matching every criterion. The input is never modified;
/// an empty result is a valid state.
pub fn apply_filters(records: &[CaseRecord], criteria: &FilterCriteria) -> Vec<CaseRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}
