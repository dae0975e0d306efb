use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::types::CaseRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub key: String,
    pub label: String,
}

/// Distinct periods present in a record set, ascending by key.
///
/// Every period-indexed aggregate of one report is ordered with the same
/// `PeriodOrdering`, so a given month always lands at the same position.
/// Build it from the filtered records each time the filter changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PeriodOrdering {
    periods: Vec<Period>,
}

impl PeriodOrdering {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        let mut by_key: BTreeMap<&str, &str> = BTreeMap::new();
        for r in records {
            let label = by_key
                .entry(r.year_month_key.as_str())
                .or_insert(r.year_month_label.as_str());
            if *label != r.year_month_label {
                log::warn!(
                    "Period {} has two labels ({:?}, {:?}); keeping the first",
                    r.year_month_key,
                    label,
                    r.year_month_label
                );
            }
        }
        PeriodOrdering {
            periods: by_key
                .into_iter()
                .map(|(key, label)| Period {
                    key: key.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.periods.iter().map(|p| p.key.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.periods.iter().map(|p| p.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn latest(&self) -> Option<&Period> {
        self.periods.last()
    }

    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.periods
            .binary_search_by(|p| p.key.as_str().cmp(key.trim()))
            .ok()
    }

    /// Position of a display label. Tolerates reformatted labels
    /// ("jan 2024", "JAN-2024" for "Jan/2024") and raw keys ("2024-01").
    pub fn position_of_label(&self, label: &str) -> Option<usize> {
        let wanted = fold_label(label);
        if wanted.is_empty() {
            return None;
        }
        self.periods
            .iter()
            .position(|p| fold_label(&p.label) == wanted)
            .or_else(|| self.position_of_key(label))
    }

    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.position_of_key(key)
            .map(|i| self.periods[i].label.as_str())
    }

    pub fn key_for_label(&self, label: &str) -> Option<&str> {
        self.position_of_label(label)
            .map(|i| self.periods[i].key.as_str())
    }

    /// Stable sort of period-indexed rows by this ordering.
    /// Rows whose key is unknown keep their relative order at the end.
    pub fn sort_by_period<T>(&self, rows: &mut [T], key_of: impl Fn(&T) -> &str) {
        rows.sort_by_key(|row| self.position_of_key(key_of(row)).unwrap_or(usize::MAX));
    }
}

fn fold_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
