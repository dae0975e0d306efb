use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::volumes::PeriodDimensionCount;
use crate::parser::types::CaseRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyVolume {
    pub responsible: String,
    pub total: usize,
}

/// Categories for the per-period responsible comparison.
///
/// Stable-category rule: the top-K parties are chosen once over the whole
/// filtered set, then reused for every period; everyone else is counted in
/// the `others_label` bucket. Bars keep the same categories from one month
/// to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StableCategories {
    /// Top parties by total volume, highest first.
    pub top: Vec<String>,
    pub others_label: String,
}

impl StableCategories {
    pub fn category_of<'a>(&'a self, party: &'a str) -> &'a str {
        if self.top.iter().any(|t| t == party) {
            party
        } else {
            &self.others_label
        }
    }

    /// Display rank of a party: its volume position when it is a top party,
    /// `top.len()` for the bucket. Ranked by party, not by category name, so a
    /// top party named like the bucket keeps its own row.
    fn rank_of(&self, party: &str) -> usize {
        self.top
            .iter()
            .position(|t| t == party)
            .unwrap_or(self.top.len())
    }
}

/// Every grouped responsible party with its case count over the whole set,
/// highest first, ties alphabetical.
pub fn responsible_ranking(records: &[CaseRecord]) -> Vec<PartyVolume> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.responsible_grouped.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<PartyVolume> = counts
        .into_iter()
        .map(|(responsible, total)| PartyVolume {
            responsible: responsible.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.responsible.cmp(&b.responsible))
    });
    ranked
}

pub fn stable_categories(records: &[CaseRecord], k: usize, others_label: &str) -> StableCategories {
    StableCategories {
        top: responsible_ranking(records)
            .into_iter()
            .take(k)
            .map(|p| p.responsible)
            .collect(),
        others_label: others_label.to_string(),
    }
}

/// Case count per (period, stable category). Sparse; within a period the
/// categories follow the volume ranking with the bucket last.
pub fn monthly_totals_by_stable_responsible(
    records: &[CaseRecord],
    categories: &StableCategories,
) -> Vec<PeriodDimensionCount> {
    let mut by_pair: BTreeMap<(&str, usize), (&str, &str, usize)> = BTreeMap::new();
    for r in records {
        let category = categories.category_of(&r.responsible_grouped);
        let rank = categories.rank_of(&r.responsible_grouped);
        by_pair
            .entry((r.year_month_key.as_str(), rank))
            .or_insert((r.year_month_label.as_str(), category, 0))
            .2 += 1;
    }
    by_pair
        .into_iter()
        .map(|((key, _), (label, category, total))| PeriodDimensionCount {
            period_key: key.to_string(),
            period_label: label.to_string(),
            value: category.to_string(),
            total,
        })
        .collect()
}
