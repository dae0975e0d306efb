use std::collections::HashMap;

use serde::Serialize;

use crate::parser::types::CaseRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCount {
    /// Shortened account name (first two words).
    pub account: String,
    pub total: usize,
}

/// The `n` accounts with the most cases, grouped by shortened name.
///
/// Sorted by count descending; equal counts are ordered alphabetically so the
/// result does not depend on row order. Records without an account are ignored.
pub fn top_accounts(records: &[CaseRecord], n: usize) -> Vec<AccountCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        if let Some(account) = r.account_short.as_deref() {
            *counts.entry(account).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<AccountCount> = counts
        .into_iter()
        .map(|(account, total)| AccountCount {
            account: account.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.account.cmp(&b.account)));
    ranked.truncate(n);
    ranked
}
