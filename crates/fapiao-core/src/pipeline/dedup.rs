//! Deduplication by invoice code.

use std::collections::HashSet;

use crate::models::invoice::InvoiceRecord;

/// Keep the most recently modified record per invoice code.
///
/// Records are returned newest first. Records without a code are never
/// treated as duplicates of each other and are always kept.
pub fn deduplicate(mut records: Vec<InvoiceRecord>) -> Vec<InvoiceRecord> {
    records.sort_by(|a, b| b.modified.cmp(&a.modified));

    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| match &record.invoice_code {
            Some(code) => seen.insert(code.clone()),
            None => true,
        })
        .collect()
}
