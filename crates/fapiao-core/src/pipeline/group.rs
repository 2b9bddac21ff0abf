//! Grouping of records by invoice date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::invoice::InvoiceRecord;

/// Records sharing one invoice date; the unit of merging.
#[derive(Debug, Clone)]
pub struct DateGroup {
    /// Shared date, `None` for records whose date is unknown.
    pub date: Option<NaiveDate>,
    /// Members in merge order.
    pub records: Vec<InvoiceRecord>,
}

/// Partition records by exact date.
///
/// Groups come out in date order with the unknown-date group last. Within a
/// group records are ordered by file name so repeated runs merge identically.
pub fn group_by_date(records: Vec<InvoiceRecord>) -> Vec<DateGroup> {
    let mut dated: BTreeMap<NaiveDate, Vec<InvoiceRecord>> = BTreeMap::new();
    let mut undated = Vec::new();

    for record in records {
        match record.date {
            Some(date) => dated.entry(date).or_default().push(record),
            None => undated.push(record),
        }
    }

    let mut groups: Vec<DateGroup> = dated
        .into_iter()
        .map(|(date, records)| DateGroup {
            date: Some(date),
            records,
        })
        .collect();
    if !undated.is_empty() {
        groups.push(DateGroup {
            date: None,
            records: undated,
        });
    }

    for group in &mut groups {
        group.records.sort_by(|a, b| a.filename.cmp(&b.filename));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::path::PathBuf;

    fn record(name: &str, date: Option<(i32, u32, u32)>) -> InvoiceRecord {
        InvoiceRecord {
            path: PathBuf::from(name),
            filename: name.to_string(),
            invoice_code: None,
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            payer: None,
            amount: None,
            modified: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_groups_by_exact_date() {
        let groups = group_by_date(vec![
            record("c.pdf", Some((2023, 5, 2))),
            record("b.pdf", Some((2023, 5, 1))),
            record("x.pdf", None),
            record("a.pdf", Some((2023, 5, 1))),
        ]);

        let summary: Vec<(Option<String>, Vec<&str>)> = groups
            .iter()
            .map(|g| {
                (
                    g.date.map(|d| d.to_string()),
                    g.records.iter().map(|r| r.filename.as_str()).collect(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (Some("2023-05-01".to_string()), vec!["a.pdf", "b.pdf"]),
                (Some("2023-05-02".to_string()), vec!["c.pdf"]),
                (None, vec!["x.pdf"]),
            ]
        );
    }

    #[test]
    fn test_no_records_no_groups() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
