//! Grouped median computation over sale records.

use std::collections::{BTreeMap, HashMap};

use crate::records::{GroupMedian, SaleRecord};

/// Which identifier a median is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Tract,
    Zip,
}

impl GroupKey {
    fn of<'a>(&self, record: &'a SaleRecord) -> &'a str {
        match self {
            GroupKey::Tract => &record.tract,
            GroupKey::Zip => &record.zip,
        }
    }
}

/// Which price column the median is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    ClosePrice,
    ListPrice,
}

impl Measure {
    fn of(&self, record: &SaleRecord) -> Option<f64> {
        match self {
            Measure::ClosePrice => record.close_price,
            Measure::ListPrice => record.list_price,
        }
    }
}

/// Median of the given values: middle value when the count is odd, mean of
/// the two middles when even, `None` when empty. Sorts in place.
pub fn median_of(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Computes one [`GroupMedian`] per distinct key among records whose sell
/// year matches `year`.
///
/// Records with an absent measure are excluded from the median but still
/// count toward the group's record count, so a group whose every price is
/// absent appears with `median: None` rather than disappearing. Output is
/// sorted by key and does not depend on input order.
pub fn group_medians(
    records: &[SaleRecord],
    key: GroupKey,
    measure: Measure,
    year: &str,
) -> Vec<GroupMedian> {
    let mut groups: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();

    for record in records.iter().filter(|r| r.year == year) {
        let (values, count) = groups.entry(key.of(record)).or_default();
        *count += 1;
        if let Some(value) = measure.of(record) {
            values.push(value);
        }
    }

    groups
        .into_iter()
        .map(|(key, (mut values, records))| GroupMedian {
            key: key.to_string(),
            median: median_of(&mut values),
            records,
        })
        .collect()
}

/// Indexes medians by their grouping key for lookup joins.
pub fn by_key(medians: Vec<GroupMedian>) -> HashMap<String, GroupMedian> {
    medians.into_iter().map(|m| (m.key.clone(), m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(tract: &str, zip: &str, year: &str, close: Option<f64>) -> SaleRecord {
        SaleRecord {
            tract: tract.to_string(),
            zip: zip.to_string(),
            year: year.to_string(),
            month: "06".to_string(),
            close_price: close,
            list_price: close.map(|p| p + 10_000.0),
        }
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(median_of(&mut [3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_median_even_count_averages_middles() {
        assert_eq!(median_of(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_median_empty_is_absent() {
        assert_eq!(median_of(&mut []), None);
    }

    #[test]
    fn test_groups_by_tract() {
        let records = vec![
            sale("11001000100", "20001", "2024", Some(500_000.0)),
            sale("11001000100", "20001", "2024", Some(600_000.0)),
            sale("11001000200", "20002", "2024", Some(300_000.0)),
        ];

        let medians = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");

        assert_eq!(medians.len(), 2);
        assert_eq!(medians[0].key, "11001000100");
        assert_eq!(medians[0].median, Some(550_000.0));
        assert_eq!(medians[0].records, 2);
        assert_eq!(medians[1].key, "11001000200");
        assert_eq!(medians[1].median, Some(300_000.0));
    }

    #[test]
    fn test_groups_by_zip() {
        let records = vec![
            sale("11001000100", "20001", "2024", Some(500_000.0)),
            sale("11001000200", "20001", "2024", Some(700_000.0)),
        ];

        let medians = group_medians(&records, GroupKey::Zip, Measure::ClosePrice, "2024");

        assert_eq!(medians.len(), 1);
        assert_eq!(medians[0].key, "20001");
        assert_eq!(medians[0].median, Some(600_000.0));
    }

    #[test]
    fn test_year_filter_excludes_other_years() {
        let records = vec![
            sale("11001000100", "20001", "2024", Some(500_000.0)),
            sale("11001000100", "20001", "2023", Some(100_000.0)),
        ];

        let medians = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");

        assert_eq!(medians[0].median, Some(500_000.0));
        assert_eq!(medians[0].records, 1);
    }

    #[test]
    fn test_absent_prices_excluded_from_median_but_counted() {
        let records = vec![
            sale("11001000100", "20001", "2024", Some(500_000.0)),
            sale("11001000100", "20001", "2024", None),
        ];

        let medians = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");

        assert_eq!(medians[0].median, Some(500_000.0));
        assert_eq!(medians[0].records, 2);
    }

    #[test]
    fn test_all_absent_group_still_appears() {
        let records = vec![sale("11001000100", "20001", "2024", None)];

        let medians = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");

        assert_eq!(medians.len(), 1);
        assert_eq!(medians[0].median, None);
        assert_eq!(medians[0].records, 1);
    }

    #[test]
    fn test_list_price_measure() {
        let records = vec![sale("11001000100", "20001", "2024", Some(500_000.0))];

        let medians = group_medians(&records, GroupKey::Tract, Measure::ListPrice, "2024");

        assert_eq!(medians[0].median, Some(510_000.0));
    }

    #[test]
    fn test_output_is_input_order_independent() {
        let mut records = vec![
            sale("11001000300", "20003", "2024", Some(450_000.0)),
            sale("11001000100", "20001", "2024", Some(600_000.0)),
            sale("11001000100", "20001", "2024", Some(500_000.0)),
        ];
        let forward = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");
        records.reverse();
        let backward = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, "2024");

        assert_eq!(forward.len(), backward.len());
        for (a, b) in forward.iter().zip(&backward) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.median, b.median);
            assert_eq!(a.records, b.records);
        }
    }
}
