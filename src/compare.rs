//! Assembly of the final comparison table.

use std::collections::{BTreeSet, HashMap};

use crate::records::{ComparisonRow, GroupMedian, WeightedEstimate};

/// Joins direct tract medians against crosswalk-derived estimates.
///
/// Emits one row per tract in the union of both key sets, sorted by tract
/// id. Absence propagates: a tract present on only one side gets `None` for
/// the other side and for both differences. `rel_diff` is signed,
/// (estimate − median) / median, and is also `None` when the direct median
/// is zero. Never fails.
pub fn assemble(direct: &[GroupMedian], estimates: &[WeightedEstimate]) -> Vec<ComparisonRow> {
    let direct_by_tract: HashMap<&str, Option<f64>> = direct
        .iter()
        .map(|m| (m.key.as_str(), m.median))
        .collect();
    let estimate_by_tract: HashMap<&str, Option<f64>> = estimates
        .iter()
        .map(|e| (e.tract.as_str(), e.estimate))
        .collect();

    let tracts: BTreeSet<&str> = direct_by_tract
        .keys()
        .chain(estimate_by_tract.keys())
        .copied()
        .collect();

    tracts
        .into_iter()
        .map(|tract| {
            let direct_median = direct_by_tract.get(tract).copied().flatten();
            let weighted_estimate = estimate_by_tract.get(tract).copied().flatten();

            let (abs_diff, rel_diff) = match (direct_median, weighted_estimate) {
                (Some(d), Some(w)) => {
                    let rel = if d != 0.0 { Some((w - d) / d) } else { None };
                    (Some((w - d).abs()), rel)
                }
                _ => (None, None),
            };

            ComparisonRow {
                tract: tract.to_string(),
                direct_median,
                weighted_estimate,
                abs_diff,
                rel_diff,
            }
        })
        .collect()
}

/// How much of the comparison table has data on each side.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub rows: usize,
    pub both_present: usize,
    pub direct_only: usize,
    pub estimate_only: usize,
    pub neither: usize,
}

/// Tallies per-side presence across the assembled table, for diagnostics.
pub fn coverage(rows: &[ComparisonRow]) -> Coverage {
    let mut c = Coverage {
        rows: rows.len(),
        ..Coverage::default()
    };

    for row in rows {
        match (row.direct_median, row.weighted_estimate) {
            (Some(_), Some(_)) => c.both_present += 1,
            (Some(_), None) => c.direct_only += 1,
            (None, Some(_)) => c.estimate_only += 1,
            (None, None) => c.neither += 1,
        }
    }

    c
}
