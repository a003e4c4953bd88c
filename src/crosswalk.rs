//! ZIP-to-tract redistribution of medians through the published crosswalk.
//!
//! ZIP-level medians are coarser than tract-level ones; the crosswalk says
//! what fraction of each ZIP's residential addresses sits in each tract, so
//! a tract estimate is the ratio-weighted mean of the medians of the ZIPs
//! overlapping it.

use std::collections::{BTreeMap, HashMap};

use crate::records::{CrosswalkEdge, GroupMedian, WeightedEstimate};

/// Produces one [`WeightedEstimate`] per distinct tract in the edge set.
///
/// For each tract the estimate is Σ(zip_median × res_ratio) / Σ(res_ratio),
/// where both sums run only over edges whose ZIP has a present median: an
/// edge whose ZIP is unknown or has an absent median contributes to neither
/// the numerator nor the denominator. When the denominator comes out zero
/// (all medians absent, or only zero-ratio edges remain) the estimate is
/// `None`. A tract with no edges at all does not appear in the output —
/// "no crosswalk data" is distinct from "computed as absent".
///
/// Edges are summed in ascending ZIP order within each tract and tracts are
/// emitted in ascending order, so the result is reproducible regardless of
/// how the edge table was ordered.
pub fn redistribute(
    edges: &[CrosswalkEdge],
    zip_medians: &HashMap<String, GroupMedian>,
) -> Vec<WeightedEstimate> {
    let mut by_tract: BTreeMap<&str, Vec<&CrosswalkEdge>> = BTreeMap::new();
    for edge in edges {
        by_tract.entry(&edge.tract).or_default().push(edge);
    }

    by_tract
        .into_iter()
        .map(|(tract, mut tract_edges)| {
            tract_edges.sort_by(|a, b| a.zip.cmp(&b.zip));

            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for edge in tract_edges {
                let Some(median) = zip_medians.get(&edge.zip).and_then(|m| m.median) else {
                    continue;
                };
                numerator += median * edge.res_ratio;
                denominator += edge.res_ratio;
            }

            let estimate = if denominator > 0.0 {
                Some(numerator / denominator)
            } else {
                None
            };

            WeightedEstimate {
                tract: tract.to_string(),
                estimate,
            }
        })
        .collect()
}
