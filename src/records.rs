//! Row types for the tables flowing through the pipeline.
//!
//! Each stage produces a fresh table of these rows and hands it to the next
//! stage by value; nothing here is mutated after construction. Absent values
//! are `Option::None` throughout, never NaN or a zero sentinel.

use serde::{Deserialize, Serialize};

/// One normalized sale transaction.
///
/// `year`/`month` are the derived *sell* period, not the posting period the
/// raw table carries. Identifiers are already canonical-width.
#[derive(Debug, Clone, Serialize)]
pub struct SaleRecord {
    pub tract: String,
    pub zip: String,
    pub year: String,
    pub month: String,
    pub close_price: Option<f64>,
    pub list_price: Option<f64>,
}

/// One (tract, ZIP) relation from the published crosswalk.
///
/// `res_ratio` is the fraction of the ZIP's residential addresses falling in
/// the tract. Ratios for a given ZIP are not required to sum to 1; the
/// published table is imprecise and that imprecision is tolerated as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CrosswalkEdge {
    pub tract: String,
    pub zip: String,
    pub res_ratio: f64,
}

/// A grouping key (tract or ZIP) with its median price and record count.
///
/// `median` is over present-valued prices only; a group whose every record
/// has an absent price still appears, with `median: None`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMedian {
    pub key: String,
    pub median: Option<f64>,
    pub records: usize,
}

/// A tract-level price estimate redistributed from ZIP medians.
#[derive(Debug, Clone, Serialize)]
pub struct WeightedEstimate {
    pub tract: String,
    pub estimate: Option<f64>,
}

/// One row of the final comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub tract: String,
    pub direct_median: Option<f64>,
    pub weighted_estimate: Option<f64>,
    pub abs_diff: Option<f64>,
    pub rel_diff: Option<f64>,
}

/// A raw sale row as it appears in the compiled sales CSV.
///
/// Column names match the source table; extra columns are ignored by the
/// reader. Everything is kept as text until normalization.
#[derive(Debug, Deserialize)]
pub struct RawSaleRow {
    #[serde(rename = "FULL_TRACT")]
    pub tract: String,
    #[serde(rename = "ZIP")]
    pub zip: String,
    #[serde(rename = "YEAR")]
    pub year: String,
    #[serde(rename = "MONTH")]
    pub month: String,
    #[serde(rename = "CLOSE_PRICE", default)]
    pub close_price: Option<String>,
    #[serde(rename = "LIST_PRICE", default)]
    pub list_price: Option<String>,
}

/// A raw crosswalk row as exported from the published tract-to-ZIP table.
#[derive(Debug, Deserialize)]
pub struct RawCrosswalkRow {
    #[serde(rename = "TRACT")]
    pub tract: String,
    #[serde(rename = "ZIP")]
    pub zip: String,
    #[serde(rename = "RES_RATIO")]
    pub res_ratio: f64,
}
