//! Market-wide summary of the filtered sales table.
//!
//! These are the ungrouped sanity-check numbers the analysis prints before
//! any per-tract work: if the global medians look wrong, the tract-level
//! comparison is not worth reading.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::median::median_of;
use crate::records::SaleRecord;

#[derive(Debug, Serialize)]
pub struct MarketSummary {
    pub year: String,
    pub records: usize,
    pub with_close_price: usize,
    pub with_list_price: usize,
    pub median_close_price: Option<f64>,
    pub median_list_price: Option<f64>,
    pub distinct_tracts: usize,
    pub distinct_zips: usize,
}

impl MarketSummary {
    /// Summarizes the records whose sell year matches `year`.
    pub fn from_records(records: &[SaleRecord], year: &str) -> Self {
        let mut close_prices = Vec::new();
        let mut list_prices = Vec::new();
        let mut tracts = BTreeSet::new();
        let mut zips = BTreeSet::new();
        let mut count = 0;

        for record in records.iter().filter(|r| r.year == year) {
            count += 1;
            tracts.insert(record.tract.as_str());
            zips.insert(record.zip.as_str());
            if let Some(p) = record.close_price {
                close_prices.push(p);
            }
            if let Some(p) = record.list_price {
                list_prices.push(p);
            }
        }

        MarketSummary {
            year: year.to_string(),
            records: count,
            with_close_price: close_prices.len(),
            with_list_price: list_prices.len(),
            median_close_price: median_of(&mut close_prices),
            median_list_price: median_of(&mut list_prices),
            distinct_tracts: tracts.len(),
            distinct_zips: zips.len(),
        }
    }
}
