//! CSV loaders for the sales and crosswalk tables.
//!
//! Rows come in as text and leave as normalized records. A row whose
//! identifiers cannot be canonicalized is logged and dropped rather than
//! aborting the batch; structural CSV errors (wrong headers, truncated
//! rows) still fail the whole load.

use anyhow::Result;
use std::io::Read;
use tracing::{info, warn};

use crate::normalize::{
    normalize_month, normalize_tract, normalize_year, normalize_zip, sell_period,
};
use crate::records::{CrosswalkEdge, RawCrosswalkRow, RawSaleRow, SaleRecord};

/// Coerces a raw price field to a number, `None` on anything unusable.
///
/// Mirrors the source table's lenient numeric coercion: empty fields, text
/// junk, non-finite values, and negative prices all come out absent rather
/// than failing the row.
fn coerce_price(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p >= 0.0)
}

fn normalize_sale(row: &RawSaleRow) -> Result<SaleRecord, crate::normalize::NormalizeError> {
    let tract = normalize_tract(&row.tract)?;
    let zip = normalize_zip(&row.zip)?;
    let posted_year = normalize_year(&row.year)?;
    let posted_month = normalize_month(&row.month)?;

    // The sale itself happened the month before the table was posted.
    let (year, month) = sell_period(&posted_year, &posted_month)?;

    Ok(SaleRecord {
        tract,
        zip,
        year,
        month,
        close_price: coerce_price(row.close_price.as_deref()),
        list_price: coerce_price(row.list_price.as_deref()),
    })
}

/// Reads the compiled sales CSV into normalized [`SaleRecord`]s.
pub fn load_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (idx, result) in rdr.deserialize().enumerate() {
        let row: RawSaleRow = result?;
        match normalize_sale(&row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(row = idx + 1, error = %e, "Dropping sale row");
                dropped += 1;
            }
        }
    }

    info!(loaded = records.len(), dropped, "Sales table loaded");
    Ok(records)
}

/// Reads a tract-to-ZIP crosswalk CSV into normalized [`CrosswalkEdge`]s.
pub fn load_crosswalk<R: Read>(reader: R) -> Result<Vec<CrosswalkEdge>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut edges = Vec::new();
    let mut dropped = 0usize;

    for (idx, result) in rdr.deserialize().enumerate() {
        let row: RawCrosswalkRow = result?;

        let normalized = normalize_tract(&row.tract)
            .and_then(|tract| normalize_zip(&row.zip).map(|zip| (tract, zip)));
        match normalized {
            Ok((tract, zip)) => edges.push(CrosswalkEdge {
                tract,
                zip,
                res_ratio: row.res_ratio,
            }),
            Err(e) => {
                warn!(row = idx + 1, error = %e, "Dropping crosswalk row");
                dropped += 1;
            }
        }
    }

    info!(loaded = edges.len(), dropped, "Crosswalk table loaded");
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sales_normalizes_and_shifts_period() {
        let csv = "\
FULL_TRACT,ZIP,YEAR,MONTH,CLOSE_PRICE,LIST_PRICE
11001000100.0,20001,2024,07,500000,520000
1001000100,553,2025,01,,abc
";
        let records = load_sales(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tract, "11001000100");
        assert_eq!(records[0].year, "2024");
        assert_eq!(records[0].month, "06");
        assert_eq!(records[0].close_price, Some(500_000.0));

        // Second row: padded identifiers, January posting rolls back a year,
        // empty and junk prices coerce to absent.
        assert_eq!(records[1].tract, "01001000100");
        assert_eq!(records[1].zip, "00553");
        assert_eq!(records[1].year, "2024");
        assert_eq!(records[1].month, "12");
        assert_eq!(records[1].close_price, None);
        assert_eq!(records[1].list_price, None);
    }

    #[test]
    fn test_load_sales_drops_rows_with_bad_identifiers() {
        let csv = "\
FULL_TRACT,ZIP,YEAR,MONTH,CLOSE_PRICE,LIST_PRICE
11001000100,20001,2024,07,500000,520000
11001000200,ABCDE,2024,07,300000,310000
";
        let records = load_sales(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].zip, "20001");
    }

    #[test]
    fn test_load_sales_ignores_extra_columns() {
        let csv = "\
ADDRESS,FULL_TRACT,ZIP,YEAR,MONTH,CLOSE_PRICE,LIST_PRICE,SOURCE
1 Main St,11001000100,20001,2024,07,500000,520000,feed
";
        let records = load_sales(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_crosswalk_pads_identifiers() {
        let csv = "\
TRACT,ZIP,RES_RATIO
11001000100.0,20001,0.75
1001000100,553,0.25
";
        let edges = load_crosswalk(csv.as_bytes()).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].tract, "11001000100");
        assert_eq!(edges[0].res_ratio, 0.75);
        assert_eq!(edges[1].tract, "01001000100");
        assert_eq!(edges[1].zip, "00553");
    }

    #[test]
    fn test_load_crosswalk_drops_bad_rows() {
        let csv = "\
TRACT,ZIP,RES_RATIO
not-a-tract,20001,1.0
11001000100,20001,1.0
";
        let edges = load_crosswalk(csv.as_bytes()).unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_coerce_price_variants() {
        assert_eq!(coerce_price(Some("500000")), Some(500_000.0));
        assert_eq!(coerce_price(Some(" 1234.5 ")), Some(1234.5));
        assert_eq!(coerce_price(Some("")), None);
        assert_eq!(coerce_price(Some("n/a")), None);
        assert_eq!(coerce_price(Some("-5")), None);
        assert_eq!(coerce_price(Some("NaN")), None);
        assert_eq!(coerce_price(None), None);
    }
}
