//! Identifier canonicalization for the sales and crosswalk tables.
//!
//! Source tables arrive with identifiers in whatever shape the spreadsheet
//! tooling left them: float-typed ZIP columns stringify as `"20001.0"`, tract
//! GEOIDs lose their leading zeros, and so on. Joins downstream are
//! exact-match string joins, so every identifier is padded to its canonical
//! width here, once, before anything else sees it.

use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

pub const ZIP_WIDTH: usize = 5;
pub const TRACT_WIDTH: usize = 11;
pub const YEAR_WIDTH: usize = 4;
pub const MONTH_WIDTH: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid identifier {value:?}: expected up to {width} digits")]
    InvalidIdentifier { value: String, width: usize },
}

/// Canonicalizes a raw identifier into a left-zero-padded digit string of
/// exactly `width` characters.
///
/// A trailing `.0` artifact from float-typed columns is stripped before
/// padding. Fails with [`NormalizeError::InvalidIdentifier`] if the stripped
/// value is empty, contains a non-digit character, or is wider than `width`.
pub fn normalize_id(raw: &str, width: usize) -> Result<String, NormalizeError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);

    if digits.is_empty()
        || digits.len() > width
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(NormalizeError::InvalidIdentifier {
            value: raw.to_string(),
            width,
        });
    }

    Ok(format!("{:0>width$}", digits))
}

pub fn normalize_zip(raw: &str) -> Result<String, NormalizeError> {
    normalize_id(raw, ZIP_WIDTH)
}

pub fn normalize_tract(raw: &str) -> Result<String, NormalizeError> {
    normalize_id(raw, TRACT_WIDTH)
}

pub fn normalize_year(raw: &str) -> Result<String, NormalizeError> {
    normalize_id(raw, YEAR_WIDTH)
}

pub fn normalize_month(raw: &str) -> Result<String, NormalizeError> {
    normalize_id(raw, MONTH_WIDTH)
}

/// Derives the (sell_year, sell_month) pair from a posting period.
///
/// The YEAR/MONTH columns in the sales table record when the table was
/// *posted*; the sales themselves are from the previous calendar month, so
/// the posting period is shifted back by one month (January rolls back to
/// December of the prior year). Inputs must already be normalized; a month
/// outside 01..=12 is rejected as an invalid identifier.
pub fn sell_period(year: &str, month: &str) -> Result<(String, String), NormalizeError> {
    let y: i32 = year
        .parse()
        .map_err(|_| NormalizeError::InvalidIdentifier {
            value: year.to_string(),
            width: YEAR_WIDTH,
        })?;
    let m: u32 = month
        .parse()
        .map_err(|_| NormalizeError::InvalidIdentifier {
            value: month.to_string(),
            width: MONTH_WIDTH,
        })?;

    let posted = NaiveDate::from_ymd_opt(y, m, 1).ok_or(NormalizeError::InvalidIdentifier {
        value: month.to_string(),
        width: MONTH_WIDTH,
    })?;
    let sold = posted
        .checked_sub_months(Months::new(1))
        .ok_or(NormalizeError::InvalidIdentifier {
            value: year.to_string(),
            width: YEAR_WIDTH,
        })?;

    Ok((format!("{:04}", sold.year()), format!("{:02}", sold.month())))
}
