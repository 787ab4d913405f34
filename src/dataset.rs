//! Loading the wide-format "Carbon Footprint of Bank Loans" CSV.
//!
//! The file carries nine fixed identifying columns plus one column per year,
//! with the 4-digit year as the column header. Year columns are discovered
//! from the header, so datasets covering different year ranges load without
//! code changes.

use crate::models::WideRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// Identifying columns expected in the source CSV, in no particular order.
pub const ID_COLUMNS: [&str; 9] = [
    "Country",
    "ISO2",
    "ISO3",
    "Indicator",
    "Unit",
    "Source",
    "CTS Code",
    "CTS Name",
    "CTS Full Descriptor",
];

static YEAR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("year header regex"));

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing expected column {0:?}")]
    MissingColumn(&'static str),
    #[error("no 4-digit year columns in header")]
    NoYearColumns,
    #[error("row {row}: column {column:?} holds non-numeric value {value:?}")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Read the wide CSV into memory. Empty year cells become `None`; any other
/// failure (absent file, malformed CSV, missing column, non-numeric cell) is
/// propagated to the caller.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<WideRecord>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new().from_path(path)?;
    let headers = rdr.headers()?.clone();

    let col = |name: &'static str| -> Result<usize, DatasetError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DatasetError::MissingColumn(name))
    };
    let country = col("Country")?;
    let iso2 = col("ISO2")?;
    let iso3 = col("ISO3")?;
    let indicator = col("Indicator")?;
    let unit = col("Unit")?;
    let source = col("Source")?;
    let cts_code = col("CTS Code")?;
    let cts_name = col("CTS Name")?;
    let cts_full_descriptor = col("CTS Full Descriptor")?;

    // Every header that is exactly a 4-digit year is a data column.
    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| YEAR_HEADER.is_match(h))
        .map(|(i, h)| (i, h.parse::<i32>().expect("matched 4 digits")))
        .collect();
    if year_cols.is_empty() {
        return Err(DatasetError::NoYearColumns);
    }

    let mut out = Vec::new();
    for (ri, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let field = |i: usize| rec.get(i).unwrap_or("").trim().to_string();

        let mut years = Vec::with_capacity(year_cols.len());
        for (i, year) in &year_cols {
            let raw = rec.get(*i).unwrap_or("").trim();
            let value = if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<f64>().map_err(|_| DatasetError::BadValue {
                    row: ri + 2, // header line + 1-based data row
                    column: year.to_string(),
                    value: raw.to_string(),
                })?)
            };
            years.push((*year, value));
        }

        out.push(WideRecord {
            country: field(country),
            iso2: field(iso2),
            iso3: field(iso3),
            indicator: field(indicator),
            unit: field(unit),
            source: field(source),
            cts_code: field(cts_code),
            cts_name: field(cts_name),
            cts_full_descriptor: field(cts_full_descriptor),
            years,
        });
    }
    Ok(out)
}
