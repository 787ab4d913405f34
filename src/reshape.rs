//! Reshaping between wide, long, and pivoted layouts.
//!
//! `melt` unpivots the year columns into tidy (country, year, value) rows;
//! `pivot` spreads CTS codes back into columns keyed by (country, ISO2,
//! ISO3, year). Both return rows sorted by (country, year) so downstream
//! iteration is deterministic.

use crate::models::{Observation, PivotedRow, WideRecord};
use anyhow::{Result, bail};
use std::collections::BTreeMap;

/// Unpivot wide records into one observation per (row, year).
///
/// Missing cells stay `None`; they are carried, not dropped, so the long
/// table always holds `records.len() * year_count` rows.
pub fn melt(records: &[WideRecord]) -> Vec<Observation> {
    let mut out = Vec::with_capacity(records.iter().map(|r| r.years.len()).sum());
    for r in records {
        for (year, value) in &r.years {
            out.push(Observation {
                country: r.country.clone(),
                iso2: r.iso2.clone(),
                iso3: r.iso3.clone(),
                indicator: r.indicator.clone(),
                unit: r.unit.clone(),
                source: r.source.clone(),
                cts_code: r.cts_code.clone(),
                cts_name: r.cts_name.clone(),
                cts_full_descriptor: r.cts_full_descriptor.clone(),
                year: *year,
                value: *value,
            });
        }
    }
    out.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    out
}

/// Spread CTS codes into per-row entries keyed by (country, ISO2, ISO3, year).
///
/// Only valued observations contribute an entry, so a code that is missing
/// for a key reads back as `None` from [`PivotedRow::value`]. Two valued
/// observations for the same (country, year, CTS code) are an error: the
/// source data is assumed duplicate-free and no resolution order is applied.
pub fn pivot(observations: &[Observation]) -> Result<Vec<PivotedRow>> {
    // Key order (country, year, ...) doubles as the output sort order.
    let mut rows: BTreeMap<(String, i32, String, String), BTreeMap<String, f64>> = BTreeMap::new();
    for o in observations {
        let key = (
            o.country.clone(),
            o.year,
            o.iso2.clone(),
            o.iso3.clone(),
        );
        let entry = rows.entry(key).or_default();
        if let Some(v) = o.value
            && entry.insert(o.cts_code.clone(), v).is_some()
        {
            bail!(
                "duplicate observation for {} {} {}",
                o.country,
                o.year,
                o.cts_code
            );
        }
    }

    // Keys with no valued observation at all do not materialize a row.
    Ok(rows
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|((country, year, iso2, iso3), values)| PivotedRow {
            country,
            iso2,
            iso3,
            year,
            values,
        })
        .collect())
}
