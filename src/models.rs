use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One row of the wide-format source CSV: the nine identifying columns plus
/// one `(year, value)` pair per 4-digit-year column found in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRecord {
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub indicator: String,
    pub unit: String,
    pub source: String,
    pub cts_code: String,
    pub cts_name: String,
    pub cts_full_descriptor: String,
    /// Year columns in header order. Empty cells are `None`.
    pub years: Vec<(i32, Option<f64>)>,
}

/// Tidy long-format structure used by this crate (one row = one observation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub indicator: String,
    pub unit: String,
    pub source: String,
    pub cts_code: String,
    pub cts_name: String,
    pub cts_full_descriptor: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// One (country, year) row of the pivoted table with one entry per CTS code
/// observed for that key. Codes absent for the key read back as `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotedRow {
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

impl PivotedRow {
    /// Value of the given CTS code for this (country, year), if present.
    pub fn value(&self, cts_code: &str) -> Option<f64> {
        self.values.get(cts_code).copied()
    }
}

/// Economic development tier assigned to a country for grouping.
///
/// Countries outside the two literal membership lists are unclassified and
/// carry no tier at all (`Option<Tier>` everywhere), so they drop out of
/// tier-level aggregation instead of forming a third group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Developed,
    Emerging,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Developed => f.write_str("Developed"),
            Tier::Emerging => f.write_str("Emerging"),
        }
    }
}

/// Mean normalized lending carbon intensity for one (tier, year) group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierAggregate {
    pub tier: Tier,
    pub year: i32,
    /// Mean over member rows that carry a value; `None` when no member does.
    pub mean: Option<f64>,
    /// Number of member rows in the group, valued or not.
    pub countries: usize,
}

/// Grouping key used in stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub cts_code: String,
    pub iso3: String,
}
