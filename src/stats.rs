//! Grouping and summary statistics over the reshaped tables.

use crate::classify;
use crate::models::{GroupKey, Observation, PivotedRow, Tier, TierAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CTS code of the lending carbon intensity normalized to 2015 = 100.
pub const ECFLIN: &str = "ECFLIN";
/// CTS code of the raw lending carbon intensity (tons CO2 per $1M loaned).
pub const ECFLI: &str = "ECFLI";

/// First year of the tier comparison window (the normalization baseline).
pub const TIER_WINDOW_FROM: i32 = 2015;
/// First year of the top-emitter window.
pub const TOP_EMITTER_WINDOW_FROM: i32 = 2011;

/// The five emerging economies with the heaviest lending carbon footprint,
/// as named in the dataset, paired with the short label used on charts.
pub const TOP_EMITTERS: [(&str, &str); 5] = [
    ("Kazakhstan, Rep. of", "Kazakhstan"),
    ("Philippines", "Philippines"),
    ("Türkiye, Rep. of", "Türkiye"),
    ("Indonesia", "Indonesia"),
    ("Tunisia", "Tunisia"),
];

/// Summary statistics for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute grouped statistics by (CTS code, ISO3).
pub fn grouped_summary(observations: &[Observation]) -> Vec<Summary> {
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    let mut missing: BTreeMap<GroupKey, usize> = BTreeMap::new();
    for o in observations {
        let key = GroupKey {
            cts_code: o.cts_code.clone(),
            iso3: o.iso3.clone(),
        };
        match o.value {
            Some(v) => groups.entry(key).or_default().push(v),
            None => *missing.entry(key).or_default() += 1,
        }
    }

    // Groups where every observation is missing still get a summary row.
    for key in missing.keys() {
        groups.entry(key.clone()).or_default();
    }

    let mut out = Vec::new();
    for (key, mut vals) in groups {
        vals.sort_by(|a, b| a.partial_cmp(b).expect("no NaN observations"));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        let miss = missing.get(&key).cloned().unwrap_or(0);
        out.push(Summary {
            key,
            count,
            missing: miss,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

/// Keep pivoted rows from `cutoff` onward.
pub fn from_year(rows: &[PivotedRow], cutoff: i32) -> Vec<PivotedRow> {
    rows.iter().filter(|r| r.year >= cutoff).cloned().collect()
}

/// Group classified rows by (tier, year): arithmetic mean of the given CTS
/// code over rows that carry it, and the member-row count.
///
/// Rows whose ISO2 code is unclassified are skipped entirely. Output is
/// sorted by (tier, year).
pub fn tier_year_means(rows: &[PivotedRow], cts_code: &str) -> Vec<TierAggregate> {
    let mut groups: BTreeMap<(Tier, i32), (Vec<f64>, usize)> = BTreeMap::new();
    for row in rows {
        let Some(tier) = classify::tier_of(&row.iso2) else {
            continue;
        };
        let (vals, members) = groups.entry((tier, row.year)).or_default();
        *members += 1;
        if let Some(v) = row.value(cts_code) {
            vals.push(v);
        }
    }

    groups
        .into_iter()
        .map(|((tier, year), (vals, members))| TierAggregate {
            tier,
            year,
            mean: if vals.is_empty() {
                None
            } else {
                Some(vals.iter().sum::<f64>() / vals.len() as f64)
            },
            countries: members,
        })
        .collect()
}

/// Slice of the long table feeding the top-emitter chart: the five named
/// countries, raw intensity (ECFLI), years from 2011 on, (country, year)
/// order.
pub fn top_emitter_rows(observations: &[Observation]) -> Vec<Observation> {
    let mut out: Vec<Observation> = observations
        .iter()
        .filter(|o| TOP_EMITTERS.iter().any(|(name, _)| *name == o.country))
        .filter(|o| o.year >= TOP_EMITTER_WINDOW_FROM)
        .filter(|o| o.cts_code == ECFLI)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    out
}
