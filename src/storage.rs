use crate::models::{Observation, TierAggregate};
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save the long table as CSV with header.
pub fn save_csv<P: AsRef<Path>>(observations: &[Observation], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "country",
        "iso2",
        "iso3",
        "indicator",
        "unit",
        "source",
        "cts_code",
        "cts_name",
        "cts_full_descriptor",
        "year",
        "value",
    ))?;
    for o in observations {
        wtr.serialize((
            &o.country,
            &o.iso2,
            &o.iso3,
            &o.indicator,
            &o.unit,
            &o.source,
            &o.cts_code,
            &o.cts_name,
            &o.cts_full_descriptor,
            o.year,
            o.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the long table as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(observations: &[Observation], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(observations)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save tier/year aggregates as CSV with header.
pub fn save_aggregates_csv<P: AsRef<Path>>(aggregates: &[TierAggregate], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("tier", "year", "mean", "countries"))?;
    for a in aggregates {
        wtr.serialize((a.tier.to_string(), a.year, a.mean, a.countries))?;
    }
    wtr.flush()?;
    Ok(())
}
