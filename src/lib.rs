//! cfbl
//!
//! A lightweight Rust library for loading, reshaping, summarizing, and
//! charting the IMF "Carbon Footprint of Bank Loans" dataset. Pairs with the
//! `cfbl` CLI.
//!
//! ### Features
//! - Load the wide-format CSV (one column per year) into memory
//! - Melt to a tidy long table and pivot CTS indicator codes into columns
//! - Classify countries into development tiers and average by (tier, year)
//! - Quick summary statistics (min, max, mean, median)
//! - Generate the two annotated SVG/PNG charts
//!
//! ### Example
//! ```no_run
//! let wide = cfbl::dataset::load_csv("dataset/22_Carbon_Footprint_of_Bank_Loans.csv")?;
//! let long = cfbl::reshape::melt(&wide);
//! let pivoted = cfbl::reshape::pivot(&long)?;
//! let recent = cfbl::stats::from_year(&pivoted, 2015);
//! let means = cfbl::stats::tier_year_means(&recent, cfbl::stats::ECFLIN);
//! cfbl::viz::tier_trend_chart(&means, "tier_trends.svg", 1000, 600)?;
//! cfbl::viz::top_emitter_chart(&long, "top_emitters.svg", 800, 600)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod classify;
pub mod dataset;
pub mod models;
pub mod reshape;
pub mod stats;
pub mod storage;
pub mod viz;

pub use models::{GroupKey, Observation, PivotedRow, Tier, TierAggregate, WideRecord};
