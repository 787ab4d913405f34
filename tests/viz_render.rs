use cfbl::models::{Observation, Tier, TierAggregate};
use cfbl::viz;
use std::fs;
use std::path::PathBuf;

fn sample_aggregates() -> Vec<TierAggregate> {
    let mut out = Vec::new();
    for (year, dev, emg) in [
        (2015, 100.0, 100.0),
        (2016, 96.0, 93.5),
        (2017, 90.5, 88.0),
        (2018, 85.0, 82.0),
    ] {
        out.push(TierAggregate {
            tier: Tier::Developed,
            year,
            mean: Some(dev),
            countries: 18,
        });
        out.push(TierAggregate {
            tier: Tier::Emerging,
            year,
            mean: Some(emg),
            countries: 18,
        });
    }
    out
}

fn sample_observations() -> Vec<Observation> {
    let mut out = Vec::new();
    for (country, iso2, iso3, base) in [
        ("Kazakhstan, Rep. of", "KZ", "KAZ", 400.0),
        ("Tunisia", "TN", "TUN", 150.0),
        ("Philippines", "PH", "PHL", 220.0),
    ] {
        for (i, year) in (2011..=2018).enumerate() {
            out.push(Observation {
                country: country.into(),
                iso2: iso2.into(),
                iso3: iso3.into(),
                indicator: "Carbon footprint of bank loans".into(),
                unit: "Tons per 1mil USD".into(),
                source: "IMF".into(),
                cts_code: "ECFLI".into(),
                cts_name: "Lending carbon intensity".into(),
                cts_full_descriptor: "Environment; Lending".into(),
                year,
                value: Some(base + 12.0 * i as f64),
            });
        }
    }
    out
}

fn write_and_check<F: Fn(&PathBuf)>(maker: F, name: &str, ext: &str) {
    let tmp = std::env::temp_dir();
    let path: PathBuf = tmp.join(format!("cfbl_viz_{name}.{ext}"));
    maker(&path);
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "chart has content");
    fs::remove_file(&path).ok();
}

#[test]
fn tier_trend_chart_produces_svg_and_png() {
    let aggs = sample_aggregates();
    for ext in ["svg", "png"] {
        write_and_check(
            |p| viz::tier_trend_chart(&aggs, p, 1000, 600).unwrap(),
            "tiers",
            ext,
        );
    }
}

#[test]
fn top_emitter_chart_produces_svg_and_png() {
    let obs = sample_observations();
    for ext in ["svg", "png"] {
        write_and_check(
            |p| viz::top_emitter_chart(&obs, p, 800, 600).unwrap(),
            "emitters",
            ext,
        );
    }
}

#[test]
fn empty_aggregates_is_an_error() {
    let tmp = std::env::temp_dir().join("cfbl_viz_empty_aggs.svg");
    assert!(viz::tier_trend_chart(&[], &tmp, 800, 480).is_err());
}

#[test]
fn observations_without_top_emitters_are_an_error() {
    let mut obs = sample_observations();
    for o in &mut obs {
        o.country = "Germany".into();
    }
    let tmp = std::env::temp_dir().join("cfbl_viz_empty_emitters.svg");
    assert!(viz::top_emitter_chart(&obs, &tmp, 800, 480).is_err());
}

#[test]
fn missing_comparison_year_is_an_error() {
    // Means stop in 2017, so the 2018 annotation lookup must fail.
    let aggs: Vec<TierAggregate> = sample_aggregates()
        .into_iter()
        .filter(|a| a.year < 2018)
        .collect();
    let tmp = std::env::temp_dir().join("cfbl_viz_no_2018.svg");
    assert!(viz::tier_trend_chart(&aggs, &tmp, 800, 480).is_err());
}

#[test]
fn locale_variant_renders() {
    let aggs = sample_aggregates();
    write_and_check(
        |p| viz::tier_trend_chart_locale(&aggs, p, 1000, 600, "de").unwrap(),
        "tiers_de",
        "svg",
    );
}
