use cfbl::models::{GroupKey, Observation, PivotedRow, Tier};
use cfbl::stats::{ECFLIN, from_year, grouped_summary, tier_year_means, top_emitter_rows};
use std::collections::BTreeMap;

fn row(country: &str, iso2: &str, year: i32, ecflin: Option<f64>) -> PivotedRow {
    let mut values = BTreeMap::new();
    if let Some(v) = ecflin {
        values.insert(ECFLIN.to_string(), v);
    }
    PivotedRow {
        country: country.into(),
        iso2: iso2.into(),
        iso3: format!("{iso2}X"),
        year,
        values,
    }
}

fn obs(country: &str, code: &str, year: i32, v: Option<f64>) -> Observation {
    Observation {
        country: country.into(),
        iso2: "XX".into(),
        iso3: "XXX".into(),
        indicator: "Carbon footprint of bank loans".into(),
        unit: "Ratio".into(),
        source: "IMF".into(),
        cts_code: code.into(),
        cts_name: "Lending carbon intensity".into(),
        cts_full_descriptor: "Environment; Lending".into(),
        year,
        value: v,
    }
}

#[test]
fn from_year_is_an_inclusive_cutoff() {
    let rows = vec![
        row("Germany", "DE", 2013, Some(1.0)),
        row("Germany", "DE", 2014, Some(2.0)),
        row("Germany", "DE", 2015, Some(3.0)),
        row("Germany", "DE", 2016, Some(4.0)),
    ];
    let kept = from_year(&rows, 2015);
    let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2015, 2016]);
}

#[test]
fn tier_means_average_members_and_count_rows() {
    // Two developed countries in 2018 with ECFLIN 100 and 80.
    let rows = vec![
        row("Germany", "DE", 2018, Some(100.0)),
        row("Japan", "JP", 2018, Some(80.0)),
    ];
    let aggs = tier_year_means(&rows, ECFLIN);
    assert_eq!(aggs.len(), 1);
    let a = &aggs[0];
    assert_eq!(a.tier, Tier::Developed);
    assert_eq!(a.year, 2018);
    assert_eq!(a.mean, Some(90.0));
    assert_eq!(a.countries, 2);
}

#[test]
fn unclassified_rows_fall_out_of_tier_aggregation() {
    let rows = vec![
        row("Germany", "DE", 2018, Some(100.0)),
        row("United States", "US", 2018, Some(500.0)),
        row("Brazil", "BR", 2018, Some(70.0)),
    ];
    let aggs = tier_year_means(&rows, ECFLIN);
    assert_eq!(aggs.len(), 2);
    assert_eq!(aggs[0].tier, Tier::Developed);
    assert_eq!(aggs[0].mean, Some(100.0));
    assert_eq!(aggs[1].tier, Tier::Emerging);
    assert_eq!(aggs[1].mean, Some(70.0));
}

#[test]
fn members_without_a_value_count_but_do_not_enter_the_mean() {
    let rows = vec![
        row("Germany", "DE", 2018, Some(90.0)),
        row("Japan", "JP", 2018, None),
    ];
    let aggs = tier_year_means(&rows, ECFLIN);
    assert_eq!(aggs[0].mean, Some(90.0));
    assert_eq!(aggs[0].countries, 2);
}

#[test]
fn groups_with_no_values_report_no_mean() {
    let rows = vec![row("Germany", "DE", 2018, None)];
    let aggs = tier_year_means(&rows, ECFLIN);
    assert_eq!(aggs.len(), 1);
    assert_eq!(aggs[0].mean, None);
    assert_eq!(aggs[0].countries, 1);
}

#[test]
fn output_is_sorted_by_tier_then_year() {
    let rows = vec![
        row("Brazil", "BR", 2016, Some(1.0)),
        row("Germany", "DE", 2017, Some(1.0)),
        row("Brazil", "BR", 2015, Some(1.0)),
        row("Germany", "DE", 2015, Some(1.0)),
    ];
    let aggs = tier_year_means(&rows, ECFLIN);
    let keys: Vec<(Tier, i32)> = aggs.iter().map(|a| (a.tier, a.year)).collect();
    assert_eq!(
        keys,
        vec![
            (Tier::Developed, 2015),
            (Tier::Developed, 2017),
            (Tier::Emerging, 2015),
            (Tier::Emerging, 2016),
        ]
    );
}

#[test]
fn grouped_stats_handle_missing_and_median_even_odd() {
    // Two groups: (ECFLI, AAA) with values [1,2,3,4] -> median = (2+3)/2 = 2.5
    //             (ECFLI, BBB) with [10, None, 30] -> missing = 1, median = 20
    let mut rows = Vec::new();
    for (year, v) in [(2018, 1.0), (2019, 2.0), (2020, 3.0), (2021, 4.0)] {
        let mut o = obs("Aland", "ECFLI", year, Some(v));
        o.iso3 = "AAA".into();
        rows.push(o);
    }
    for (year, v) in [(2018, Some(10.0)), (2019, None), (2020, Some(30.0))] {
        let mut o = obs("Bland", "ECFLI", year, v);
        o.iso3 = "BBB".into();
        rows.push(o);
    }
    let mut got = grouped_summary(&rows);
    got.sort_by(|a, b| a.key.cmp(&b.key));

    let a = &got[0];
    assert_eq!(
        a.key,
        GroupKey {
            cts_code: "ECFLI".into(),
            iso3: "AAA".into()
        }
    );
    assert_eq!(a.count, 4);
    assert_eq!(a.missing, 0);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert!((a.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((a.median.unwrap() - 2.5).abs() < 1e-9);

    let b = &got[1];
    assert_eq!(b.count, 2);
    assert_eq!(b.missing, 1);
    assert_eq!(b.min, Some(10.0));
    assert_eq!(b.max, Some(30.0));
    assert_eq!(b.mean.unwrap(), 20.0);
    assert_eq!(b.median.unwrap(), 20.0);
}

#[test]
fn top_emitter_slice_filters_name_year_and_code() {
    let rows = vec![
        obs("Kazakhstan, Rep. of", "ECFLI", 2010, Some(1.0)), // year too early
        obs("Kazakhstan, Rep. of", "ECFLI", 2011, Some(2.0)),
        obs("Kazakhstan, Rep. of", "ECFLIN", 2011, Some(3.0)), // wrong code
        obs("Germany", "ECFLI", 2011, Some(4.0)),              // not a top emitter
        obs("Tunisia", "ECFLI", 2018, Some(5.0)),
    ];
    let slice = top_emitter_rows(&rows);
    let keys: Vec<(&str, i32)> = slice.iter().map(|o| (o.country.as_str(), o.year)).collect();
    assert_eq!(keys, vec![("Kazakhstan, Rep. of", 2011), ("Tunisia", 2018)]);
}
