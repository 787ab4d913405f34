//! Visualization: render the two lending-carbon-intensity charts to **SVG** or **PNG**.
//!
//! - Crest-style sequential series palette
//! - Locale-aware tick labels, whole-number year axis
//! - Non-overlapping bottom legend band with word wrapping
//! - Arrow-connected numeric annotations next to the final data points

pub mod annotate;
pub mod legend;
pub mod text;
pub mod util;

use crate::models::{Observation, Tier, TierAggregate};
use crate::{classify, stats};
use anyhow::{Result, anyhow};
use num_format::Locale;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use annotate::{Annotation, absolute_change_label, draw_annotation, percent_change_label};
use legend::{draw_bottom_legend, estimate_bottom_legend_height_px};
use text::wrap_text_to_width;
use util::{compute_left_label_area_px, format_tick, map_locale, series_color};

/// Year the ECFLIN series is normalized against (index value 100).
const BASELINE_YEAR: i32 = 2015;
/// Year both charts annotate against the baseline.
const COMPARISON_YEAR: i32 = 2018;
/// Index value of the normalized series in the baseline year.
const NORMALIZED_BASELINE: f64 = 100.0;

const MARGIN: u32 = 16;
/// Extra right margin so annotation text placed past the last year stays on
/// the canvas.
const ANNOTATION_GUTTER: u32 = 150;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Mean normalized lending carbon intensity by development tier, 2015 on,
/// with percentage-change annotations against the 2015 = 100 baseline.
/// Output format follows the file extension (`.svg`, else bitmap).
pub fn tier_trend_chart<P: AsRef<Path>>(
    aggregates: &[TierAggregate],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    tier_trend_chart_locale(aggregates, out_path, width, height, "en")
}

/// Same as [`tier_trend_chart`] with a locale tag for tick label formatting.
pub fn tier_trend_chart_locale<P: AsRef<Path>>(
    aggregates: &[TierAggregate],
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    if aggregates.is_empty() {
        return Err(anyhow!("no aggregates to plot"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let (locale, _) = map_locale(locale_tag);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_tier_trends(root, aggregates, locale)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_tier_trends(root, aggregates, locale)?;
    }
    Ok(())
}

/// Raw lending carbon intensity (ECFLI) for the five top-emitting emerging
/// economies, 2011 on, with per-country absolute-change annotations. Takes
/// the full long table and selects the slice itself.
pub fn top_emitter_chart<P: AsRef<Path>>(
    observations: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    top_emitter_chart_locale(observations, out_path, width, height, "en")
}

/// Same as [`top_emitter_chart`] with a locale tag for tick label formatting.
pub fn top_emitter_chart_locale<P: AsRef<Path>>(
    observations: &[Observation],
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    let rows = stats::top_emitter_rows(observations);
    if rows.is_empty() {
        return Err(anyhow!("no top-emitter rows to plot"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let (locale, _) = map_locale(locale_tag);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_top_emitters(root, &rows, locale)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_top_emitters(root, &rows, locale)?;
    }
    Ok(())
}

/// Pixel height needed for the headline + subtitle block.
fn title_block_height_px(headline: &str, subtitle: &str, total_w: u32) -> i32 {
    let wrap_w = total_w.saturating_sub(2 * MARGIN);
    let h_lines = wrap_text_to_width(headline, 20, wrap_w).len() as i32;
    let s_lines = wrap_text_to_width(subtitle, 13, wrap_w).len() as i32;
    10 + h_lines * 24 + 6 + s_lines * 16 + 8
}

/// Draw centered headline and subtitle lines into the title band.
fn draw_title_block<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    headline: &str,
    subtitle: &str,
) -> Result<()> {
    let (w, _) = area.dim_in_pixel();
    let wrap_w = w.saturating_sub(2 * MARGIN);
    let center_x = w as i32 / 2;

    let headline_style = TextStyle::from((FontFamily::SansSerif, 20))
        .pos(Pos::new(HPos::Center, VPos::Top));
    let subtitle_style = TextStyle::from((FontFamily::SansSerif, 13))
        .color(&RGBColor(90, 90, 90))
        .pos(Pos::new(HPos::Center, VPos::Top));

    let mut y = 10;
    for line in wrap_text_to_width(headline, 20, wrap_w) {
        area.draw(&Text::new(line, (center_x, y), headline_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += 24;
    }
    y += 6;
    for line in wrap_text_to_width(subtitle, 13, wrap_w) {
        area.draw(&Text::new(line, (center_x, y), subtitle_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += 16;
    }
    Ok(())
}

fn draw_tier_trends<DB>(
    root: DrawingArea<DB, Shift>,
    aggregates: &[TierAggregate],
    locale: &Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    // Series per tier, valued years only, year order guaranteed by sorting.
    let mut series: BTreeMap<Tier, Vec<(i32, f64)>> = BTreeMap::new();
    for a in aggregates {
        if let Some(mean) = a.mean {
            series.entry(a.tier).or_default().push((a.year, mean));
        }
    }
    for pts in series.values_mut() {
        pts.sort_by_key(|(y, _)| *y);
    }
    if series.is_empty() {
        return Err(anyhow!("no numeric values to plot"));
    }

    let years: Vec<i32> = series.values().flatten().map(|(y, _)| *y).collect();
    let (mut min_year, mut max_year) = (
        *years.iter().min().ok_or_else(|| anyhow!("no valid years"))?,
        *years.iter().max().ok_or_else(|| anyhow!("no valid years"))?,
    );
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    let values: Vec<f64> = series.values().flatten().map(|(_, v)| *v).collect();
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let (root_w, root_h) = root.dim_in_pixel();

    let headline =
        "Decreasing Economic Investment in Carbon Emission in Both Developing and Emerging Countries";
    let subtitle = "Time based trend of the mean normalized ratio of metric tons of CO2 emitted per 1million USD by development level.";
    let title_h = title_block_height_px(headline, subtitle, root_w);

    let left_label_width_px = compute_left_label_area_px(min_val, max_val, 10, 12, locale);
    let axis_x_start_px = MARGIN as i32 + left_label_width_px as i32;

    // Legend band lists each tier with its full membership.
    let legend_labels: Vec<String> = series
        .keys()
        .map(|tier| format!("{tier}: {}", classify::members(*tier).join(", ")))
        .collect();
    let legend_h = estimate_bottom_legend_height_px(&legend_labels, axis_x_start_px, root_w as i32);

    let (title_area, rest) = root.split_vertically(title_h);
    let rest_h = root_h as i32 - title_h;
    let (plot_area, legend_area) = rest.split_vertically((rest_h - legend_h).max(40));

    draw_title_block(&title_area, headline, subtitle)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .margin_right(ANNOTATION_GUTTER)
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(
            (min_year as f64)..(max_year as f64),
            min_val..max_val,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format_tick(*v, locale);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Ratio of tons CO2 per 1mil USD loaned (2015 = 100)")
        .x_labels(((max_year - min_year + 1) as usize).min(12))
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let mut legend_items: Vec<(String, RGBAColor)> = Vec::new();
    for (idx, (tier, pts)) in series.iter().enumerate() {
        // Spread the two tiers across the palette for contrast.
        let color = series_color(idx * 3);
        let pts_f: Vec<(f64, f64)> = pts.iter().map(|(y, v)| (*y as f64, *v)).collect();

        chart
            .draw_series(LineSeries::new(
                pts_f.clone(),
                ShapeStyle {
                    color,
                    filled: false,
                    stroke_width: 2,
                },
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        // Square markers on every point.
        chart
            .draw_series(pts_f.iter().map(|(x, y)| {
                EmptyElement::at((*x, *y)) + Rectangle::new([(-3, -3), (3, 3)], color.filled())
            }))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        legend_items.push((
            format!("{tier}: {}", classify::members(*tier).join(", ")),
            color,
        ));
    }

    // Percentage change vs the 2015 = 100 baseline at the comparison year.
    for tier in series.keys() {
        let mean = aggregates
            .iter()
            .find(|a| a.tier == *tier && a.year == COMPARISON_YEAR)
            .and_then(|a| a.mean)
            .ok_or_else(|| anyhow!("no {tier} mean for {COMPARISON_YEAR}"))?;
        let label = percent_change_label(BASELINE_YEAR, NORMALIZED_BASELINE, mean);
        let annotation = Annotation::new(&label, (COMPARISON_YEAR as f64, mean), (26, 0));
        draw_annotation(&chart, &root, &annotation)?;
    }

    draw_bottom_legend(&legend_area, &legend_items, axis_x_start_px)?;

    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_top_emitters<DB>(
    root: DrawingArea<DB, Shift>,
    rows: &[Observation],
    locale: &Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    // Group by country, keeping the literal top-emitter ordering for hues.
    let mut by_country: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for o in rows {
        if let Some(v) = o.value {
            by_country.entry(o.country.as_str()).or_default().push((o.year, v));
        }
    }
    for pts in by_country.values_mut() {
        pts.sort_by_key(|(y, _)| *y);
    }

    let ordered: Vec<(&str, &str, Vec<(i32, f64)>)> = stats::TOP_EMITTERS
        .iter()
        .filter_map(|(name, display)| {
            by_country.get(*name).map(|pts| (*name, *display, pts.clone()))
        })
        .collect();
    if ordered.is_empty() {
        return Err(anyhow!("no numeric values to plot"));
    }

    let years: Vec<i32> = ordered.iter().flat_map(|(_, _, pts)| pts.iter().map(|(y, _)| *y)).collect();
    let (mut min_year, mut max_year) = (
        *years.iter().min().ok_or_else(|| anyhow!("no valid years"))?,
        *years.iter().max().ok_or_else(|| anyhow!("no valid years"))?,
    );
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    let values: Vec<f64> = ordered.iter().flat_map(|(_, _, pts)| pts.iter().map(|(_, v)| *v)).collect();
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let (root_w, _root_h) = root.dim_in_pixel();

    let headline = "Increasing Carbon Footprint of Bank Loans in Key Emerging Economies";
    let subtitle =
        "Time based trend of raw emission for amount loaned in top emitters of emerging countries.";
    let title_h = title_block_height_px(headline, subtitle, root_w);

    let left_label_width_px = compute_left_label_area_px(min_val, max_val, 10, 12, locale);

    let (title_area, plot_area) = root.split_vertically(title_h);
    draw_title_block(&title_area, headline, subtitle)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .margin_right(ANNOTATION_GUTTER)
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(
            (min_year as f64)..(max_year as f64),
            min_val..max_val,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format_tick(*v, locale);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Metric Carbon Tons per $1M USD Loaned")
        .x_labels(((max_year - min_year + 1) as usize).min(12))
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    for (idx, (_, display, pts)) in ordered.iter().enumerate() {
        let color = series_color(idx);
        let pts_f: Vec<(f64, f64)> = pts.iter().map(|(y, v)| (*y as f64, *v)).collect();

        // Soft line under opaque markers, matching the source figure.
        let elem = chart
            .draw_series(LineSeries::new(
                pts_f.clone(),
                ShapeStyle {
                    color: color.mix(0.5),
                    filled: false,
                    stroke_width: 2,
                },
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let legend_color = color;
        elem.label(*display)
            .legend(move |(x, y)| Circle::new((x + 8, y), 4, legend_color.filled()));

        chart
            .draw_series(
                pts_f
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 3, color.filled())),
            )
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    // Absolute change between the window start and the comparison year.
    for (name, _, pts) in &ordered {
        let value_in = |year: i32| {
            pts.iter()
                .find(|(y, _)| *y == year)
                .map(|(_, v)| *v)
                .ok_or_else(|| anyhow!("no {} value for {name} in {year}", stats::ECFLI))
        };
        let first = value_in(stats::TOP_EMITTER_WINDOW_FROM)?;
        let last = value_in(COMPARISON_YEAR)?;
        let label = absolute_change_label(last - first);
        let annotation = Annotation::new(&label, (COMPARISON_YEAR as f64, last), (30, 0));
        draw_annotation(&chart, &root, &annotation)?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 13))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
