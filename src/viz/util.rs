//! Utility functions for visualization: colors, tick formatting, locale
//! mapping, label-area sizing.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Sequential green-to-deep-blue series palette (light entries first), in the
/// spirit of seaborn's `crest`.
const CREST6: [RGBColor; 6] = [
    RGBColor(151, 201, 163), // light green   (#97C9A3)
    RGBColor(102, 179, 164), // teal green    (#66B3A4)
    RGBColor(70, 150, 164),  // sea teal      (#4696A4)
    RGBColor(47, 120, 158),  // steel blue    (#2F789E)
    RGBColor(38, 88, 141),   // deep blue     (#26588D)
    RGBColor(35, 58, 112),   // navy          (#233A70)
];

/// Get a color from the crest palette.
#[inline]
pub fn series_color(idx: usize) -> RGBAColor {
    CREST6[idx % CREST6.len()].to_rgba()
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Format a Y tick label: grouped integers for large magnitudes, otherwise
/// a precision that tightens as the magnitude grows.
pub fn format_tick(v: f64, locale: &Locale) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        (v.round() as i64).to_formatted_string(locale)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else if a >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Compute a tight left label area width for the Y axis (in pixels), based on
/// the tick labels that will appear over `ymin..ymax` with `ticks` divisions.
pub fn compute_left_label_area_px(
    ymin: f64,
    ymax: f64,
    ticks: usize,
    font_px: u32,
    locale: &Locale,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        let s = format_tick(v, locale);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }

    // Tick marks plus a little breathing room, clamped against extremes.
    let with_padding = max_px.saturating_add(18);
    with_padding.clamp(48, 140)
}
