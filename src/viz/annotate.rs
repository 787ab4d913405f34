//! Numeric annotations: difference labels plus arrow-connected text placed
//! next to a data point.

use anyhow::Result;
use plotters::chart::ChartContext;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Label for a change relative to a baseline-year value on a 100-normalized
/// scale, e.g. baseline 100 vs value 82 reads `-18% compared\nto 2015`.
pub fn percent_change_label(baseline_year: i32, baseline: f64, value: f64) -> String {
    format!("{:+.0}% compared\nto {}", value - baseline, baseline_year)
}

/// Label for an absolute change in raw lending carbon intensity.
pub fn absolute_change_label(diff: f64) -> String {
    format!("{diff:+.0} Tons per 1mil USD")
}

/// Annotation text anchored to a data point, offset by whole pixels.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub lines: Vec<String>,
    /// Data coordinates of the annotated point.
    pub at: (f64, f64),
    /// Pixel offset from the point to the start of the text block.
    pub offset: (i32, i32),
}

impl Annotation {
    pub fn new(text: &str, at: (f64, f64), offset: (i32, i32)) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            at,
            offset,
        }
    }
}

const FONT_PX: u32 = 12;
const LINE_H: i32 = FONT_PX as i32 + 2;

/// Draw one annotation: text block plus an arrow from the text toward the
/// point. `root` must be the full-canvas drawing area so that backend pixel
/// coordinates line up.
pub fn draw_annotation<DB: DrawingBackend>(
    chart: &ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    root: &DrawingArea<DB, Shift>,
    annotation: &Annotation,
) -> Result<()> {
    let (px, py) = chart.backend_coord(&annotation.at);
    let (tx, ty) = (px + annotation.offset.0, py + annotation.offset.1);

    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Center));
    let n = annotation.lines.len() as i32;
    // Vertically center the block on the anchor row.
    let top = ty - (n - 1) * LINE_H / 2;
    for (i, line) in annotation.lines.iter().enumerate() {
        root.draw(&Text::new(
            line.as_str(),
            (tx, top + i as i32 * LINE_H),
            style.clone(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    // Arrow runs from the text edge to just short of the marker.
    let side = if annotation.offset.0 >= 0 { 1.0 } else { -1.0 };
    let start = ((tx as f64) - side * 4.0, ty as f64);
    let tip = ((px as f64) + side * 7.0, py as f64);
    let (dx, dy) = (tip.0 - start.0, tip.1 - start.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return Ok(());
    }
    let (ux, uy) = (dx / len, dy / len);

    // Shaft stops where the arrowhead begins.
    let base = (tip.0 - 7.0 * ux, tip.1 - 7.0 * uy);
    root.draw(&PathElement::new(
        vec![
            (start.0 as i32, start.1 as i32),
            (base.0 as i32, base.1 as i32),
        ],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (nx, ny) = (-uy, ux);
    let head = vec![
        (tip.0 as i32, tip.1 as i32),
        ((base.0 + 3.0 * nx) as i32, (base.1 + 3.0 * ny) as i32),
        ((base.0 - 3.0 * nx) as i32, (base.1 - 3.0 * ny) as i32),
    ];
    root.draw(&Polygon::new(head, BLACK.filled()))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
