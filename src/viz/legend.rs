//! Bottom legend band: marker + wrapped label blocks flowing left to right,
//! breaking to a new row when the band width is exhausted.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, wrap_text_to_width};

const FONT_PX: u32 = 13;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD: i32 = 8;
const MARKER_RADIUS: i32 = 4;
const MARKER_TO_TEXT: i32 = 12;
const TRAILING_GAP: i32 = 14;

struct Block {
    item: usize,
    x: i32,
    lines: Vec<String>,
}

struct Layout {
    rows: Vec<Vec<Block>>,
    height: i32,
}

/// Greedy left-to-right flow shared by the height estimate and the draw pass,
/// so the two can never disagree.
fn flow_layout(labels: &[String], start_x: i32, total_w: i32) -> Layout {
    let overhead = MARKER_TO_TEXT + MARKER_RADIUS + TRAILING_GAP;
    let right_edge = total_w - PAD;

    let mut rows: Vec<Vec<Block>> = vec![Vec::new()];
    let mut x = start_x;
    for (item, label) in labels.iter().enumerate() {
        let mut cap = (right_edge - x - overhead).max(40) as u32;
        let mut lines = wrap_text_to_width(label, FONT_PX, cap);
        let mut block_w = overhead
            + lines
                .iter()
                .map(|l| estimate_text_width_px(l, FONT_PX) as i32)
                .max()
                .unwrap_or(0);

        // Does not fit on the current row: restart at a fresh row with the
        // full band width available.
        if x + block_w > right_edge && !rows.last().map(Vec::is_empty).unwrap_or(true) {
            rows.push(Vec::new());
            x = start_x;
            cap = (right_edge - x - overhead).max(40) as u32;
            lines = wrap_text_to_width(label, FONT_PX, cap);
            block_w = overhead
                + lines
                    .iter()
                    .map(|l| estimate_text_width_px(l, FONT_PX) as i32)
                    .max()
                    .unwrap_or(0);
        }

        rows.last_mut().expect("at least one row").push(Block { item, x, lines });
        x += block_w;
    }

    let mut height = PAD;
    for (ri, row) in rows.iter().enumerate() {
        let row_h = row
            .iter()
            .map(|b| b.lines.len().max(1) as i32 * LINE_H)
            .max()
            .unwrap_or(LINE_H);
        height += row_h;
        if ri + 1 < rows.len() {
            height += ROW_GAP;
        }
    }
    Layout {
        rows,
        height: height + PAD,
    }
}

/// How tall the bottom band must be to fit all labels without clipping.
pub fn estimate_bottom_legend_height_px(labels: &[String], start_x: i32, total_w: i32) -> i32 {
    flow_layout(labels, start_x, total_w).height.max(40)
}

/// Draw the band. `start_x` aligns the first column with the plot's X axis.
pub fn draw_bottom_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    start_x: i32,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (w, _) = area.dim_in_pixel();
    let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
    let layout = flow_layout(&labels, start_x, w as i32);

    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = PAD;
    for row in &layout.rows {
        let row_h = row
            .iter()
            .map(|b| b.lines.len().max(1) as i32 * LINE_H)
            .max()
            .unwrap_or(LINE_H);
        for block in row {
            let color = &items[block.item].1;
            let marker_x = block.x + MARKER_RADIUS;
            area.draw(&Circle::new(
                (marker_x, y + row_h / 2),
                MARKER_RADIUS,
                color.clone().filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            let text_x = block.x + MARKER_RADIUS + MARKER_TO_TEXT;
            let block_h = block.lines.len().max(1) as i32 * LINE_H;
            let top = y + (row_h - block_h) / 2;
            for (i, line) in block.lines.iter().enumerate() {
                area.draw(&Text::new(
                    line.as_str(),
                    (text_x, top + i as i32 * LINE_H + LINE_H / 2),
                    label_style.clone(),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
        y += row_h + ROW_GAP;
    }
    Ok(())
}
