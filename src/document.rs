//! Document assembly.
//!
//! Produces the final catalog text in four parts:
//!
//! ```text
//! #N Oscillator stamp collection          legend (legend.rs)
//! #O ..., updated Aug 04, 2023
//! #C ...
//! #C 2.0.0 blinker [JHC 3/70]              one entry per placement
//! #C       Example of "+c*c" symmetry.     comments aligned under the name
//! #C ----------------------------------    before each new period
//! x = 312, y = 1300, rule = B3/S23         the grid, 70 columns wide
//! ...!
//! #C [[ COLOR LABEL Yellow ... ]]          viewer directives
//! #C [[ LABEL 11 1 20 "blinker\n[JHC 3/70]" ]]
//! ```
//!
//! Label coordinates are relative to the top-left live cell of the grid,
//! which is where a viewer puts the origin when it loads the document.

#[path = "document/legend.rs"]
mod legend;

pub use legend::Legend;

use crate::codec::encode_wrapped;
use crate::layout::Layout;
use crate::ClassificationRecord;
use chrono::NaiveDate;

/// Body line width of the serialized grid.
const GRID_LINE_WIDTH: usize = 70;

const SEPARATOR_WIDTH: usize = 70;

const LABEL_STYLE: &str =
    "#C [[ COLOR LABEL Yellow LABELSIZE 30 LABELALPHA .75 LABELVIEWDIST 20 LABELZOOMRANGE 1 64 LABELANGLE 330 ]]";

/// Assemble the catalog document for `layout`, which must have been packed
/// from `records`.
pub fn assemble(records: &[ClassificationRecord], layout: &Layout, legend: &Legend, date: NaiveDate) -> String {
    let mut lines = legend.lines(date, &summary(records, layout));
    lines.extend(entry_lines(records, layout));

    let live = layout.grid.live_pattern();
    lines.push(encode_wrapped(&live.normalized(), GRID_LINE_WIDTH));

    if let Some(origin) = live.bounding_box() {
        if !layout.labels.is_empty() {
            lines.push(LABEL_STYLE.to_string());
        }
        for label in &layout.labels {
            lines.push(format!(
                "#C [[ LABEL {} {} {} \"{}\" ]]",
                label.center_x - origin.min_x,
                label.center_y - origin.min_y,
                label.zoom,
                label.text
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn summary(records: &[ClassificationRecord], layout: &Layout) -> String {
    match (layout.periods.first(), layout.periods.last()) {
        (Some(low), Some(high)) => format!(
            "A collection of {} oscillators of {} different periods from {low} to {high}.",
            records.len(),
            layout.periods.len()
        ),
        _ => "An empty collection.".to_string(),
    }
}

/// `#C period.row.column name [originator]` plus aligned comment lines.
fn entry_lines(records: &[ClassificationRecord], layout: &Layout) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous_period = None;

    for placement in &layout.placements {
        if previous_period.is_some_and(|p| p != placement.period) {
            lines.push(format!("#C {}", "-".repeat(SEPARATOR_WIDTH)));
        }
        previous_period = Some(placement.period);

        let annotation = &records[placement.record].annotation;
        let label = format!("{}.{}.{}", placement.period, placement.row, placement.column);

        let mut line = format!("#C {label}");
        if let Some(name) = &annotation.name {
            line.push(' ');
            line.push_str(name);
        }
        if let Some(originator) = &annotation.originator {
            line.push_str(&format!(" [{originator}]"));
        }
        lines.push(line);

        let indent = " ".repeat(label.len() + 2);
        lines.extend(annotation.comments.iter().map(|comment| format!("#C{indent}{comment}")));
    }

    lines
}
