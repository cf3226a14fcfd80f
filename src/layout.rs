//! Layout engine: packs accepted oscillators into one composite grid.
//!
//! Records are grouped by period. Each group gets a numeral label and is
//! packed into rows of at most `row_width` cells; rows stack into columns of
//! at most `column_height` cells, and columns are laid out left to right:
//!
//! ```text
//!  region 0                         region 1
//! ┌──────┬───────────────────────┐ ┌──────┬───────────────────────┐
//! │ [1]  │ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ │ │ [15] │ ▣   ▣   ▣   ▣         │
//! │ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫ ▫│ │ ▣   ▣   ▣   ▣   ▣   ▣     │
//! │ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪│ │ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ ▪ │
//! │ [2]  │ ▪▪ ▪▪ ▪▪ ▪▪ ▪▪ ▪▪ ▪▪  │ │ [30] │ ▦     ▦     ▦       │
//! │  ...                         │ │  ...                       │
//! └──────────────────────────────┘ └────────────────────────────┘
//!   gutter │ row_width                3 dead columns between regions
//! ```
//!
//! Every pattern reserves its envelope (the box over all its phases) plus
//! the group's spacing, so no two patterns ever interact when the finished
//! grid is run.
//!
//! Submodules:
//!
//! - `context.rs`: the packing state machine and column materialisation.
//! - `glyphs.rs`: still-life digits and the spacer block.
//! - `grid.rs`: the sparse output grid.

#[path = "layout/context.rs"]
mod context;
#[path = "layout/glyphs.rs"]
mod glyphs;
#[path = "layout/grid.rs"]
mod grid;

pub use glyphs::label_width;
pub use grid::{CellState, OutputGrid};

use crate::{BoundingBox, ClassificationRecord};
use context::LayoutContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Maximum row width right of the label gutter.
    pub row_width: i64,
    /// Maximum column height.
    pub column_height: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig { row_width: 150, column_height: 1300 }
    }
}

/// Where one record ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementEntry {
    /// Index into the record slice given to [`pack`].
    pub record: usize,
    pub period: u64,
    /// Translation applied to the record's canonical cells.
    pub x: i64,
    pub y: i64,
    /// Row within the period group.
    pub row: usize,
    /// Position within the row.
    pub column: usize,
    /// Column region the record was placed in, counted from the left.
    pub column_region: usize,
    /// Envelope reserved for the record.
    pub footprint: BoundingBox,
}

/// Viewer label for one placed record, in grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMetadata {
    pub center_x: i64,
    pub center_y: i64,
    pub zoom: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub grid: OutputGrid,
    /// In placement order: column by column, top to bottom.
    pub placements: Vec<PlacementEntry>,
    /// One per placement, same order.
    pub labels: Vec<LabelMetadata>,
    /// Number of column regions used.
    pub columns: usize,
    /// Distinct periods, ascending.
    pub periods: Vec<u64>,
}

/// Gap kept around a pattern on both axes.
pub fn spacing(period: u64) -> i64 {
    match period {
        1 => 3,
        2 | 3 => 4,
        4..=9 => 5,
        _ => 7,
    }
}

/// Viewer zoom that shows a pattern of `width` cells comfortably.
pub fn zoom_hint(width: i64) -> u32 {
    const ZOOMS: [u32; 11] = [20, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6];
    let bucket = (width.max(1) - 1) / 5;
    usize::try_from(bucket).ok().and_then(|b| ZOOMS.get(b)).copied().unwrap_or(5)
}

/// Order in which records are placed.
///
/// Stable sort by (period, envelope height); small still lifes and p2
/// oscillators are then ordered by population, capped so that larger ones
/// keep their height order.
fn placement_order(records: &[ClassificationRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| (records[i].period, records[i].height));
    order.sort_by_key(|&i| {
        let record = &records[i];
        let cap = match record.period {
            1 => 11,
            2 => 15,
            _ => 0,
        };
        (record.period, record.population().min(cap))
    });
    order
}

/// Pack `records` into a composite grid.
pub fn pack(records: &[ClassificationRecord], config: &LayoutConfig) -> Layout {
    let order = placement_order(records);
    let mut context = LayoutContext::new(records, config.clone());

    for group in order.chunk_by(|&a, &b| records[a].period == records[b].period) {
        context.pack_group(records[group[0]].period, group);
    }

    let layout = context.finish();
    tracing::info!(
        records = records.len(),
        periods = layout.periods.len(),
        columns = layout.columns,
        population = layout.grid.population(),
        "packed catalog"
    );
    layout
}
