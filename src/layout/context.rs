//! Packing state.
//!
//! Everything the packer mutates lives in one [`LayoutContext`]. Pieces of
//! the column being built are kept in column-local coordinates (origin at the
//! right edge of the label gutter, y = 0 at the column top) and only written
//! to the output grid when the column closes:
//!
//! ```text
//!        -gutter        0                                row_width
//!   y=0   [1][5]  ┌──────┐ ┌──┐ ┌────┐                      │   band 0
//!                 └──────┘ └──┘ └────┘                      │
//!         ┌───┐ ┌─────┐ ┌──┐                                │   band 1
//!         └───┘ └─────┘ └──┘                                │
//!         ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪  ▪    │   spacers
//!         [3][0]  ┌────────┐ ┌────────┐                     │   band 2
//! ```
//!
//! A band is one row of the column. On close, band `r` moves down by
//! `r × stretch` so the column fills its height.

use super::glyphs::{self, GLYPH_HEIGHT, SPACER_PITCH, SPACER_SIZE, label_width};
use super::grid::OutputGrid;
use super::{LabelMetadata, Layout, LayoutConfig, PlacementEntry, spacing, zoom_hint};
use crate::{BoundingBox, ClassificationRecord, Pattern};

/// Rows between the bottom of a column's content and the next period label.
const LABEL_GAP: i64 = 7;
/// Spacer row offset above a label.
const SPACER_RISE: i64 = 4;
/// Rows below a label top where content may run under the label gutter.
const LABEL_CLEARANCE: i64 = 16;
/// Dead columns between two column regions.
const COLUMN_GAP: i64 = 3;

#[derive(Debug, Clone, Copy)]
enum PieceKind {
    Digit(u8),
    Spacer,
    Stamp { record: usize, row: usize, column: usize },
}

/// Something waiting to be stamped, in column-local coordinates.
#[derive(Debug, Clone, Copy)]
struct Piece {
    kind: PieceKind,
    period: u64,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    band: usize,
}

/// How far a group got before the column ran out.
enum Fill {
    Done,
    /// The group started below other content; take it all back.
    Withdraw,
    /// The group started at the top; the first `n` items stay.
    Split(usize),
}

/// Column state to return to when a group is withdrawn.
struct Mark {
    pieces: usize,
    bands: usize,
    bottom: i64,
    gutter: i64,
    right: i64,
    group_rows: usize,
}

pub(crate) struct LayoutContext<'a> {
    records: &'a [ClassificationRecord],
    config: LayoutConfig,
    grid: OutputGrid,
    placements: Vec<PlacementEntry>,
    labels: Vec<LabelMetadata>,
    periods: Vec<u64>,

    // --- Current column ---
    region: usize,
    region_x: i64,
    column: Vec<Piece>,
    bands: usize,
    /// First row below everything placed in the column.
    bottom: i64,
    /// Widest label in the column.
    gutter: i64,
    /// Right edge of the column; wider than `row_width` after an overflow.
    right: i64,

    // --- Current group ---
    label_y: i64,
    label_width: i64,
    /// Rows of the current period group so far, across columns.
    group_rows: usize,

    // --- Pending row ---
    row: Vec<Piece>,
    row_y: i64,
    cursor_x: i64,
    row_height: i64,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(records: &'a [ClassificationRecord], config: LayoutConfig) -> Self {
        let right = config.row_width;
        LayoutContext {
            records,
            config,
            grid: OutputGrid::new(),
            placements: Vec::new(),
            labels: Vec::new(),
            periods: Vec::new(),
            region: 0,
            region_x: 0,
            column: Vec::new(),
            bands: 0,
            bottom: 0,
            gutter: 0,
            right,
            label_y: 0,
            label_width: 0,
            group_rows: 0,
            row: Vec::new(),
            row_y: 0,
            cursor_x: 0,
            row_height: 0,
        }
    }

    /// Pack one period group. `items` index into the record slice, already
    /// in placement order.
    pub(crate) fn pack_group(&mut self, period: u64, items: &[usize]) {
        self.periods.push(period);
        self.group_rows = 0;
        let mut remaining = items;

        while !remaining.is_empty() {
            let began_at_top = self.column.is_empty();
            let mark = self.mark();
            self.open_group(period, remaining);

            match self.fill_rows(period, remaining, began_at_top) {
                Fill::Done => {
                    self.close_row(period);
                    return;
                }
                Fill::Withdraw => {
                    tracing::debug!(period, region = self.region, "group does not fit below; moving to a new column");
                    self.restore(mark);
                    self.close_column();
                }
                Fill::Split(placed) => {
                    tracing::debug!(period, placed, region = self.region, "group continues in a new column");
                    self.close_row(period);
                    self.close_column();
                    remaining = &remaining[placed..];
                }
            }
        }
    }

    /// Close the last column and hand over the result.
    pub(crate) fn finish(mut self) -> Layout {
        self.close_column();
        Layout {
            grid: self.grid,
            placements: self.placements,
            labels: self.labels,
            columns: self.region,
            periods: self.periods,
        }
    }

    // --- Groups and rows ---

    /// Place the label (and the spacer row when below other content) and set
    /// the cursor for the group's first row.
    fn open_group(&mut self, period: u64, items: &[usize]) {
        let width = label_width(period);
        let sp = spacing(period);
        let top = if self.column.is_empty() { 0 } else { self.bottom + LABEL_GAP };

        self.label_y = top;
        self.label_width = width;
        self.gutter = self.gutter.max(width);

        for (x, value) in glyphs::label_digits(period) {
            self.column.push(Piece {
                kind: PieceKind::Digit(value),
                period,
                x,
                y: top,
                width: glyphs::DIGIT_PITCH,
                height: GLYPH_HEIGHT,
                band: self.bands,
            });
        }
        if top > 0 {
            let mut x = -width;
            while x < self.config.row_width - SPACER_PITCH {
                self.column.push(Piece {
                    kind: PieceKind::Spacer,
                    period,
                    x,
                    y: top - SPACER_RISE,
                    width: SPACER_SIZE,
                    height: SPACER_SIZE,
                    band: self.bands,
                });
                x += SPACER_PITCH;
            }
        }
        self.bottom = self.bottom.max(top + GLYPH_HEIGHT);

        // a group that would just spill past the row fits on one row under the label
        let total: i64 = items.iter().map(|&i| self.records[i].width + sp).sum::<i64>() - sp;
        let row_width = self.config.row_width;
        if row_width <= total && total < row_width + width {
            self.row_y = top + LABEL_CLEARANCE;
            self.cursor_x = -width;
        } else {
            self.row_y = top;
            self.cursor_x = 0;
        }
        self.row.clear();
        self.row_height = 0;
    }

    fn fill_rows(&mut self, period: u64, items: &[usize], began_at_top: bool) -> Fill {
        let sp = spacing(period);
        let records = self.records;

        for (placed, &index) in items.iter().enumerate() {
            let record = &records[index];
            if !self.row.is_empty() && self.cursor_x + record.width > self.config.row_width {
                self.close_row(period);
            }

            if self.row_y + record.height > self.config.column_height {
                if !(began_at_top && placed == 0) {
                    return if began_at_top { Fill::Split(placed) } else { Fill::Withdraw };
                }
                tracing::warn!(
                    index = record.index,
                    height = record.height,
                    column_height = self.config.column_height,
                    "pattern taller than a column; placing it anyway"
                );
            }
            if self.row.is_empty() && self.cursor_x + record.width > self.config.row_width {
                tracing::warn!(
                    index = record.index,
                    width = record.width,
                    "pattern wider than a row; placing it alone"
                );
            }

            self.row.push(Piece {
                kind: PieceKind::Stamp { record: index, row: self.group_rows, column: self.row.len() },
                period,
                x: self.cursor_x,
                y: self.row_y,
                width: record.width,
                height: record.height,
                band: self.bands,
            });
            self.cursor_x += record.width + sp;
            self.row_height = self.row_height.max(record.height);
        }

        Fill::Done
    }

    /// Spread the pending row over the row width and commit it to the column.
    fn close_row(&mut self, period: u64) {
        if self.row.is_empty() {
            return;
        }
        let n = self.row.len() as i64;
        let shift = (self.config.row_width - self.cursor_x).max(0) / n;

        for (i, mut piece) in self.row.drain(..).enumerate() {
            piece.x += i as i64 * shift;
            self.right = self.right.max(piece.x + piece.width);
            self.column.push(piece);
        }

        self.bottom = self.bottom.max(self.row_y + self.row_height);
        self.bands += 1;
        self.group_rows += 1;
        self.row_y += self.row_height + spacing(period);
        self.cursor_x = if self.row_y >= self.label_y + LABEL_CLEARANCE { -self.label_width } else { 0 };
        self.row_height = 0;
    }

    fn mark(&self) -> Mark {
        Mark {
            pieces: self.column.len(),
            bands: self.bands,
            bottom: self.bottom,
            gutter: self.gutter,
            right: self.right,
            group_rows: self.group_rows,
        }
    }

    fn restore(&mut self, mark: Mark) {
        self.column.truncate(mark.pieces);
        self.bands = mark.bands;
        self.bottom = mark.bottom;
        self.gutter = mark.gutter;
        self.right = mark.right;
        self.group_rows = mark.group_rows;
        self.row.clear();
    }

    // --- Columns ---

    /// Stretch, translate and stamp the current column, then start the next
    /// region to its right.
    fn close_column(&mut self) {
        if self.column.is_empty() {
            return;
        }

        let height = self.config.column_height;
        let stretch = self
            .column
            .iter()
            .filter(|p| p.band > 0)
            .map(|p| (height - (p.y + p.height)).max(0) / p.band as i64)
            .min()
            .unwrap_or(0);

        let origin_x = self.region_x + self.gutter;
        let bottom =
            self.column.iter().map(|p| p.y + p.band as i64 * stretch + p.height).max().unwrap_or(0).max(height);
        self.grid.fill_dead(BoundingBox::new(self.region_x, origin_x + self.right - 1, 0, bottom - 1));

        let records = self.records;
        let pieces = std::mem::take(&mut self.column);
        for piece in &pieces {
            let x = origin_x + piece.x;
            let y = piece.y + piece.band as i64 * stretch;
            match piece.kind {
                PieceKind::Digit(value) => self.stamp(glyphs::digit(value), x, y),
                PieceKind::Spacer => self.stamp(glyphs::spacer(), x, y),
                PieceKind::Stamp { record, row, column } => {
                    let rec = &records[record];
                    let (stamp_x, stamp_y) = (x + rec.offset_x, y + rec.offset_y);
                    self.stamp(&rec.cells, stamp_x, stamp_y);
                    self.placements.push(PlacementEntry {
                        record,
                        period: piece.period,
                        x: stamp_x,
                        y: stamp_y,
                        row,
                        column,
                        column_region: self.region,
                        footprint: BoundingBox::new(x, x + piece.width - 1, y, y + piece.height - 1),
                    });
                    if let Some(live) = rec.cells.bounding_box() {
                        let live = live.translate(stamp_x, stamp_y);
                        self.labels.push(LabelMetadata {
                            center_x: (live.min_x + live.max_x).div_euclid(2),
                            center_y: (live.min_y + live.max_y).div_euclid(2),
                            zoom: zoom_hint(live.width()),
                            text: rec.annotation.display_text(),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            region = self.region,
            pieces = pieces.len(),
            stretch,
            gutter = self.gutter,
            "closed column"
        );

        self.region += 1;
        self.region_x = origin_x + self.right + COLUMN_GAP;
        self.bands = 0;
        self.bottom = 0;
        self.gutter = 0;
        self.right = self.config.row_width;
    }

    fn stamp(&mut self, pattern: &Pattern, x: i64, y: i64) {
        let collisions = self.grid.stamp(pattern, x, y);
        if collisions > 0 {
            tracing::warn!(x, y, collisions, "stamp overlaps live cells");
        }
    }
}
