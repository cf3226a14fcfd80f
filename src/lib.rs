#[macro_use]
mod macros;
mod api;
mod codec;
mod document;
mod engine;
mod error;
mod layout;
mod source;

pub use api::{
    CatalogDetails, CatalogResult, CatalogResultVerbose, Context, Options, RejectionSummary, build, build_verbose_with,
    build_with,
};
pub use codec::{Decoded, Header, RULE_ID, decode, decode_document, encode, encode_wrapped};
pub use document::{Legend, assemble};
pub use engine::{
    Classification, ClassificationRecord, Detection, Detector, DetectorState, GENERATION_CAP, RunMetrics,
    classify, classify_batch, step, steps,
};
pub use error::CatalogError;
pub use layout::{
    CellState, LabelMetadata, Layout, LayoutConfig, OutputGrid, PlacementEntry, label_width, pack, spacing, zoom_hint,
};
pub use source::{Annotation, BlockFeatures, split_blocks};

use std::collections::HashSet;

// --- Core types -------------------------------------------------------------

/// A single cell coordinate on the unbounded plane.
///
/// `y` grows downwards, matching the row order of RLE text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

impl Cell {
    pub const fn new(x: i64, y: i64) -> Self {
        Cell { x, y }
    }

    /// The eight Moore neighbours of this cell.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        NEIGHBOR_OFFSETS.iter().map(move |&(dx, dy)| Cell::new(self.x + dx, self.y + dy))
    }

    pub fn offset(self, dx: i64, dy: i64) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }
}

/// Inclusive axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl BoundingBox {
    pub fn new(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        BoundingBox { min_x, max_x, min_y, max_y }
    }

    /// Tight box around `cells`, or `None` when there are none.
    pub fn of_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<Self> {
        let mut iter = cells.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::new(first.x, first.x, first.y, first.y);
        for cell in iter {
            bbox.min_x = bbox.min_x.min(cell.x);
            bbox.max_x = bbox.max_x.max(cell.x);
            bbox.min_y = bbox.min_y.min(cell.y);
            bbox.max_y = bbox.max_y.max(cell.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> i64 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i64 {
        self.max_y - self.min_y + 1
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.min_x..=self.max_x).contains(&cell.x) && (self.min_y..=self.max_y).contains(&cell.y)
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x && self.min_y <= other.max_y && other.min_y <= self.max_y
    }

    pub fn translate(&self, dx: i64, dy: i64) -> BoundingBox {
        BoundingBox::new(self.min_x + dx, self.max_x + dx, self.min_y + dy, self.max_y + dy)
    }
}

/// An immutable set of live cells.
///
/// Two patterns are equal exactly when they contain the same cells; the
/// enumeration order of the underlying set never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    cells: HashSet<Cell>,
}

impl Pattern {
    pub fn new(cells: HashSet<Cell>) -> Self {
        Pattern { cells }
    }

    pub fn empty() -> Self {
        Pattern::default()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of_cells(&self.cells)
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Pattern {
        self.cells.iter().map(|c| c.offset(dx, dy)).collect()
    }

    /// Translate so the bounding box starts at `(0, 0)`.
    ///
    /// Returns the pattern unchanged when it is empty.
    pub fn normalized(&self) -> Pattern {
        match self.bounding_box() {
            Some(bbox) => self.translate(-bbox.min_x, -bbox.min_y),
            None => self.clone(),
        }
    }

    /// Live cells sorted by row, then column.
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort_by_key(|c| (c.y, c.x));
        cells
    }
}

impl FromIterator<Cell> for Pattern {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Pattern { cells: iter.into_iter().collect() }
    }
}
