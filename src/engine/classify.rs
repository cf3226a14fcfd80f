//! Block classification.
//!
//! Turns one raw library block into a [`Classification`]: either an accepted
//! [`ClassificationRecord`] ready for layout, or the reason it was rejected.
//! Nothing here is fatal; a bad block only ever produces an `Err` outcome.
//!
//! Blocks share no state, so [`classify_batch`] can spread them over a rayon
//! pool. `par_iter().enumerate().map(..).collect()` keeps input order, which
//! layout depends on for its stable sorts.

use super::detector::Detector;
use crate::codec::{decode_document, encode};
use crate::source::{Annotation, BlockFeatures};
use crate::{CatalogError, Pattern};
use rayon::prelude::*;

/// An accepted oscillator.
#[derive(Debug, Clone)]
pub struct ClassificationRecord {
    /// Position of the block in the input library.
    pub index: usize,
    pub annotation: Annotation,
    /// 1 for still lifes.
    pub period: u64,
    /// Envelope width over every generation visited.
    pub width: i64,
    /// Envelope height over every generation visited.
    pub height: i64,
    /// Shift that moves the envelope's top-left corner onto the origin.
    pub offset_x: i64,
    pub offset_y: i64,
    /// `encode` of the canonical (normalised) cells.
    pub canonical_rle: String,
    /// Canonical cells; their bounding box starts at `(0, 0)`.
    pub cells: Pattern,
}

impl ClassificationRecord {
    pub fn population(&self) -> usize {
        self.cells.len()
    }
}

/// Outcome for one input block.
#[derive(Debug, Clone)]
pub struct Classification {
    pub index: usize,
    pub features: BlockFeatures,
    pub annotation: Annotation,
    pub outcome: Result<ClassificationRecord, CatalogError>,
    /// Problems recovered from while decoding.
    pub warnings: Vec<CatalogError>,
    /// Generations simulated, blind ones included.
    pub generations: u64,
}

impl Classification {
    pub fn record(&self) -> Option<&ClassificationRecord> {
        self.outcome.as_ref().ok()
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Decode `block` and decide whether it is an oscillator.
pub fn classify(index: usize, block: &str) -> Classification {
    let features = BlockFeatures::scan(block);
    let decoded =
        if features.is_decodable() { decode_document(block) } else { Err(CatalogError::MissingRuleDeclaration) };

    let decoded = match decoded {
        Ok(decoded) => decoded,
        Err(reason) => {
            tracing::warn!(index, "skipping block: {reason}");
            return Classification {
                index,
                features,
                annotation: Annotation::parse(block),
                outcome: Err(reason),
                warnings: Vec::new(),
                generations: 0,
            };
        }
    };

    let annotation = Annotation::parse(&decoded.comments);
    let detection = Detector::new(decoded.pattern.normalized(), decoded.period_hint).run();

    let generations = match &detection {
        Ok(found) => found.period,
        Err(CatalogError::Extinct { generation }) => *generation,
        Err(CatalogError::GenerationLimitExceeded { generations }) => *generations,
        Err(_) => 0,
    };

    let outcome = detection.map(|found| ClassificationRecord {
        index,
        annotation: annotation.clone(),
        period: found.period,
        width: found.envelope.width(),
        height: found.envelope.height(),
        offset_x: -found.envelope.min_x,
        offset_y: -found.envelope.min_y,
        canonical_rle: encode(&found.cells),
        cells: found.cells,
    });

    match &outcome {
        Ok(record) => tracing::debug!(
            index,
            period = record.period,
            width = record.width,
            height = record.height,
            "accepted oscillator"
        ),
        Err(reason) => {
            tracing::warn!(index, name = annotation.name.as_deref().unwrap_or(""), "not an oscillator: {reason}")
        }
    }

    let warnings = decoded.warning.into_iter().collect();
    Classification { index, features, annotation, outcome, warnings, generations }
}

/// Classify every block, in parallel when `parallel` is set.
///
/// The result has one entry per block, in input order either way.
pub fn classify_batch<S: AsRef<str> + Sync>(blocks: &[S], parallel: bool) -> Vec<Classification> {
    if parallel {
        blocks.par_iter().enumerate().map(|(index, block)| classify(index, block.as_ref())).collect()
    } else {
        blocks.iter().enumerate().map(|(index, block)| classify(index, block.as_ref())).collect()
    }
}
