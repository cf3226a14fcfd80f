//! Period detection.
//!
//! A [`Detector`] owns one pattern and walks it forward one generation at a
//! time until it either sees generation 0 again or gives up:
//!
//! ```text
//!            advance()                    next == initial
//! Running ───────────────▶ Running ─────────────────────────▶ Accepted { period }
//!    │                        │
//!    │ next is empty          │ generation == GENERATION_CAP
//!    v                        v
//! Rejected(Extinct)      Rejected(GenerationLimitExceeded)
//! ```
//!
//! Equality is set equality with the *initial* cells, so a pattern that comes
//! back translated (a spaceship) never matches and runs into the cap.
//!
//! While running, the detector keeps the envelope: the union of the bounding
//! boxes of every generation it has looked at. Layout reserves the envelope,
//! not the resting size, so a rotor that briefly grows past its generation-0
//! box cannot touch its neighbours.
//!
//! ## Period hints
//!
//! High-period oscillators (period ≥ 1000) carry a `%<period>` hint. When the
//! hint is larger than the cap, the step that would reach the cap first runs
//! `hint - GENERATION_CAP` blind generations (no comparison, no envelope
//! update), so the last comparison happens exactly at generation `hint`.

use super::step::step;
use crate::{BoundingBox, CatalogError, Pattern};

/// Generations simulated before an unhinted pattern is rejected.
pub const GENERATION_CAP: u64 = 999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorState {
    Running,
    Accepted { period: u64 },
    Rejected(CatalogError),
}

/// Result of a successful detection.
#[derive(Debug, Clone)]
pub struct Detection {
    pub period: u64,
    /// Cells of the matching generation (equal to the initial cells).
    pub cells: Pattern,
    /// Union of the bounding boxes of all generations visited.
    pub envelope: BoundingBox,
}

#[derive(Debug, Clone)]
pub struct Detector {
    initial: Pattern,
    current: Pattern,
    generation: u64,
    envelope: BoundingBox,
    period_hint: Option<u64>,
    cap: u64,
    state: DetectorState,
}

impl Detector {
    pub fn new(pattern: Pattern, period_hint: Option<u64>) -> Self {
        Detector::with_cap(pattern, period_hint, GENERATION_CAP)
    }

    /// Like [`Detector::new`] with a different generation cap.
    pub fn with_cap(pattern: Pattern, period_hint: Option<u64>, cap: u64) -> Self {
        let envelope = pattern.bounding_box().unwrap_or_default();
        Detector {
            current: pattern.clone(),
            initial: pattern,
            generation: 0,
            envelope,
            period_hint,
            cap: cap.max(1),
            state: DetectorState::Running,
        }
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Generations simulated so far, blind ones included.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn envelope(&self) -> BoundingBox {
        self.envelope
    }

    /// Simulate one more generation and update the state.
    ///
    /// Does nothing once the detector has left `Running`.
    pub fn advance(&mut self) -> &DetectorState {
        if self.state != DetectorState::Running {
            return &self.state;
        }

        let checked = self.generation + 1;
        let blind = match self.period_hint {
            Some(hint) if checked == self.cap && hint > self.cap => hint - self.cap,
            _ => 0,
        };
        if blind > 0 {
            tracing::debug!(from = self.generation, blind, "fast-forwarding to hinted period");
        }

        for _ in 0..blind {
            self.current = step(&self.current);
        }
        self.current = step(&self.current);
        self.generation += blind + 1;

        let Some(bbox) = self.current.bounding_box() else {
            self.state = DetectorState::Rejected(CatalogError::Extinct { generation: self.generation });
            return &self.state;
        };
        self.envelope = self.envelope.union(&bbox);

        if self.current == self.initial {
            self.state = DetectorState::Accepted { period: self.generation };
        } else if checked >= self.cap {
            self.state =
                DetectorState::Rejected(CatalogError::GenerationLimitExceeded { generations: self.generation });
        }
        &self.state
    }

    /// Advance until the state is final.
    pub fn run(mut self) -> Result<Detection, CatalogError> {
        loop {
            match self.advance().clone() {
                DetectorState::Running => continue,
                DetectorState::Accepted { period } => {
                    return Ok(Detection { period, cells: self.current, envelope: self.envelope });
                }
                DetectorState::Rejected(reason) => return Err(reason),
            }
        }
    }
}
