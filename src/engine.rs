//! Simulation and classification engine.
//!
//! This module is the entry point for everything that runs B3/S23. It is
//! split into focused submodules under `src/engine/`:
//!
//! ```text
//! block text ── BlockFeatures::scan ──┐   (source.rs, cheap gate)
//!                                     │
//!                       decode_document (codec.rs)
//!                                     │  normalise to (0, 0)
//!                                     v
//!                      Detector::run (detector.rs)
//!                        - step() one generation     (step.rs)
//!                        - grow the envelope
//!                        - compare with generation 0
//!                                     │
//!                                     v
//!                Classification { Ok(record) | Err(reason) }
//! ```
//!
//! `classify_batch` (classify.rs) runs the right-hand column once per block,
//! optionally on a rayon pool, and returns results in input order.
//!
//! ## Responsibilities by module
//!
//! - `step.rs`: one generation over a sparse cell set.
//! - `detector.rs`: the per-pattern state machine, the generation cap and the
//!   period-hint fast-forward.
//! - `classify.rs`: decoding + detection for one block, batch driver.
//! - `metrics.rs`: timings and counters for a whole catalog run.

#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/detector.rs"]
mod detector;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/step.rs"]
mod step;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use classify::{Classification, ClassificationRecord, classify, classify_batch};
pub use detector::{Detection, Detector, DetectorState, GENERATION_CAP};
pub use metrics::RunMetrics;
pub use step::{step, steps};
