use crate::document::{Legend, assemble};
use crate::engine::{ClassificationRecord, RunMetrics, classify_batch};
use crate::layout::{LayoutConfig, pack};
use crate::source::split_blocks;
use crate::CatalogError;
use chrono::{Local, NaiveDate};
use std::time::{Duration, Instant};

/// Build context.
///
/// Holds what the catalog depends on besides its input: today's date for the
/// legend.
#[derive(Debug, Clone)]
pub struct Context {
    /// Date printed in the `updated ...` credit line.
    pub generated_on: NaiveDate,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            Self { generated_on: NaiveDate::from_ymd_opt(2023, 8, 4).unwrap_or_default() }
        } else {
            Self { generated_on: Local::now().date_naive() }
        }
    }
}

/// Options that shape the catalog.
#[derive(Debug, Clone)]
pub struct Options {
    /// Row width right of the label gutter, in cells.
    pub row_width: i64,
    /// Column height, in cells.
    pub column_height: i64,
    /// Classify blocks on the rayon pool.
    pub parallel: bool,
    pub legend: Legend,
}

impl Default for Options {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Options {
            row_width: layout.row_width,
            column_height: layout.column_height,
            parallel: true,
            legend: Legend::default(),
        }
    }
}

impl Options {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig { row_width: self.row_width.max(1), column_height: self.column_height.max(1) }
    }
}

/// Result from [`build`] and [`build_with`].
#[derive(Debug, Clone)]
pub struct CatalogResult {
    /// The finished catalog text.
    pub document: String,
    /// Oscillators placed in the grid.
    pub accepted: usize,
    /// Blocks left out.
    pub rejected: usize,
    pub elapsed: Duration,
}

/// Why one block was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionSummary {
    /// Position of the block in the library.
    pub index: usize,
    pub name: Option<String>,
    pub reason: CatalogError,
}

/// Additional details returned by [`build_verbose_with`].
#[derive(Debug, Clone)]
pub struct CatalogDetails {
    pub metrics: RunMetrics,
    pub rejections: Vec<RejectionSummary>,
    /// Recovered decode problems, by block index.
    pub warnings: Vec<(usize, CatalogError)>,
    /// Distinct periods in the catalog, ascending.
    pub periods: Vec<u64>,
    /// Column regions used by the grid.
    pub columns: usize,
}

/// Result from [`build_verbose_with`].
#[derive(Debug, Clone)]
pub struct CatalogResultVerbose {
    pub document: String,
    pub accepted: usize,
    pub rejected: usize,
    pub elapsed: Duration,
    pub details: CatalogDetails,
}

/// Build a catalog from `library` with a default [`Context`] and [`Options`].
///
/// # Example
/// ```
/// use oscstamp::build;
///
/// let out = build("#N blinker\nx = 3, y = 1, rule = B3/S23\n3o!");
/// assert_eq!(out.accepted, 1);
/// assert!(out.document.contains("#C 2.0.0 blinker"));
/// ```
pub fn build(library: &str) -> CatalogResult {
    build_with(library, &Context::default(), &Options::default())
}

/// Build a catalog from `library` with the provided `context`/`options`.
pub fn build_with(library: &str, context: &Context, options: &Options) -> CatalogResult {
    let run = build_verbose_with(library, context, options);
    CatalogResult { document: run.document, accepted: run.accepted, rejected: run.rejected, elapsed: run.elapsed }
}

/// Build a catalog and return per-stage timings and the rejected blocks.
///
/// ```text
/// library ─ split_blocks ─ classify_batch ─┬─ records ── pack ── assemble ─▶ document
///                                          └─ rejections, warnings ────────▶ details
/// ```
pub fn build_verbose_with(library: &str, context: &Context, options: &Options) -> CatalogResultVerbose {
    let started = Instant::now();
    let mut metrics = RunMetrics::default();

    let blocks = split_blocks(library);
    let stage = Instant::now();
    let classifications = classify_batch(&blocks, options.parallel);
    metrics.classify = stage.elapsed();
    metrics.record_classifications(&classifications);

    let mut records: Vec<ClassificationRecord> = Vec::new();
    let mut rejections = Vec::new();
    let mut warnings = Vec::new();
    for classification in classifications {
        let index = classification.index;
        warnings.extend(classification.warnings.into_iter().map(|w| (index, w)));
        match classification.outcome {
            Ok(record) => records.push(record),
            Err(reason) => rejections.push(RejectionSummary { index, name: classification.annotation.name, reason }),
        }
    }

    let stage = Instant::now();
    let layout = pack(&records, &options.layout_config());
    metrics.layout = stage.elapsed();

    let stage = Instant::now();
    let document = assemble(&records, &layout, &options.legend, context.generated_on);
    metrics.assemble = stage.elapsed();
    metrics.total = started.elapsed();

    tracing::info!(
        blocks = metrics.blocks,
        accepted = metrics.accepted,
        rejected = metrics.rejected,
        elapsed = ?metrics.total,
        "catalog built"
    );

    let details = CatalogDetails { periods: layout.periods, columns: layout.columns, rejections, warnings, metrics };
    CatalogResultVerbose {
        document,
        accepted: details.metrics.accepted,
        rejected: details.metrics.rejected,
        elapsed: details.metrics.total,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = "\
#N blinker
#O JHC 3/70
x = 3, y = 1, rule = B3/S23
3o!

#N block
x = 2, y = 2, rule = B3/S23
2o$2o!

#N glider
x = 3, y = 3, rule = B3/S23
bo$2bo$3o!

#N lonely
x = 1, y = 1, rule = B3/S23
o!

#N no rule here
x = 3, y = 1
3o!

#N toad
x = 4, y = 2, rule = B3/S23
b3o$3o!
";

    #[test]
    fn build_uses_deterministic_test_date() {
        let out = build("x = 2, y = 2, rule = B3/S23\n2o$2o!");
        assert!(out.document.contains("updated Aug 04, 2023"));
        assert_eq!((out.accepted, out.rejected), (1, 0));
    }

    #[test]
    fn build_verbose_reports_rejections() {
        let res = build_verbose_with(LIBRARY, &Context::default(), &Options::default());

        assert_eq!((res.accepted, res.rejected), (3, 3));
        assert_eq!(res.elapsed, res.details.metrics.total);
        assert_eq!(res.details.periods, vec![1, 2]);
        assert_eq!(res.details.columns, 1);

        let reasons: Vec<(usize, &str)> = res.details.rejections.iter().map(|r| (r.index, r.reason.kind())).collect();
        assert_eq!(
            reasons,
            vec![(2, "generation-limit-exceeded"), (3, "extinct"), (4, "missing-rule-declaration")]
        );
        assert_eq!(res.details.rejections[0].name.as_deref(), Some("glider"));
        assert_eq!(res.details.metrics.generations, 2 + 1 + 999 + 1 + 2);
    }

    #[test]
    fn document_lists_accepted_patterns_in_order() {
        let doc = build(LIBRARY).document;
        let entries: Vec<&str> = doc.lines().filter(|l| regex!(r"^#C \d+\.\d+\.\d+").is_match(l)).collect();
        assert_eq!(entries, vec!["#C 1.0.0 block", "#C 2.0.0 blinker [JHC 3/70]", "#C 2.0.1 toad"]);
        assert!(doc.contains("#C A collection of 3 oscillators of 2 different periods from 1 to 2."));
    }

    #[test]
    fn parallel_and_sequential_builds_agree() {
        let context = Context::default();
        let parallel = build_with(LIBRARY, &context, &Options::default());
        let sequential = build_with(LIBRARY, &context, &Options { parallel: false, ..Options::default() });
        assert_eq!(parallel.document, sequential.document);
    }

    #[test]
    fn empty_library_builds_an_empty_catalog() {
        let out = build("");
        assert_eq!((out.accepted, out.rejected), (0, 0));
        assert!(out.document.contains("x = 0, y = 0, rule = B3/S23\n!"));
    }

    #[test]
    fn options_shape_the_grid() {
        let narrow = Options { row_width: 10, column_height: 40, ..Options::default() };
        let res = build_verbose_with(LIBRARY, &Context::default(), &narrow);
        assert_eq!(res.accepted, 3);
        assert!(res.details.columns >= 1);
        assert_eq!(narrow.layout_config(), LayoutConfig { row_width: 10, column_height: 40 });
    }
}
