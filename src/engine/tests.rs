use crate::engine::{Detector, DetectorState, GENERATION_CAP, classify, classify_batch, steps};
use crate::{CatalogError, ClassificationRecord, decode};

fn rle(body: &str) -> String {
    format!("x = 0, y = 0, rule = B3/S23\n{body}")
}

fn accepted(block: &str) -> ClassificationRecord {
    let classification = classify(0, block);
    match classification.outcome {
        Ok(record) => record,
        Err(reason) => panic!("expected an oscillator, got {reason}"),
    }
}

#[test]
fn oscillator_periods_and_envelopes() {
    // (name, body, period, envelope width, envelope height, offset_x, offset_y)
    let cases: Vec<(&str, &str, u64, i64, i64, i64, i64)> = vec![
        ("block", "2o$2o!", 1, 2, 2, 0, 0),
        ("beehive", "b2o$o2bo$b2o!", 1, 4, 3, 0, 0),
        ("boat", "2o$obo$bo!", 1, 3, 3, 0, 0),
        ("blinker", "3o!", 2, 3, 3, 0, 1),
        ("toad", "b3o$3o!", 2, 4, 4, 0, 1),
        ("beacon", "2o$o$3bo$2b2o!", 2, 4, 4, 0, 0),
        ("clock", "2bo$obo$bobo$bo!", 2, 4, 4, 0, 0),
        (
            "pulsar",
            "2b3o3b3o2$o4bobo4bo$o4bobo4bo$o4bobo4bo$2b3o3b3o2$2b3o3b3o$o4bobo4bo$o4bobo4bo$o4bobo4bo2$2b3o3b3o!",
            3,
            15,
            15,
            1,
            1,
        ),
        ("pentadecathlon", "2bo4bo$2ob4ob2o$2bo4bo!", 15, 16, 9, 3, 3),
    ];

    for (name, body, period, width, height, offset_x, offset_y) in cases {
        let record = accepted(&rle(body));
        assert_eq!(record.period, period, "{name}: period");
        assert_eq!((record.width, record.height), (width, height), "{name}: envelope");
        assert_eq!((record.offset_x, record.offset_y), (offset_x, offset_y), "{name}: offset");
    }
}

#[test]
fn accepted_cells_return_after_one_period() {
    for body in ["2o$2o!", "3o!", "b3o$3o!", "2bo4bo$2ob4ob2o$2bo4bo!"] {
        let record = accepted(&rle(body));
        assert_eq!(steps(&record.cells, record.period), record.cells);
        assert_eq!(decode(&record.canonical_rle).unwrap(), record.cells);
    }
}

#[test]
fn envelope_is_never_smaller_than_generation_zero() {
    for body in ["2o$2o!", "3o!", "b3o$3o!", "2o$o$3bo$2b2o!", "2bo4bo$2ob4ob2o$2bo4bo!"] {
        let input = decode(&rle(body)).unwrap().bounding_box().unwrap();
        let record = accepted(&rle(body));
        assert!(record.width >= input.width());
        assert!(record.height >= input.height());
    }
}

#[test]
fn canonical_cells_are_normalised() {
    // leading blank row and column in the source
    let record = accepted(&rle("$b3o!"));
    assert_eq!(record.cells.bounding_box().unwrap().min_x, 0);
    assert_eq!(record.cells.bounding_box().unwrap().min_y, 0);
    assert_eq!(record.canonical_rle, "x = 3, y = 1, rule = B3/S23\n3o!");
}

#[test]
fn single_cell_goes_extinct_in_one_generation() {
    let classification = classify(3, &rle("o!"));
    assert_eq!(classification.index, 3);
    assert_eq!(classification.outcome.unwrap_err(), CatalogError::Extinct { generation: 1 });
    assert_eq!(classification.generations, 1);
}

#[test]
fn glider_hits_the_generation_cap() {
    let classification = classify(0, &rle("bo$2bo$3o!"));
    assert_eq!(
        classification.outcome.unwrap_err(),
        CatalogError::GenerationLimitExceeded { generations: GENERATION_CAP }
    );
}

#[test]
fn hinted_glider_is_checked_at_the_hint() {
    let classification = classify(0, &rle("bo$2bo$3o!%1500"));
    assert_eq!(classification.outcome.unwrap_err(), CatalogError::GenerationLimitExceeded { generations: 1500 });
    assert_eq!(classification.generations, 1500);
}

#[test]
fn hint_does_not_hide_a_shorter_period() {
    let record = accepted(&rle("3o!%1200"));
    assert_eq!(record.period, 2);
}

#[test]
fn hint_fast_forwards_past_a_short_cap() {
    let penta = decode(&rle("2bo4bo$2ob4ob2o$2bo4bo!")).unwrap();

    let detection = Detector::with_cap(penta.clone(), Some(15), 3).run().unwrap();
    assert_eq!(detection.period, 15);
    // generations 3..14 are blind, so the envelope misses the big phases
    assert_eq!((detection.envelope.width(), detection.envelope.height()), (10, 5));

    let unhinted = Detector::with_cap(penta, None, 3).run();
    assert_eq!(unhinted.unwrap_err(), CatalogError::GenerationLimitExceeded { generations: 3 });
}

#[test]
fn detector_state_machine() {
    let blinker = decode(&rle("3o!")).unwrap();
    let mut detector = Detector::new(blinker, None);
    assert_eq!(detector.state(), &DetectorState::Running);

    assert_eq!(detector.advance(), &DetectorState::Running);
    assert_eq!(detector.generation(), 1);
    assert_eq!(detector.advance(), &DetectorState::Accepted { period: 2 });

    // final states are sticky
    assert_eq!(detector.advance(), &DetectorState::Accepted { period: 2 });
    assert_eq!(detector.generation(), 2);
}

#[test]
fn empty_pattern_is_extinct() {
    let detection = Detector::new(crate::Pattern::empty(), None).run();
    assert_eq!(detection.unwrap_err(), CatalogError::Extinct { generation: 1 });
}

#[test]
fn undecodable_blocks_are_rejected_not_fatal() {
    let no_rule = classify(0, "#N mystery\nx = 3, y = 1\n3o!");
    assert_eq!(no_rule.outcome.unwrap_err(), CatalogError::MissingRuleDeclaration);
    assert_eq!(no_rule.annotation.name.as_deref(), Some("mystery"));

    let multi_state = classify(1, &rle("AB!"));
    assert_eq!(multi_state.warnings, vec![CatalogError::MalformedCoordinateParity { len: 7 }]);
}

#[test]
fn oversized_runs_reject_one_block_and_spare_the_batch() {
    let blocks = vec![rle("99999999999999999999b2o!"), rle("3o!")];
    let batch = classify_batch(&blocks, false);
    assert_eq!(batch[0].outcome.as_ref().unwrap_err(), &CatalogError::OversizedPattern);
    assert_eq!(batch[0].generations, 0);
    assert_eq!(batch[1].record().map(|r| r.period), Some(2));
}

#[test]
fn annotation_travels_with_the_record() {
    let record = accepted("#N blinker\n#O JHC 3/70\n#C Common.\nx = 3, y = 1, rule = B3/S23\n3o!");
    assert_eq!(record.annotation.name.as_deref(), Some("blinker"));
    assert_eq!(record.annotation.originator.as_deref(), Some("JHC 3/70"));
    assert_eq!(record.annotation.comments, vec!["Common."]);
}

#[test]
fn parallel_batch_matches_sequential_batch() {
    let blocks: Vec<String> = [
        "2o$2o!",
        "3o!",
        "o!",
        "bo$2bo$3o!",
        "b3o$3o!",
        "2bo4bo$2ob4ob2o$2bo4bo!",
        "b2o$o2bo$b2o!",
        "2o$o$3bo$2b2o!",
    ]
    .iter()
    .map(|body| rle(body))
    .chain(std::iter::once("#C no pattern here".to_string()))
    .collect();

    let sequential = classify_batch(&blocks, false);
    let parallel = classify_batch(&blocks, true);

    assert_eq!(sequential.len(), blocks.len());
    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.outcome.as_ref().map(|r| r.period), b.outcome.as_ref().map(|r| r.period));
        assert_eq!(a.outcome.as_ref().map(|r| &r.cells), b.outcome.as_ref().map(|r| &r.cells));
    }
    let periods: Vec<Option<u64>> = sequential.iter().map(|c| c.record().map(|r| r.period)).collect();
    assert_eq!(periods, vec![Some(1), Some(2), None, None, Some(2), Some(15), Some(1), Some(2), None]);
}
