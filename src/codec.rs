//! RLE grid codec.
//!
//! Reads and writes the run-length text format used by every pattern block and
//! by the composite catalog grid:
//!
//! ```text
//! #N blinker                      <- optional comment lines
//! x = 3, y = 1, rule = B3/S23     <- header; the rule id is required
//! 3o!                             <- body: <count><tag> tokens, `!` ends it
//! %1200                           <- optional period hint after the terminator
//! ```
//!
//! Tags are `b`/`.` (dead), `o` (alive) and `$` (end of row). A count before
//! `$` skips that many rows. The body may start on the header line, even glued
//! to the rule id (`rule = B3/S232b2obo$...`).
//!
//! ## Decoding
//!
//! The body is read into a flat coordinate list (`x0, y0, x1, y1, ...`) before
//! it becomes a [`Pattern`]. Multi-state tags (`A`..`X`, optionally prefixed by
//! `p`..`y`) append `x, y, state` triples instead and the list is padded to odd
//! length, which is how such data looks when a binary reader is handed a
//! multi-state cell list. An odd-length list is reported as
//! [`CatalogError::MalformedCoordinateParity`]; the dangling value is dropped
//! and the rest is paired up as well as possible.
//!
//! Run counts are checked as they are applied: a cursor that leaves
//! `±2^31`, or a body describing more than `2^24` live cells, fails with
//! [`CatalogError::OversizedPattern`] before anything is allocated for it.
//!
//! ## Encoding
//!
//! [`encode`] emits the minimal form in one linear pass: tight header, no
//! trailing dead runs, no trailing blank rows, identical neighbouring tokens
//! merged (`$$$` becomes `3$`). A pattern whose box does not start at `(0, 0)`
//! gets a `#CXRLE Pos=x,y` line so decoding restores its position.

use crate::{BoundingBox, CatalogError, Cell, Pattern};
use std::collections::BTreeMap;
use std::fmt;

/// The only rule this crate simulates.
pub const RULE_ID: &str = "B3/S23";

/// Dimensions declared on the header line. Informational only: the decoder
/// trusts the body, not the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub width: u64,
    pub height: u64,
}

/// Everything read from one RLE document.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub pattern: Pattern,
    pub header: Header,
    /// Raw text before the header line (comment lines).
    pub comments: String,
    /// Period declared with a trailing `%<n>`.
    pub period_hint: Option<u64>,
    /// Recoverable problem found while decoding.
    pub warning: Option<CatalogError>,
}

/// Decode an RLE document, keeping comments, hint and warnings.
pub fn decode_document(text: &str) -> Result<Decoded, CatalogError> {
    let header_re = regex!(r"(?im)^[ \t]*x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)");
    let rule_re = regex!(r"(?i)rule\s*=\s*b3/s23");

    let header_caps = header_re.captures(text).ok_or(CatalogError::MissingRuleDeclaration)?;
    let header_match = header_caps.get(0).ok_or(CatalogError::MissingRuleDeclaration)?;
    let header = Header {
        width: header_caps[1].parse().unwrap_or(0),
        height: header_caps[2].parse().unwrap_or(0),
    };

    let after_header = &text[header_match.end()..];
    let rule = rule_re.find(after_header).ok_or(CatalogError::MissingRuleDeclaration)?;

    let comments = &text[..header_match.start()];
    let body = read_body(&after_header[rule.end()..])?;
    let (mut pattern, warning) = pair_up(&body.list);

    if let Some((dx, dy)) = position_line(comments) {
        pattern = pattern.translate(dx, dy);
    }

    if let Some(warning) = &warning {
        tracing::warn!(multi_state = body.multi_state, "{warning}");
    }

    Ok(Decoded {
        pattern,
        header,
        comments: comments.to_string(),
        period_hint: period_hint(body.trailer),
        warning,
    })
}

/// Decode an RLE document into its live cells.
pub fn decode(text: &str) -> Result<Pattern, CatalogError> {
    decode_document(text).map(|d| d.pattern)
}

/// Encode `pattern` as a minimal single-line RLE document.
pub fn encode(pattern: &Pattern) -> String {
    render(pattern, None)
}

/// Like [`encode`], but breaks the body into lines of at most `line_width`
/// characters. Tokens are never split.
pub fn encode_wrapped(pattern: &Pattern, line_width: usize) -> String {
    render(pattern, Some(line_width.max(1)))
}

// --- Decoding ---------------------------------------------------------------

/// Largest absolute coordinate a body may reach.
const MAX_COORDINATE: i64 = 1 << 31;
/// Largest number of live cells a body may describe.
const MAX_CELLS: usize = 1 << 24;

struct Body<'a> {
    list: Vec<i64>,
    multi_state: bool,
    /// Text after the `!` terminator.
    trailer: &'a str,
}

/// `cursor + run`, or an error once it leaves the coordinate limit.
fn advance(cursor: i64, run: i64) -> Result<i64, CatalogError> {
    cursor.checked_add(run).filter(|next| next.abs() <= MAX_COORDINATE).ok_or(CatalogError::OversizedPattern)
}

fn read_body(body: &str) -> Result<Body<'_>, CatalogError> {
    let mut list = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);
    let mut count: Option<i64> = None;
    let mut prefix: i64 = 0;
    let mut multi_state = false;
    let mut cells = 0usize;
    let mut trailer = "";

    for (idx, ch) in body.char_indices() {
        match ch {
            '0'..='9' => {
                let digit = i64::from(ch as u8 - b'0');
                count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            }
            'b' | '.' => x = advance(x, count.take().unwrap_or(1))?,
            'o' | 'A'..='X' => {
                let run = count.take().unwrap_or(1);
                let end = advance(x, run)?;
                cells = usize::try_from(run).ok().and_then(|run| cells.checked_add(run)).unwrap_or(usize::MAX);
                if cells > MAX_CELLS {
                    return Err(CatalogError::OversizedPattern);
                }
                if ch == 'o' {
                    list.extend((x..end).flat_map(|cx| [cx, y]));
                } else {
                    let state = prefix * 24 + i64::from(ch as u8 - b'A' + 1);
                    list.extend((x..end).flat_map(|cx| [cx, y, state]));
                    prefix = 0;
                    multi_state = true;
                }
                x = end;
            }
            'p'..='y' => prefix = i64::from(ch as u8 - b'p' + 1),
            '$' => {
                y = advance(y, count.take().unwrap_or(1))?;
                x = 0;
            }
            '!' => {
                trailer = &body[idx + 1..];
                break;
            }
            // whitespace, line breaks, stray characters
            _ => {}
        }
    }

    if multi_state && list.len() % 2 == 0 {
        list.push(0);
    }

    Ok(Body { list, multi_state, trailer })
}

fn pair_up(list: &[i64]) -> (Pattern, Option<CatalogError>) {
    let warning = (list.len() % 2 == 1).then_some(CatalogError::MalformedCoordinateParity { len: list.len() });
    let pattern = list.chunks_exact(2).map(|pair| Cell::new(pair[0], pair[1])).collect();
    (pattern, warning)
}

fn period_hint(trailer: &str) -> Option<u64> {
    let rest = trailer.trim_start().strip_prefix('%')?;
    let digits: &str = rest.trim_start().split(|c: char| !c.is_ascii_digit()).next()?;
    digits.parse().ok().filter(|&hint| hint > 0)
}

fn position_line(comments: &str) -> Option<(i64, i64)> {
    let pos_re = regex!(r"(?im)^#CXRLE\b.*?\bPos\s*=\s*(-?\d+)\s*,\s*(-?\d+)");
    let caps = pos_re.captures(comments)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

// --- Encoding ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Dead,
    Alive,
    EndOfRow,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    count: i64,
    tag: Tag,
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.tag {
            Tag::Dead => 'b',
            Tag::Alive => 'o',
            Tag::EndOfRow => '$',
        };
        if self.count == 1 { write!(f, "{tag}") } else { write!(f, "{}{tag}", self.count) }
    }
}

fn push_run(runs: &mut Vec<Run>, tag: Tag, count: i64) {
    if count <= 0 {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.tag == tag => last.count += count,
        _ => runs.push(Run { count, tag }),
    }
}

/// One pass over the rows of `pattern`, emitting `(count, tag)` pairs.
fn runs(pattern: &Pattern, bbox: &BoundingBox) -> Vec<Run> {
    let mut rows: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for cell in pattern.cells() {
        rows.entry(cell.y).or_default().push(cell.x);
    }

    let mut runs = Vec::new();
    let mut prev_y = bbox.min_y;
    for (&y, xs) in rows.iter_mut() {
        xs.sort_unstable();
        push_run(&mut runs, Tag::EndOfRow, y - prev_y);
        prev_y = y;

        let mut cursor = bbox.min_x;
        for &x in xs.iter() {
            push_run(&mut runs, Tag::Dead, x - cursor);
            push_run(&mut runs, Tag::Alive, 1);
            cursor = x + 1;
        }
    }
    runs
}

fn render(pattern: &Pattern, line_width: Option<usize>) -> String {
    let Some(bbox) = pattern.bounding_box() else {
        return format!("x = 0, y = 0, rule = {RULE_ID}\n!");
    };

    let mut out = String::new();
    if bbox.min_x != 0 || bbox.min_y != 0 {
        out.push_str(&format!("#CXRLE Pos={},{}\n", bbox.min_x, bbox.min_y));
    }
    out.push_str(&format!("x = {}, y = {}, rule = {RULE_ID}\n", bbox.width(), bbox.height()));

    let tokens = runs(pattern, &bbox).into_iter().map(|r| r.to_string()).chain(std::iter::once("!".to_string()));
    let mut line_len = 0;
    for token in tokens {
        if let Some(width) = line_width {
            if line_len > 0 && line_len + token.len() > width {
                out.push('\n');
                line_len = 0;
            }
        }
        line_len += token.len();
        out.push_str(&token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cells(p: &Pattern) -> Vec<(i64, i64)> {
        p.sorted_cells().into_iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn decodes_block_with_comments() {
        let text = "#N block\n#O JHC\nx = 2, y = 2, rule = B3/S23\n2o$2o!\n";
        let doc = decode_document(text).unwrap();
        assert_eq!(cells(&doc.pattern), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(doc.header, Header { width: 2, height: 2 });
        assert_eq!(doc.comments, "#N block\n#O JHC\n");
        assert_eq!(doc.period_hint, None);
        assert!(doc.warning.is_none());
    }

    #[test]
    fn rule_id_is_case_insensitive_and_body_may_be_glued() {
        let lower = decode("x = 3, y = 1, rule = b3/s23\n3o!").unwrap();
        assert_eq!(lower.len(), 3);

        let glued = decode("x = 8, y = 2, rule = B3/S232b2obo$2bob2o!").unwrap();
        assert_eq!(cells(&glued), vec![(2, 0), (3, 0), (5, 0), (2, 1), (4, 1), (5, 1)]);
    }

    #[test]
    fn missing_rule_is_an_error() {
        assert_eq!(decode("x = 3, y = 1\n3o!"), Err(CatalogError::MissingRuleDeclaration));
        assert_eq!(decode("x = 3, y = 1, rule = B36/S23\n3o!"), Err(CatalogError::MissingRuleDeclaration));
        assert_eq!(decode("#N nothing here\n"), Err(CatalogError::MissingRuleDeclaration));
    }

    #[test]
    fn multi_row_skips_and_dot_dead_cells() {
        let p = decode("x = 3, y = 4, rule = B3/S23\n.o$\n2$3o!").unwrap();
        assert_eq!(cells(&p), vec![(1, 0), (0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn reads_period_hint_after_terminator() {
        let doc = decode_document("x = 1, y = 1, rule = B3/S23\no!%1200\n").unwrap();
        assert_eq!(doc.period_hint, Some(1200));

        let doc = decode_document("x = 1, y = 1, rule = B3/S23\no! % 40894").unwrap();
        assert_eq!(doc.period_hint, Some(40894));

        let doc = decode_document("x = 1, y = 1, rule = B3/S23\no!%abc").unwrap();
        assert_eq!(doc.period_hint, None);
    }

    #[test]
    fn multi_state_input_warns_and_recovers() {
        let doc = decode_document("x = 2, y = 1, rule = B3/S23\nAB!").unwrap();
        // two triples padded to seven values
        assert_eq!(doc.warning, Some(CatalogError::MalformedCoordinateParity { len: 7 }));
        assert_eq!(doc.pattern.len(), 3);
    }

    #[test]
    fn encodes_minimal_forms() {
        let block = decode("x = 2, y = 2, rule = B3/S23\n2o$2o!").unwrap();
        assert_eq!(encode(&block), "x = 2, y = 2, rule = B3/S23\n2o$2o!");

        let blinker = decode("x = 3, y = 1, rule = B3/S23\nooo!").unwrap();
        assert_eq!(encode(&blinker), "x = 3, y = 1, rule = B3/S23\n3o!");

        let gapped = decode("x = 3, y = 4, rule = B3/S23\no$$$2bo!").unwrap();
        assert_eq!(encode(&gapped), "x = 3, y = 4, rule = B3/S23\no3$2bo!");

        let glider = decode("x = 3, y = 3, rule = B3/S23\nbob$2bo$3o!").unwrap();
        assert_eq!(encode(&glider), "x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!");
    }

    #[test]
    fn encodes_empty_pattern() {
        assert_eq!(encode(&Pattern::empty()), "x = 0, y = 0, rule = B3/S23\n!");
        assert!(decode(&encode(&Pattern::empty())).unwrap().is_empty());
    }

    #[test]
    fn keeps_position_of_offset_patterns() {
        let p: Pattern = [Cell::new(-4, 7), Cell::new(-3, 7)].into_iter().collect();
        let text = encode(&p);
        assert!(text.starts_with("#CXRLE Pos=-4,7\nx = 2, y = 1"));
        assert_eq!(decode(&text).unwrap(), p);
    }

    #[test]
    fn wrapped_lines_respect_width() {
        let row: Pattern = (0..200).step_by(2).map(|x| Cell::new(x, 0)).collect();
        let text = encode_wrapped(&row, 70);
        let body: Vec<&str> = text.lines().skip(1).collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|line| line.len() <= 70));
        assert_eq!(decode(&text).unwrap(), row);
    }

    #[test]
    fn huge_dead_run_is_rejected() {
        let text = "x = 1, y = 1, rule = B3/S23\n99999999999999999999b2o!";
        assert_eq!(decode(text), Err(CatalogError::OversizedPattern));
        assert_eq!(decode("x = 1, y = 1, rule = B3/S23\n3000000000bo!"), Err(CatalogError::OversizedPattern));
    }

    #[test]
    fn huge_row_skip_is_rejected() {
        let text = "x = 1, y = 1, rule = B3/S23\no99999999999999999999$$o!";
        assert_eq!(decode(text), Err(CatalogError::OversizedPattern));
    }

    #[test]
    fn huge_live_run_is_rejected_before_allocating() {
        assert_eq!(decode("x = 1, y = 1, rule = B3/S23\n4000000000o!"), Err(CatalogError::OversizedPattern));
        // within the coordinate limit but past the cell limit
        assert_eq!(decode("x = 1, y = 1, rule = B3/S23\n20000000o!"), Err(CatalogError::OversizedPattern));
        assert_eq!(decode("x = 1, y = 1, rule = B3/S23\n20000000A!"), Err(CatalogError::OversizedPattern));
    }

    #[test]
    fn large_offsets_inside_the_limits_still_decode() {
        let p = decode("x = 1, y = 1, rule = B3/S23\n1000000bo1000000$o!").unwrap();
        assert_eq!(cells(&p), vec![(1_000_000, 0), (0, 1_000_000)]);
    }

    proptest! {
        #[test]
        fn decode_encode_round_trip(points in proptest::collection::vec((-40i64..40, -40i64..40), 1..80)) {
            let pattern: Pattern = points.iter().map(|&(x, y)| Cell::new(x, y)).collect();
            prop_assert_eq!(decode(&encode(&pattern)).unwrap(), pattern.clone());
            prop_assert_eq!(decode(&encode_wrapped(&pattern, 70)).unwrap(), pattern);
        }
    }
}
