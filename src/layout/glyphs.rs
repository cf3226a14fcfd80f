//! Numeral glyphs drawn as still lifes.
//!
//! Each digit is an 8×14 still life, so a period label survives in the
//! finished grid no matter how long it is run. A 2×2 block is the spacer
//! stamped between period groups.

use crate::Pattern;

pub(crate) const GLYPH_HEIGHT: i64 = 14;
/// Horizontal distance between the left edges of two neighbouring digits.
pub(crate) const DIGIT_PITCH: i64 = 10;
pub(crate) const SPACER_SIZE: i64 = 2;
pub(crate) const SPACER_PITCH: i64 = 6;

pub(crate) fn digit(value: u8) -> &'static Pattern {
    match value {
        0 => still_life!(
            "2b2obo$2bob2o$2o4b2o$o5bo$bo5bo$2o4b2o$o5bo$bo5bo$2o4b2o$o5bo$bo5bo$2o4b2o$2b2obo$2bob2o!"
        ),
        1 => still_life!("6b2o$7bo$6bo$6b2o2$6b2o$7bo$6bo$6b2o2$6b2o$7bo$6bo$6b2o!"),
        2 => still_life!("2b2obo$2bob2o$6b2o$6bo$7bo$6b2o$2b2obo$2bob2o$2o$o$bo$2o$2b2obo$2bob2o!"),
        3 => still_life!("2b2obo$2bob2o$6b2o$6bo$7bo$6b2o$2b2obo$2bob2o$6b2o$6bo$7bo$6b2o$2b2obo$2bob2o!"),
        4 => still_life!("2o4b2o$bo5bo$o5bo$2o4b2o$2bob2o$2b2obo$6b2o$7bo$6bo$6b2o3$6b2o$6b2o!"),
        5 => still_life!("2bob2o$2b2obo$2o$bo$o$2o$2bob2o$2b2obo$6b2o$7bo$6bo$6b2o$2bob2o$2b2obo!"),
        6 => still_life!("2b2obo$2bob2o$2o$o$bo$2o$2b2obo$2bob2o$2o4b2o$o5bo$bo5bo$2o4b2o$2b2obo$2bob2o!"),
        7 => still_life!("2bob2o$2b2obo$6b2o$7bo$6bo$6b2o$4b2o$5bo$4bo$4b2o$2b2o$3bo$2bo$2b2o!"),
        8 => still_life!(
            "2b2obo$2bob2o$2o4b2o$o5bo$bo5bo$2o4b2o$2b2obo$2bob2o$2o4b2o$o5bo$bo5bo$2o4b2o$2b2obo$2bob2o!"
        ),
        _ => still_life!(
            "2b2obo$2bob2o$2o4b2o$o5bo$bo5bo$2o4b2o$2b2obo$2bob2o$6b2o$6bo$7bo$6b2o$2b2obo$2bob2o!"
        ),
    }
}

pub(crate) fn spacer() -> &'static Pattern {
    still_life!("2o$2o!")
}

/// Width of the gutter a period label needs left of the column origin.
///
/// A leading `1` is drawn flush right in its glyph box, which saves 6 cells.
pub fn label_width(period: u64) -> i64 {
    let text = period.to_string();
    let width = DIGIT_PITCH * text.len() as i64;
    if text.starts_with('1') { width - 6 } else { width }
}

/// `(x, digit)` for every digit of `period`, with `x` relative to the column
/// origin. The last digit ends two cells left of the origin.
pub(crate) fn label_digits(period: u64) -> Vec<(i64, u8)> {
    let digits: Vec<u8> = period.to_string().bytes().map(|b| b - b'0').collect();
    let len = digits.len() as i64;
    digits.into_iter().enumerate().map(|(i, d)| (-DIGIT_PITCH * (len - i as i64), d)).collect()
}
