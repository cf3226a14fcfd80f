//! One generation of B3/S23.
//!
//! Neighbour counts are accumulated from live cells only, so the candidate set
//! is exactly the union of the live cells' neighbourhoods and the cost of a
//! generation follows the population, not the area it spans.

use crate::{Cell, Pattern};
use std::collections::HashMap;

/// Live neighbours needed for a dead cell to be born.
const BIRTH: u8 = 3;
/// Live neighbours that keep a live cell alive.
const SURVIVAL: [u8; 2] = [2, 3];

/// Advance `pattern` by one generation.
pub fn step(pattern: &Pattern) -> Pattern {
    let mut counts: HashMap<Cell, u8> = HashMap::with_capacity(pattern.len() * 8);
    for cell in pattern.cells() {
        for neighbor in cell.neighbors() {
            *counts.entry(neighbor).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(cell, n)| *n == BIRTH || (SURVIVAL.contains(n) && pattern.contains(cell)))
        .map(|(cell, _)| cell)
        .collect()
}

/// Advance `pattern` by `n` generations.
pub fn steps(pattern: &Pattern, n: u64) -> Pattern {
    let mut current = pattern.clone();
    for _ in 0..n {
        if current.is_empty() {
            break;
        }
        current = step(&current);
    }
    current
}
