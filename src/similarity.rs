//! Query normalization and the matching-blocks similarity ratio.
//!
//! # Ratio
//!
//! The ratio of two strings is `2 * M / T`, where `T` is the total number of
//! characters in both and `M` the number of characters covered by their
//! matching blocks. Blocks are found greedily: take the longest common
//! contiguous run (earliest in `a`, then earliest in `b` on ties), then
//! repeat on the pieces to its left and to its right. Two empty strings
//! have a ratio of `1.0`.
//!
//! Lengths are counted in Unicode scalar values, so Cyrillic and Latin text
//! score the same way.

use std::collections::HashMap;

/// Canonical comparison form: lowercase, apostrophes removed, whitespace
/// runs collapsed to one space, trimmed. Other punctuation and digits stay.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars().filter(|&c| c != '\'') {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

/// A run of `len` equal characters starting at `a` in the first string and
/// `b` in the second (character offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub len: usize,
}

/// Similarity of `a` and `b` in `[0.0, 1.0]`.
///
/// Not symmetric: `ratio(a, b)` and `ratio(b, a)` can differ. The matcher
/// always passes the query first.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = BlockFinder::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.len)
        .sum();
    2.0 * matched as f64 / total as f64
}

/// Non-overlapping matching blocks of `a` and `b`, ordered by position, with
/// adjacent blocks merged.
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchBlock> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    BlockFinder::new(&a, &b).matching_blocks()
}

struct BlockFinder<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of every character in `b`, ascending.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'s> BlockFinder<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }
        Self { a, b, b_index }
    }

    /// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// `run_ending_at[j]` holds the length of the common run ending at
    /// `a[i - 1]` and `b[j]`; it is rebuilt for each `i`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let mut best = MatchBlock {
            a: alo,
            b: blo,
            len: 0,
        };
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_runs = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, k);
                    if k > best.len {
                        best = MatchBlock {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            len: k,
                        };
                    }
                }
            }
            run_ending_at = next_runs;
        }
        best
    }

    fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.longest_match(alo, ahi, blo, bhi);
            if m.len == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.len < ahi && m.b + m.len < bhi {
                pending.push((m.a + m.len, ahi, m.b + m.len, bhi));
            }
        }
        blocks.sort_unstable_by_key(|m| (m.a, m.b));

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.len == block.a && last.b + last.len == block.b => {
                    last.len += block.len;
                }
                _ => merged.push(block),
            }
        }
        merged
    }
}
