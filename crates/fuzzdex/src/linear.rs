//! Linear fallback matching.
//!
//! When the initial edit budget exceeds the automaton ladder's ceiling, the
//! enumerator scans the sub-range of keys sharing the literal prefix and
//! runs a fail-fast banded Levenshtein DP against each one.

use std::{mem, str, sync::Arc};

use crate::pattern::Pattern;
use crate::scan::{AcceptStatus, TermFilter};

/// Sizing heuristic for the distance-threshold cache and the DP matrix:
/// roughly the longest word commonly found in an index. Longer keys grow
/// the matrix on demand.
pub(crate) const TYPICAL_LONGEST_WORD_IN_INDEX: usize = 19;

/// Matcher that walks the prefix range linearly.
///
/// The DP matrix is allocated once per matcher; its first dimension is
/// fixed by the pattern suffix and its second grows to the largest key seen.
/// The scalar decode buffer is likewise reused across keys.
pub(crate) struct LinearFuzzyMatcher {
    pattern: Arc<Pattern>,
    /// Pattern suffix scalars, the DP's fixed side.
    text: Vec<char>,
    min_similarity: f32,
    scale: f32,
    max_distances: [u32; TYPICAL_LONGEST_WORD_IN_INDEX],
    matrix: Vec<Vec<u32>>,
    decode_buf: Vec<char>,
    boost: f32,
}

impl LinearFuzzyMatcher {
    pub(crate) fn new(pattern: Arc<Pattern>, min_similarity: f32, scale: f32) -> Self {
        let text: Vec<char> = pattern.suffix().chars().collect();
        let mut max_distances = [0u32; TYPICAL_LONGEST_WORD_IN_INDEX];
        for (m, slot) in max_distances.iter_mut().enumerate() {
            *slot = max_distance_for(min_similarity, text.len(), pattern.prefix_len(), m);
        }
        let matrix = vec![vec![0u32; TYPICAL_LONGEST_WORD_IN_INDEX]; text.len() + 1];
        Self {
            pattern,
            text,
            min_similarity,
            scale,
            max_distances,
            matrix,
            decode_buf: Vec::new(),
            boost: 0.0,
        }
    }

    /// Largest edit distance a key of suffix length `m` may have and still
    /// beat the similarity threshold.
    fn max_distance(&self, m: usize) -> u32 {
        if m < TYPICAL_LONGEST_WORD_IN_INDEX {
            self.max_distances[m]
        } else {
            max_distance_for(
                self.min_similarity,
                self.text.len(),
                self.pattern.prefix_len(),
                m,
            )
        }
    }

    /// Similarity of the pattern suffix to `target`, or 0.0 as soon as the
    /// key is provably below the threshold.
    ///
    /// May return negative values when the distance exceeds the shorter
    /// length; callers gate on `> min_similarity` either way.
    fn similarity(&mut self, target: &[char]) -> f32 {
        let n = self.text.len();
        let m = target.len();
        let prefix_len = self.pattern.prefix_len();

        if n == 0 {
            // Nothing left to compare: the edits are exactly the target
            // suffix characters.
            return if prefix_len == 0 {
                0.0
            } else {
                1.0 - m as f32 / prefix_len as f32
            };
        }
        if m == 0 {
            return if prefix_len == 0 {
                0.0
            } else {
                1.0 - n as f32 / prefix_len as f32
            };
        }

        let max_distance = self.max_distance(m);

        // The length difference alone is a distance lower bound.
        if (max_distance as i64) < (n as i64 - m as i64).abs() {
            return 0.0;
        }

        if self.matrix[0].len() <= m {
            for row in &mut self.matrix {
                row.resize(m + 1, 0);
            }
        }

        for i in 0..=n {
            self.matrix[i][0] = i as u32;
        }
        for j in 0..=m {
            self.matrix[0][j] = j as u32;
        }

        for i in 1..=n {
            let text_char = self.text[i - 1];
            let mut row_min = m as u32;
            let (above, rest) = self.matrix.split_at_mut(i);
            let prev_row = &above[i - 1];
            let row = &mut rest[0];
            for j in 1..=m {
                let cost = u32::from(text_char != target[j - 1]);
                row[j] = (prev_row[j] + 1)
                    .min(row[j - 1] + 1)
                    .min(prev_row[j - 1] + cost);
                row_min = row_min.min(row[j]);
            }
            // Row minima are monotone non-decreasing once i exceeds the
            // band width, so the final distance cannot come back under the
            // threshold. Equal is still fine; only strictly greater aborts.
            if i as u32 > max_distance && row_min > max_distance {
                return 0.0;
            }
        }

        1.0 - self.matrix[n][m] as f32 / (prefix_len + n.min(m)) as f32
    }
}

fn max_distance_for(min_similarity: f32, n: usize, prefix_len: usize, m: usize) -> u32 {
    ((1.0 - min_similarity) * (n.min(m) + prefix_len) as f32) as u32
}

impl TermFilter for LinearFuzzyMatcher {
    fn accept(&mut self, key: &[u8]) -> AcceptStatus {
        if !key.starts_with(self.pattern.prefix_bytes()) {
            // The sorted scan has left the prefix range.
            return AcceptStatus::End;
        }
        let Ok(text) = str::from_utf8(key) else {
            // A non-UTF-8 key cannot be compared to a text pattern.
            return AcceptStatus::No;
        };

        let mut buf = mem::take(&mut self.decode_buf);
        buf.clear();
        buf.extend(text.chars());
        let similarity = self.similarity(&buf[self.pattern.prefix_len()..]);
        self.decode_buf = buf;

        if similarity > self.min_similarity {
            self.boost = (similarity - self.min_similarity) * self.scale;
            AcceptStatus::Yes
        } else {
            AcceptStatus::No
        }
    }

    fn next_seek_key(&mut self, prev: Option<&[u8]>) -> Option<Vec<u8>> {
        match prev {
            // Jump straight to the start of the prefix range; accept() never
            // requests another seek, so this is the only target.
            None => Some(self.pattern.prefix_bytes().to_vec()),
            Some(_) => None,
        }
    }

    fn boost(&self) -> f32 {
        self.boost
    }
}
