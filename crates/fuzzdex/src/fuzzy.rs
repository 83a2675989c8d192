//! Automaton-backed fuzzy matching.
//!
//! Enumeration is logarithmic in the number of indexed terms (the
//! structural automaton collapses whole dictionary ranges per seek) and
//! acceptance is linear in the key length, as opposed to the quadratic DP
//! of the linear path.

use std::sync::Arc;

use crate::automaton::PrefixedDfa;
use crate::pattern::Pattern;
use crate::scan::{AcceptStatus, TermFilter, next_viable_key};

/// Counts Unicode scalar values in a UTF-8 key without decoding it.
fn scalar_len(key: &[u8]) -> usize {
    key.iter().filter(|&&byte| (byte as i8) >= -0x40).count()
}

/// Matcher backed by the Levenshtein automaton ladder.
///
/// The top rung guides dictionary seeks; acceptance probes the rungs in
/// ascending distance order, so the first accepting rung is the candidate's
/// exact edit distance and yields its highest possible similarity.
pub(crate) struct AutomatonFuzzyMatcher {
    /// `A[k]`: the structural automaton used for seek computation.
    structural: Arc<PrefixedDfa>,
    /// `R[0..=k]`: runnable matchers, one per edit distance.
    matchers: Vec<Arc<PrefixedDfa>>,
    pattern: Arc<Pattern>,
    min_similarity: f32,
    scale: f32,
    /// Set when this matcher replaces another mid-scan; the first seek
    /// resumes strictly after it.
    resume_key: Option<Vec<u8>>,
    boost: f32,
}

impl AutomatonFuzzyMatcher {
    pub(crate) fn new(
        structural: Arc<PrefixedDfa>,
        matchers: Vec<Arc<PrefixedDfa>>,
        pattern: Arc<Pattern>,
        min_similarity: f32,
        scale: f32,
        resume_key: Option<Vec<u8>>,
    ) -> Self {
        Self {
            structural,
            matchers,
            pattern,
            min_similarity,
            scale,
            resume_key,
            boost: 0.0,
        }
    }
}

impl TermFilter for AutomatonFuzzyMatcher {
    /// Finds the smallest rung that accepts the key.
    fn accept(&mut self, key: &[u8]) -> AcceptStatus {
        if key == self.pattern.bytes() {
            self.boost = 1.0;
            return AcceptStatus::YesAndSeek;
        }

        for (edits, rung) in self.matchers.iter().enumerate().skip(1) {
            if rung.matches(key) {
                let shorter = scalar_len(key).min(self.pattern.char_len());
                let similarity = 1.0 - edits as f32 / shorter as f32;
                if similarity > self.min_similarity {
                    self.boost = (similarity - self.min_similarity) * self.scale;
                    return AcceptStatus::YesAndSeek;
                }
                return AcceptStatus::NoAndSeek;
            }
        }

        AcceptStatus::NoAndSeek
    }

    fn next_seek_key(&mut self, prev: Option<&[u8]>) -> Option<Vec<u8>> {
        match prev {
            Some(prev) => next_viable_key(&*self.structural, prev),
            None => match self.resume_key.take() {
                Some(resume) => next_viable_key(&*self.structural, &resume),
                None => Some(self.pattern.prefix_bytes().to_vec()),
            },
        }
    }

    fn boost(&self) -> f32 {
        self.boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::DfaLadder;

    fn matcher(
        text: &str,
        prefix_len: usize,
        min_similarity: f32,
        max_edits: u32,
        resume_key: Option<Vec<u8>>,
    ) -> AutomatonFuzzyMatcher {
        let pattern = Arc::new(Pattern::new(text, prefix_len));
        let mut ladder = DfaLadder::new();
        ladder.ensure(&pattern, max_edits);
        let scale = 1.0 / (1.0 - min_similarity);
        AutomatonFuzzyMatcher::new(
            ladder.rung(max_edits),
            ladder.rungs_up_to(max_edits),
            pattern,
            min_similarity,
            scale,
            resume_key,
        )
    }

    #[test]
    fn exact_key_gets_full_boost() {
        let mut m = matcher("hello", 0, 0.5, 1, None);
        assert_eq!(m.accept(b"hello"), AcceptStatus::YesAndSeek);
        assert_eq!(m.boost(), 1.0);
    }

    #[test]
    fn one_edit_scales_the_boost() {
        let mut m = matcher("hello", 0, 0.5, 1, None);
        assert_eq!(m.accept(b"hellos"), AcceptStatus::YesAndSeek);
        // sim = 1 - 1/5 = 0.8; boost = (0.8 - 0.5) * 2.
        assert!((m.boost() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn similarity_at_the_threshold_is_rejected() {
        let mut m = matcher("hello", 2, 0.8, 1, None);
        // "hellos" sits at exactly sim = 0.8; strict comparison excludes it.
        assert_eq!(m.accept(b"hellos"), AcceptStatus::NoAndSeek);
    }

    #[test]
    fn key_outside_every_rung_is_rejected() {
        let mut m = matcher("hello", 0, 0.5, 1, None);
        assert_eq!(m.accept(b"help!"), AcceptStatus::NoAndSeek);
    }

    #[test]
    fn smallest_accepting_rung_wins() {
        // "helo" is at distance 1; with k = 2 the rung-1 similarity must be
        // used, not the looser rung-2 one.
        let mut m = matcher("hello", 0, 0.5, 2, None);
        assert_eq!(m.accept(b"helo"), AcceptStatus::YesAndSeek);
        let sim = 1.0 - 1.0 / 4.0;
        assert!((m.boost() - (sim - 0.5) * 2.0).abs() < 1e-6);
    }

    #[test]
    fn initial_seek_targets_the_prefix() {
        let mut m = matcher("hello", 2, 0.5, 1, None);
        assert_eq!(m.next_seek_key(None), Some(b"he".to_vec()));
    }

    #[test]
    fn resume_key_seeks_strictly_past_itself() {
        let mut m = matcher("hello", 0, 0.5, 1, Some(b"hello".to_vec()));
        let target = m.next_seek_key(None).expect("language not exhausted");
        assert!(target.as_slice() > &b"hello"[..]);
    }
}
