//! The adaptive fuzzy term enumerator.

use std::{cell::Cell, rc::Rc, sync::Arc};

use fuzzdex_dict::{SeekOutcome, TermCursor};

use crate::{
    automaton::{DfaLadder, MAX_AUTOMATON_DISTANCE},
    error::FuzzyError,
    fuzzy::AutomatonFuzzyMatcher,
    linear::LinearFuzzyMatcher,
    params::FuzzyParams,
    pattern::Pattern,
    scan::{AcceptStatus, FilteredScan, TermFilter},
};

/// Competitive floor published by the consumer.
///
/// Holds the highest boost that can no longer affect the consumer's
/// ranking. The enumerator reads it after every emission and tightens its
/// edit budget when keys at the current budget can no longer compete.
///
/// Cloning shares the underlying cell. Single-threaded by design: the
/// consumer writes between pulls, the enumerator reads inside them.
#[derive(Debug, Clone)]
pub struct CompetitiveFloor(Rc<Cell<f32>>);

impl CompetitiveFloor {
    /// Creates a floor at negative infinity: everything is competitive.
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(f32::NEG_INFINITY)))
    }

    /// Publishes the highest boost that can no longer affect results.
    pub fn publish(&self, max_non_competitive_boost: f32) {
        self.0.set(max_non_competitive_boost);
    }

    /// The current floor value.
    pub fn get(&self) -> f32 {
        self.0.get()
    }
}

impl Default for CompetitiveFloor {
    fn default() -> Self {
        Self::new()
    }
}

/// The backing matcher currently driving the scan.
enum Backing {
    Automaton(AutomatonFuzzyMatcher),
    Linear(LinearFuzzyMatcher),
}

impl TermFilter for Backing {
    fn accept(&mut self, key: &[u8]) -> AcceptStatus {
        match self {
            Backing::Automaton(matcher) => matcher.accept(key),
            Backing::Linear(matcher) => matcher.accept(key),
        }
    }

    fn next_seek_key(&mut self, prev: Option<&[u8]>) -> Option<Vec<u8>> {
        match self {
            Backing::Automaton(matcher) => matcher.next_seek_key(prev),
            Backing::Linear(matcher) => matcher.next_seek_key(prev),
        }
    }

    fn boost(&self) -> f32 {
        match self {
            Backing::Automaton(matcher) => matcher.boost(),
            Backing::Linear(matcher) => matcher.boost(),
        }
    }
}

/// Enumerates, in byte order, every term within a fuzzy similarity of a
/// pattern, tagging each with its competitive boost.
///
/// The enumerator starts from the edit budget implied by the similarity
/// threshold: within the automaton ladder's ceiling it scans with
/// DFA-guided dictionary seeks, above it it scans the prefix range
/// linearly. Whenever the consumer raises the [`CompetitiveFloor`] far
/// enough, the budget shrinks and a tighter automaton takes over the scan,
/// resuming strictly after the last emitted key.
///
/// # Example
///
/// ```
/// use fuzzdex::{FuzzyParams, FuzzyTermEnumerator};
/// use fuzzdex_dict::MemoryTermDictionary;
///
/// let dict = MemoryTermDictionary::from_terms(["foobar", "foobaz", "fowl"]);
/// let params = FuzzyParams::new("foobar").with_min_similarity(0.5);
/// let mut terms = FuzzyTermEnumerator::new(dict.cursor(), params).unwrap();
///
/// let mut matched = Vec::new();
/// while terms.advance().unwrap() {
///     matched.push((terms.key().to_vec(), terms.boost()));
/// }
/// assert_eq!(matched[0].0, b"foobar");
/// assert_eq!(matched[0].1, 1.0);
/// ```
pub struct FuzzyTermEnumerator<C: TermCursor> {
    cursor: C,
    pattern: Arc<Pattern>,
    min_similarity: f32,
    scale: f32,
    /// Current edit budget; only ever shrinks.
    max_edits: u32,
    ladder: DfaLadder,
    backing: Backing,
    scan: FilteredScan,
    floor: CompetitiveFloor,
    last_floor: f32,
    boost: f32,
    current: Vec<u8>,
    positioned: bool,
    exhausted: bool,
}

impl<C: TermCursor> std::fmt::Debug for FuzzyTermEnumerator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyTermEnumerator")
            .field("min_similarity", &self.min_similarity)
            .field("scale", &self.scale)
            .field("max_edits", &self.max_edits)
            .field("last_floor", &self.last_floor)
            .field("boost", &self.boost)
            .field("current", &self.current)
            .field("positioned", &self.positioned)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<C: TermCursor> FuzzyTermEnumerator<C> {
    /// Creates an enumerator over `cursor` for the given parameters.
    ///
    /// Fails with [`FuzzyError::InvalidArgument`] when the minimum
    /// similarity is outside `[0, 1)`; nothing is allocated in that case.
    pub fn new(cursor: C, params: FuzzyParams) -> Result<Self, FuzzyError> {
        params.validate()?;

        let pattern = Arc::new(Pattern::new(&params.text, params.prefix_len));
        let min_similarity = params.min_similarity;
        let scale = 1.0 / (1.0 - min_similarity);
        let max_edits = ((1.0 - min_similarity) * pattern.char_len() as f32) as u32;

        let mut ladder = DfaLadder::new();
        let backing = if max_edits <= MAX_AUTOMATON_DISTANCE {
            ladder.ensure(&pattern, max_edits);
            Backing::Automaton(AutomatonFuzzyMatcher::new(
                ladder.rung(max_edits),
                ladder.rungs_up_to(max_edits),
                Arc::clone(&pattern),
                min_similarity,
                scale,
                None,
            ))
        } else {
            Backing::Linear(LinearFuzzyMatcher::new(
                Arc::clone(&pattern),
                min_similarity,
                scale,
            ))
        };

        let floor = CompetitiveFloor::new();
        let last_floor = floor.get();

        Ok(Self {
            cursor,
            pattern,
            min_similarity,
            scale,
            max_edits,
            ladder,
            backing,
            scan: FilteredScan::new(),
            floor,
            last_floor,
            boost: 0.0,
            current: Vec::new(),
            positioned: false,
            exhausted: false,
        })
    }

    /// A handle to the competitive floor this enumerator watches.
    pub fn competitive_floor(&self) -> CompetitiveFloor {
        self.floor.clone()
    }

    /// Steps to the next matching term.
    ///
    /// Returns `false` once the last match has been emitted; the enumerator
    /// is then terminally exhausted. On `true`, [`key`], [`boost`], and the
    /// dictionary passthroughs describe the emitted term until the next
    /// call.
    ///
    /// [`key`]: FuzzyTermEnumerator::key
    /// [`boost`]: FuzzyTermEnumerator::boost
    pub fn advance(&mut self) -> Result<bool, FuzzyError> {
        if self.exhausted {
            return Ok(false);
        }

        if self.scan.pull(&mut self.cursor, &mut self.backing)? {
            self.boost = self.backing.boost();
            self.current.clear();
            self.current.extend_from_slice(self.cursor.key());
            self.positioned = true;
        } else {
            self.exhausted = true;
            self.positioned = false;
        }

        let floor = self.floor.get();
        if floor != self.last_floor {
            self.last_floor = floor;
            if !self.exhausted {
                self.tighten(floor);
            }
        }

        Ok(!self.exhausted)
    }

    /// The current term's key.
    ///
    /// # Panics
    ///
    /// Panics if the enumerator is not positioned on a term.
    pub fn key(&self) -> &[u8] {
        assert!(self.positioned, "enumerator is not positioned");
        &self.current
    }

    /// Boost of the current term: 1.0 for the pattern itself, otherwise
    /// `(similarity - min_similarity) / (1 - min_similarity)`.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Number of documents containing the current term.
    pub fn doc_freq(&self) -> u32 {
        self.cursor.doc_freq()
    }

    /// Ordinal of the current term in the dictionary.
    pub fn ord(&self) -> u64 {
        self.cursor.ord()
    }

    /// Repositions the borrowed cursor on the smallest term `>= target`.
    ///
    /// The next [`advance`] continues from there unless the backing matcher
    /// requests a seek of its own.
    ///
    /// [`advance`]: FuzzyTermEnumerator::advance
    pub fn seek_ceil(&mut self, target: &[u8]) -> Result<SeekOutcome, FuzzyError> {
        Ok(self.cursor.seek_ceil(target)?)
    }

    /// Repositions the borrowed cursor on the term with the given ordinal.
    pub fn seek_ord(&mut self, ord: u64) -> Result<SeekOutcome, FuzzyError> {
        Ok(self.cursor.seek_ord(ord)?)
    }

    /// Shrinks the edit budget to the largest value still competitive
    /// against `floor`, swapping in a tighter automaton when it fits the
    /// ladder.
    fn tighten(&mut self, floor: f32) {
        let previous = self.max_edits;
        while self.max_edits > 0 && floor >= self.max_boost_at(self.max_edits) {
            self.max_edits -= 1;
        }
        if previous == self.max_edits || self.max_edits > MAX_AUTOMATON_DISTANCE {
            // TODO: when the budget shrinks but stays above the ladder
            // ceiling, re-derive the linear matcher's distance thresholds
            // so its fail-fast trips earlier.
            return;
        }

        self.ladder.ensure(&self.pattern, self.max_edits);
        self.backing = Backing::Automaton(AutomatonFuzzyMatcher::new(
            self.ladder.rung(self.max_edits),
            self.ladder.rungs_up_to(self.max_edits),
            Arc::clone(&self.pattern),
            self.min_similarity,
            self.scale,
            Some(self.current.clone()),
        ));
        self.scan = FilteredScan::new();
    }

    /// Highest boost any key at exactly `edits` edits can carry.
    fn max_boost_at(&self, edits: u32) -> f32 {
        let similarity = 1.0 - edits as f32 / self.pattern.char_len() as f32;
        (similarity - self.min_similarity) * self.scale
    }
}

#[cfg(test)]
mod tests {
    use fuzzdex_dict::MemoryTermDictionary;

    use super::*;

    #[test]
    fn construction_rejects_bad_similarity() {
        let dict = MemoryTermDictionary::from_terms(["a"]);
        for bad in [1.0, 1.5, -0.1, f32::NAN] {
            let params = FuzzyParams::new("a").with_min_similarity(bad);
            let err = FuzzyTermEnumerator::new(dict.cursor(), params).unwrap_err();
            assert!(matches!(err, FuzzyError::InvalidArgument(_)));
        }
    }

    #[test]
    fn floor_handle_is_shared() {
        let floor = CompetitiveFloor::new();
        assert_eq!(floor.get(), f32::NEG_INFINITY);
        let other = floor.clone();
        other.publish(0.25);
        assert_eq!(floor.get(), 0.25);
    }

    #[test]
    fn exhaustion_is_terminal() {
        let dict = MemoryTermDictionary::from_terms(["hello"]);
        let params = FuzzyParams::new("hello").with_min_similarity(0.5);
        let mut terms = FuzzyTermEnumerator::new(dict.cursor(), params).unwrap();

        assert!(terms.advance().unwrap());
        assert_eq!(terms.key(), b"hello");
        assert!(!terms.advance().unwrap());

        // A late floor change must not revive the scan.
        terms.competitive_floor().publish(0.9);
        assert!(!terms.advance().unwrap());
    }

    #[test]
    #[should_panic(expected = "not positioned")]
    fn key_panics_before_first_advance() {
        let dict = MemoryTermDictionary::from_terms(["a"]);
        let terms =
            FuzzyTermEnumerator::new(dict.cursor(), FuzzyParams::new("a")).unwrap();
        let _ = terms.key();
    }

    #[test]
    fn doc_freq_and_ord_pass_through() {
        let dict = MemoryTermDictionary::from_entries([("hello", 7), ("help", 2)]);
        let params = FuzzyParams::new("hello").with_min_similarity(0.5);
        let mut terms = FuzzyTermEnumerator::new(dict.cursor(), params).unwrap();

        assert!(terms.advance().unwrap());
        assert_eq!(terms.key(), b"hello");
        assert_eq!(terms.doc_freq(), 7);
        assert_eq!(terms.ord(), 0);
    }
}
