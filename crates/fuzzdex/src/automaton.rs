//! Levenshtein automaton construction.
//!
//! Wraps `levenshtein_automata` DFAs with the literal prefix every match
//! must carry, and maintains the ladder of per-distance automata the
//! enumerator walks down as the competitive floor rises.

use std::sync::Arc;

use levenshtein_automata::{DFA, Distance, LevenshteinAutomatonBuilder, SINK_STATE};
use once_cell::sync::OnceCell;
use tantivy_fst::Automaton;

use crate::pattern::Pattern;

/// Largest edit distance the automaton ladder supports.
///
/// Determinized Levenshtein automata grow superlinearly with the distance;
/// above this ceiling the enumerator falls back to the linear scan.
pub const MAX_AUTOMATON_DISTANCE: u32 = 2;

// Parameterizing a LevenshteinAutomatonBuilder is expensive; the builders
// are shared process-wide, one per distance, without transpositions.
static LEV_BUILDERS: [OnceCell<LevenshteinAutomatonBuilder>; 3] =
    [OnceCell::new(), OnceCell::new(), OnceCell::new()];

fn lev_builder(distance: u8) -> &'static LevenshteinAutomatonBuilder {
    LEV_BUILDERS[distance as usize]
        .get_or_init(|| LevenshteinAutomatonBuilder::new(distance, false))
}

/// A literal byte prefix concatenated in front of a Levenshtein DFA.
///
/// Accepts exactly `prefix · L(dfa)`: the input must spell out `prefix`
/// byte-for-byte, after which the remainder is run through the DFA. With an
/// empty prefix this is the bare DFA.
pub(crate) struct PrefixedDfa {
    prefix: Vec<u8>,
    dfa: DFA,
}

/// State for [`PrefixedDfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixedState {
    /// Matched this many prefix bytes; always less than the prefix length.
    Prefix(usize),
    /// Handed off to the Levenshtein DFA. The DFA sink doubles as the dead
    /// state for prefix mismatches.
    Lev(u32),
}

impl PrefixedDfa {
    pub(crate) fn new(prefix: Vec<u8>, dfa: DFA) -> Self {
        Self { prefix, dfa }
    }

    /// Runs a whole key through the automaton.
    pub(crate) fn matches(&self, key: &[u8]) -> bool {
        let mut state = self.start();
        for &byte in key {
            if !self.can_match(&state) {
                return false;
            }
            state = self.accept(&state, byte);
        }
        self.is_match(&state)
    }
}

impl Automaton for PrefixedDfa {
    type State = PrefixedState;

    fn start(&self) -> PrefixedState {
        if self.prefix.is_empty() {
            PrefixedState::Lev(self.dfa.initial_state())
        } else {
            PrefixedState::Prefix(0)
        }
    }

    fn is_match(&self, state: &PrefixedState) -> bool {
        match *state {
            PrefixedState::Prefix(_) => false,
            PrefixedState::Lev(s) => matches!(self.dfa.distance(s), Distance::Exact(_)),
        }
    }

    fn can_match(&self, state: &PrefixedState) -> bool {
        match *state {
            PrefixedState::Prefix(_) => true,
            PrefixedState::Lev(s) => s != SINK_STATE,
        }
    }

    fn accept(&self, state: &PrefixedState, byte: u8) -> PrefixedState {
        match *state {
            PrefixedState::Prefix(pos) => {
                if self.prefix[pos] == byte {
                    if pos + 1 == self.prefix.len() {
                        PrefixedState::Lev(self.dfa.initial_state())
                    } else {
                        PrefixedState::Prefix(pos + 1)
                    }
                } else {
                    PrefixedState::Lev(SINK_STATE)
                }
            }
            PrefixedState::Lev(s) => PrefixedState::Lev(self.dfa.transition(s, byte)),
        }
    }
}

/// The ladder of prefix-prepended automata `A[0..=k]`.
///
/// Rungs are built lazily and exactly once: extending the ladder never
/// touches existing rungs, so matchers handed out earlier stay valid.
pub(crate) struct DfaLadder {
    rungs: Vec<Arc<PrefixedDfa>>,
}

impl DfaLadder {
    pub(crate) fn new() -> Self {
        Self { rungs: Vec::new() }
    }

    /// Builds rungs up to `max_edits`, reusing any already built.
    ///
    /// Callers guarantee `max_edits <= MAX_AUTOMATON_DISTANCE`; larger
    /// budgets are served by the linear scan instead.
    pub(crate) fn ensure(&mut self, pattern: &Pattern, max_edits: u32) {
        debug_assert!(max_edits <= MAX_AUTOMATON_DISTANCE);
        while self.rungs.len() <= max_edits as usize {
            let distance = self.rungs.len() as u8;
            let dfa = lev_builder(distance).build_dfa(pattern.suffix());
            self.rungs.push(Arc::new(PrefixedDfa::new(
                pattern.prefix_bytes().to_vec(),
                dfa,
            )));
        }
    }

    /// The structural automaton for the given edit budget.
    pub(crate) fn rung(&self, edits: u32) -> Arc<PrefixedDfa> {
        Arc::clone(&self.rungs[edits as usize])
    }

    /// The runnable matchers `R[0..=edits]`, ascending.
    pub(crate) fn rungs_up_to(&self, edits: u32) -> Vec<Arc<PrefixedDfa>> {
        self.rungs[..=edits as usize].iter().map(Arc::clone).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixed(prefix: &str, suffix: &str, distance: u8) -> PrefixedDfa {
        PrefixedDfa::new(
            prefix.as_bytes().to_vec(),
            lev_builder(distance).build_dfa(suffix),
        )
    }

    #[test]
    fn bare_dfa_matches_within_distance() {
        let a = prefixed("", "hello", 1);
        assert!(a.matches(b"hello"));
        assert!(a.matches(b"helo"));
        assert!(a.matches(b"hellos"));
        assert!(!a.matches(b"help!"));
        assert!(!a.matches(b"world"));
    }

    #[test]
    fn prefix_is_literal() {
        let a = prefixed("he", "llo", 1);
        assert!(a.matches(b"hello"));
        assert!(a.matches(b"helo"));
        // One edit in the prefix would be within total distance 1, but the
        // prefix admits no edits at all.
        assert!(!a.matches(b"xello"));
        assert!(!a.matches(b"h"));
    }

    #[test]
    fn distance_zero_is_exact() {
        let a = prefixed("", "term", 0);
        assert!(a.matches(b"term"));
        assert!(!a.matches(b"terms"));
        assert!(!a.matches(b"ter"));
    }

    #[test]
    fn empty_suffix_accepts_short_extensions() {
        // Prefix covers the whole pattern; the DFA accepts up to `distance`
        // trailing characters.
        let a = prefixed("foo", "", 1);
        assert!(a.matches(b"foo"));
        assert!(a.matches(b"food"));
        assert!(!a.matches(b"foods"));
        assert!(!a.matches(b"fo"));
    }

    #[test]
    fn edits_are_counted_per_character_not_per_byte() {
        let a = prefixed("", "café", 1);
        assert!(a.matches("café".as_bytes()));
        assert!(a.matches(b"cafe"));
        assert!(a.matches("caffé".as_bytes()));
        assert!(!a.matches(b"coffee"));
    }

    #[test]
    fn transposition_costs_two_edits() {
        let a = prefixed("", "abcd", 1);
        assert!(!a.matches(b"abdc"));
        let b = prefixed("", "abcd", 2);
        assert!(b.matches(b"abdc"));
    }

    #[test]
    fn can_match_tracks_the_sink() {
        let a = prefixed("he", "llo", 1);
        let mut state = a.start();
        assert!(a.can_match(&state));
        state = a.accept(&state, b'x');
        assert!(!a.can_match(&state));
    }

    #[test]
    fn ladder_is_lazy_and_identity_stable() {
        let pattern = Pattern::new("hello", 1);
        let mut ladder = DfaLadder::new();
        ladder.ensure(&pattern, 1);
        let rung0 = ladder.rung(0);
        let rung1 = ladder.rung(1);

        ladder.ensure(&pattern, 2);
        assert!(Arc::ptr_eq(&rung0, &ladder.rung(0)));
        assert!(Arc::ptr_eq(&rung1, &ladder.rung(1)));
        assert_eq!(ladder.rungs_up_to(2).len(), 3);
    }

    #[test]
    fn ladder_languages_are_nested() {
        let pattern = Pattern::new("hello", 0);
        let mut ladder = DfaLadder::new();
        ladder.ensure(&pattern, 2);
        for key in [&b"hello"[..], b"helo", b"hell", b"hel", b"yello", b"yell"] {
            let accepted: Vec<bool> = (0..=2).map(|k| ladder.rung(k).matches(key)).collect();
            // Once a rung accepts, every higher rung must accept too.
            for pair in accepted.windows(2) {
                assert!(pair[1] || !pair[0], "non-nested acceptance for {key:?}");
            }
        }
        assert!(ladder.rung(2).matches(b"hel"));
        assert!(!ladder.rung(1).matches(b"hel"));
    }
}
