//! The filtered scan protocol shared by the backing matchers.
//!
//! A matcher exposes two capabilities: classify a candidate key, and name
//! the next dictionary key worth looking at. [`FilteredScan`] drives a term
//! cursor through those capabilities one emission at a time, so the
//! automaton-backed and linear matchers share the same pull loop.

use fuzzdex_dict::{SeekOutcome, TermCursor};
use tantivy_fst::Automaton;

use crate::error::FuzzyError;

/// Classification of one candidate key by a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AcceptStatus {
    /// Emit the key; keep stepping the cursor linearly.
    Yes,
    /// Emit the key; ask the matcher where to seek next.
    YesAndSeek,
    /// Skip the key; keep stepping linearly.
    No,
    /// Skip the key; ask the matcher where to seek next.
    NoAndSeek,
    /// Neither this key nor anything after it can match.
    End,
}

/// The matcher capability consumed by [`FilteredScan`].
pub(crate) trait TermFilter {
    /// Classifies a candidate key, recording its boost when accepting.
    fn accept(&mut self, key: &[u8]) -> AcceptStatus;

    /// The next cursor target. `prev` is `None` on the initial pull.
    /// Returning `None` ends the scan.
    fn next_seek_key(&mut self, prev: Option<&[u8]>) -> Option<Vec<u8>>;

    /// Boost recorded for the most recently accepted key.
    fn boost(&self) -> f32;
}

/// Drives a term cursor through a [`TermFilter`], one emission at a time.
pub(crate) struct FilteredScan {
    pending_seek: bool,
    positioned: bool,
}

impl FilteredScan {
    pub(crate) fn new() -> Self {
        Self {
            pending_seek: true,
            positioned: false,
        }
    }

    /// Advances to the next accepted key.
    ///
    /// Returns `false` when the scan is exhausted; on `true` the cursor
    /// sits on the accepted key. I/O errors propagate unchanged.
    pub(crate) fn pull<C, F>(&mut self, cursor: &mut C, filter: &mut F) -> Result<bool, FuzzyError>
    where
        C: TermCursor,
        F: TermFilter,
    {
        loop {
            let on_key = if self.pending_seek {
                self.pending_seek = false;
                let target = {
                    let prev = if self.positioned {
                        Some(cursor.key())
                    } else {
                        None
                    };
                    filter.next_seek_key(prev)
                };
                let Some(target) = target else {
                    return Ok(false);
                };
                !matches!(cursor.seek_ceil(&target)?, SeekOutcome::End)
            } else {
                cursor.advance()?
            };
            if !on_key {
                return Ok(false);
            }
            self.positioned = true;

            match filter.accept(cursor.key()) {
                AcceptStatus::Yes => return Ok(true),
                AcceptStatus::YesAndSeek => {
                    self.pending_seek = true;
                    return Ok(true);
                }
                AcceptStatus::No => {}
                AcceptStatus::NoAndSeek => self.pending_seek = true,
                AcceptStatus::End => return Ok(false),
            }
        }
    }
}

/// Smallest byte string strictly greater than `after` from which
/// `automaton` can still reach an accept state.
///
/// Walks `after` through the automaton recording the state at every depth,
/// then takes the smallest viable extension byte, or failing that diverges
/// upward at the deepest position admitting a larger viable byte. Every
/// accepted key greater than `after` compares `>=` the returned target, so
/// seeking a sorted cursor to it never skips a match. `None` means the
/// automaton's language is exhausted above `after`.
pub(crate) fn next_viable_key<A: Automaton>(automaton: &A, after: &[u8]) -> Option<Vec<u8>> {
    let mut states = Vec::with_capacity(after.len() + 1);
    states.push(automaton.start());

    let mut depth = 0;
    while depth < after.len() {
        if !automaton.can_match(&states[depth]) {
            break;
        }
        let next = automaton.accept(&states[depth], after[depth]);
        states.push(next);
        depth += 1;
    }

    // The whole key ran through without dying: the closest candidate is the
    // smallest single-byte extension that stays alive.
    if depth == after.len() && automaton.can_match(&states[depth]) {
        for byte in 0..=u8::MAX {
            if automaton.can_match(&automaton.accept(&states[depth], byte)) {
                let mut key = after.to_vec();
                key.push(byte);
                return Some(key);
            }
        }
    }

    // Diverge upward, deepest position first: the longer the shared prefix
    // with `after`, the smaller the resulting key.
    for pos in (0..depth).rev() {
        let Some(first) = after[pos].checked_add(1) else {
            continue;
        };
        for byte in first..=u8::MAX {
            if automaton.can_match(&automaton.accept(&states[pos], byte)) {
                let mut key = after[..pos].to_vec();
                key.push(byte);
                return Some(key);
            }
        }
    }

    None
}
