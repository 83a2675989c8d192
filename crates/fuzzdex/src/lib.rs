//! Fuzzy term enumeration over sorted term dictionaries.
//!
//! Given a pattern, a minimum similarity, and a required literal prefix,
//! [`FuzzyTermEnumerator`] streams every indexed term whose normalized
//! Levenshtein similarity to the pattern strictly exceeds the threshold, in
//! the dictionary's byte order, tagging each with a competitive boost.
//!
//! Two scan strategies back the enumeration. Within a small edit budget, a
//! ladder of Levenshtein automata (one per distance, concatenated behind
//! the literal prefix) guides the dictionary cursor with seeks that skip
//! whole non-matching ranges. Above the ladder's ceiling, the prefix range
//! is walked linearly with a fail-fast banded edit-distance DP. The
//! consumer can publish a rising [`CompetitiveFloor`]; when terms at the
//! current budget can no longer compete, the enumerator swaps in a tighter
//! automaton mid-scan and resumes strictly after the last emitted key.
//!
//! The dictionary itself is abstract: anything implementing
//! [`fuzzdex_dict::TermCursor`] works, from the bundled in-memory
//! dictionary to a real index segment.
//!
//! # Example
//!
//! ```
//! use fuzzdex::{FuzzyParams, FuzzyTermEnumerator};
//! use fuzzdex_dict::MemoryTermDictionary;
//!
//! let dict = MemoryTermDictionary::from_terms(["hello", "hellos", "help", "world"]);
//! let params = FuzzyParams::new("hello")
//!     .with_min_similarity(0.5)
//!     .with_prefix_len(2);
//! let mut terms = FuzzyTermEnumerator::new(dict.cursor(), params).unwrap();
//!
//! let mut matched = Vec::new();
//! while terms.advance().unwrap() {
//!     matched.push(String::from_utf8(terms.key().to_vec()).unwrap());
//! }
//! assert_eq!(matched, ["hello", "hellos"]);
//! ```

#![warn(missing_docs)]

mod automaton;
mod enumerator;
mod error;
mod fuzzy;
mod linear;
mod params;
mod pattern;
mod scan;

pub use automaton::MAX_AUTOMATON_DISTANCE;
pub use enumerator::{CompetitiveFloor, FuzzyTermEnumerator};
pub use error::FuzzyError;
pub use params::{DEFAULT_MIN_SIMILARITY, DEFAULT_PREFIX_LEN, FuzzyParams};
