//! Term dictionary contract for the fuzzdex matching engine.
//!
//! An inverted index exposes its term dictionary as a sorted, seekable
//! cursor over byte keys. This crate defines that contract ([`TermCursor`])
//! and provides a self-contained in-memory implementation
//! ([`MemoryTermDictionary`]) used by tests and by consumers that do not
//! have a real index at hand.
//!
//! # Example
//!
//! ```
//! use fuzzdex_dict::{MemoryTermDictionary, SeekOutcome, TermCursor};
//!
//! let dict = MemoryTermDictionary::from_terms(["apple", "banana", "cherry"]);
//! let mut cursor = dict.cursor();
//!
//! assert_eq!(cursor.seek_ceil(b"b").unwrap(), SeekOutcome::Ceiled);
//! assert_eq!(cursor.key(), b"banana");
//! assert!(cursor.advance().unwrap());
//! assert_eq!(cursor.key(), b"cherry");
//! assert!(!cursor.advance().unwrap());
//! ```

#![warn(missing_docs)]

use std::io;

/// Outcome of seeking a cursor to a target key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The cursor is positioned on a term equal to the target.
    Found,
    /// The cursor is positioned on the smallest term greater than the target.
    Ceiled,
    /// No term at or after the target exists.
    End,
}

/// A sorted cursor over the terms of one indexed field.
///
/// Keys are raw bytes ordered byte-lexicographically. The cursor starts
/// unpositioned; it becomes positioned after a successful [`advance`] or a
/// seek that did not return [`SeekOutcome::End`]. [`key`], [`doc_freq`], and
/// [`ord`] are only meaningful while positioned.
///
/// Any I/O failure leaves the cursor in an indeterminate state; callers
/// should discard it.
///
/// [`advance`]: TermCursor::advance
/// [`key`]: TermCursor::key
/// [`doc_freq`]: TermCursor::doc_freq
/// [`ord`]: TermCursor::ord
pub trait TermCursor {
    /// Positions the cursor on the smallest term `>= target`.
    fn seek_ceil(&mut self, target: &[u8]) -> io::Result<SeekOutcome>;

    /// Steps to the next term in byte order. Returns `false` at the end of
    /// the dictionary. An unpositioned cursor steps to the first term.
    fn advance(&mut self) -> io::Result<bool>;

    /// The current term's key.
    ///
    /// # Panics
    ///
    /// May panic if the cursor is not positioned.
    fn key(&self) -> &[u8];

    /// Number of documents containing the current term.
    fn doc_freq(&self) -> u32;

    /// Ordinal of the current term within the dictionary.
    fn ord(&self) -> u64;

    /// Positions the cursor on the term with the given ordinal.
    fn seek_ord(&mut self, ord: u64) -> io::Result<SeekOutcome>;
}

impl<T: TermCursor + ?Sized> TermCursor for &mut T {
    fn seek_ceil(&mut self, target: &[u8]) -> io::Result<SeekOutcome> {
        (**self).seek_ceil(target)
    }

    fn advance(&mut self) -> io::Result<bool> {
        (**self).advance()
    }

    fn key(&self) -> &[u8] {
        (**self).key()
    }

    fn doc_freq(&self) -> u32 {
        (**self).doc_freq()
    }

    fn ord(&self) -> u64 {
        (**self).ord()
    }

    fn seek_ord(&mut self, ord: u64) -> io::Result<SeekOutcome> {
        (**self).seek_ord(ord)
    }
}

/// An in-memory term dictionary: sorted, deduplicated, with per-term
/// document frequencies.
#[derive(Debug, Clone, Default)]
pub struct MemoryTermDictionary {
    terms: Vec<(Vec<u8>, u32)>,
}

impl MemoryTermDictionary {
    /// Builds a dictionary from string terms, each with a doc frequency of 1.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_entries(terms.into_iter().map(|t| (t.as_ref().to_string(), 1)))
    }

    /// Builds a dictionary from `(term, doc_freq)` entries.
    ///
    /// Entries are sorted by key; duplicate keys keep the last frequency.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut terms: Vec<(Vec<u8>, u32)> = entries
            .into_iter()
            .map(|(t, df)| (t.as_ref().as_bytes().to_vec(), df))
            .collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));
        terms.dedup_by(|a, b| {
            if a.0 == b.0 {
                b.1 = a.1;
                true
            } else {
                false
            }
        });
        Self { terms }
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Opens a cursor over the dictionary.
    pub fn cursor(&self) -> MemoryTermCursor<'_> {
        MemoryTermCursor {
            dict: self,
            pos: None,
        }
    }
}

/// Cursor over a [`MemoryTermDictionary`].
#[derive(Debug)]
pub struct MemoryTermCursor<'a> {
    dict: &'a MemoryTermDictionary,
    pos: Option<usize>,
}

impl TermCursor for MemoryTermCursor<'_> {
    fn seek_ceil(&mut self, target: &[u8]) -> io::Result<SeekOutcome> {
        let idx = self
            .dict
            .terms
            .partition_point(|(key, _)| key.as_slice() < target);
        if idx == self.dict.terms.len() {
            self.pos = None;
            return Ok(SeekOutcome::End);
        }
        self.pos = Some(idx);
        if self.dict.terms[idx].0 == target {
            Ok(SeekOutcome::Found)
        } else {
            Ok(SeekOutcome::Ceiled)
        }
    }

    fn advance(&mut self) -> io::Result<bool> {
        let next = match self.pos {
            Some(p) => p + 1,
            None => 0,
        };
        if next < self.dict.terms.len() {
            self.pos = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn key(&self) -> &[u8] {
        let pos = self.pos.expect("cursor is not positioned");
        &self.dict.terms[pos].0
    }

    fn doc_freq(&self) -> u32 {
        let pos = self.pos.expect("cursor is not positioned");
        self.dict.terms[pos].1
    }

    fn ord(&self) -> u64 {
        self.pos.expect("cursor is not positioned") as u64
    }

    fn seek_ord(&mut self, ord: u64) -> io::Result<SeekOutcome> {
        if (ord as usize) < self.dict.terms.len() {
            self.pos = Some(ord as usize);
            Ok(SeekOutcome::Found)
        } else {
            self.pos = None;
            Ok(SeekOutcome::End)
        }
    }
}
