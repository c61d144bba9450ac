//! Fixed-capacity transposition table.
//!
//! A bounded, lossy cache indexed by `fingerprint mod capacity`. Entries
//! are overwritten in place and never individually deleted, so a probe must
//! verify the full fingerprint and the caller must gate any cutoff on the
//! stored depth and bound kind. Collisions and stale hits cost search
//! quality, never correctness.

use chess::ChessMove;

use crate::score::{MATE_THRESHOLD, MAX_PLY};

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Score is the exact search value
    Exact,
    /// Score is a lower bound (the node failed high)
    Lower,
    /// Score is an upper bound (the node failed low)
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    /// Full position fingerprint, checked on probe
    pub key: u64,
    /// Score, mate distances relative to this node (see `probe`/`store`)
    score: i32,
    /// Best move found at this node, if any
    pub mv: Option<ChessMove>,
    /// Remaining depth the score was searched to
    pub depth: u8,
    pub bound: Bound,
    /// Search generation that wrote the entry
    generation: u8,
}

impl Entry {
    /// Stored score converted back to a root-relative mate distance.
    pub fn score(&self, ply: usize) -> i32 {
        if self.score > MATE_THRESHOLD {
            self.score - ply as i32
        } else if self.score < -MATE_THRESHOLD {
            self.score + ply as i32
        } else {
            self.score
        }
    }
}

/// Default table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;

pub struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table using roughly `mb` megabytes, minimum one slot.
    pub fn with_hash_mb(mb: usize) -> Self {
        let slot_size = std::mem::size_of::<Option<Entry>>();
        let capacity = (mb * 1024 * 1024 / slot_size).max(1);
        Self {
            slots: vec![None; capacity],
            generation: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.generation = 0;
    }

    /// Resize to roughly `mb` megabytes, dropping all entries.
    pub fn resize_mb(&mut self, mb: usize) {
        *self = Self::with_hash_mb(mb);
    }

    /// Advance the age counter. Call once per search so replacement can
    /// prefer entries from the current search over leftovers.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Look up `key`. Returns the resident entry only on a full
    /// fingerprint match.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<Entry> {
        self.slots[self.index(key)].filter(|e| e.key == key)
    }

    /// Store a search result for `key`.
    ///
    /// `score` is root-relative; `ply` is the node's distance from the
    /// root, used to re-base mate scores so they stay correct when the
    /// entry is probed from a different root. The slot is overwritten
    /// unless the resident entry is from this same search and strictly
    /// deeper.
    pub fn store(
        &mut self,
        key: u64,
        depth: u8,
        ply: usize,
        score: i32,
        bound: Bound,
        mv: Option<ChessMove>,
    ) {
        debug_assert!(ply < MAX_PLY);
        let idx = self.index(key);
        if let Some(resident) = &self.slots[idx] {
            if resident.generation == self.generation && resident.depth > depth {
                return;
            }
        }

        let stored_score = if score > MATE_THRESHOLD {
            score + ply as i32
        } else if score < -MATE_THRESHOLD {
            score - ply as i32
        } else {
            score
        };

        self.slots[idx] = Some(Entry {
            key,
            score: stored_score,
            mv,
            depth,
            bound,
            generation: self.generation,
        });
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::with_hash_mb(DEFAULT_HASH_MB)
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
