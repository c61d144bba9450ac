//! NNUE accumulator for incremental feature updates.

use chess::{Board, Color, ALL_SQUARES};

use super::features::feature_index;
use super::network::{Network, HIDDEN};

/// Accumulated hidden-layer activations for one perspective.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Accumulator {
    pub(crate) vals: [i16; HIDDEN],
}

impl Accumulator {
    pub(crate) const ZERO: Accumulator = Accumulator { vals: [0; HIDDEN] };

    /// Full recompute: start from the bias, then add every feature active
    /// on the board.
    pub fn refresh(board: &Board, perspective: Color, net: &Network) -> Self {
        let mut acc = net.feature_bias;

        for &sq in ALL_SQUARES.iter() {
            if let Some(piece) = board.piece_on(sq) {
                let color = board
                    .color_on(sq)
                    .expect("occupied square has a piece color");
                acc.add_feature(feature_index(perspective, color, piece, sq), net);
            }
        }

        acc
    }

    /// Incrementally add a feature (piece placed on a square).
    #[inline]
    pub fn add_feature(&mut self, idx: usize, net: &Network) {
        for (acc, &w) in self.vals.iter_mut().zip(&net.feature_weights[idx].vals) {
            *acc += w;
        }
    }

    /// Incrementally remove a feature (piece removed from a square).
    #[inline]
    pub fn remove_feature(&mut self, idx: usize, net: &Network) {
        for (acc, &w) in self.vals.iter_mut().zip(&net.feature_weights[idx].vals) {
            *acc -= w;
        }
    }
}

impl PartialEq for Accumulator {
    fn eq(&self, other: &Self) -> bool {
        self.vals[..] == other.vals[..]
    }
}

impl Eq for Accumulator {}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Accumulator({:?}...)", &self.vals[..4.min(HIDDEN)])
    }
}
