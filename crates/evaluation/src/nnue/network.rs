//! Quantized network parameters and the non-incremental output layer.
//!
//! The architecture is a single accumulator layer (768 inputs to
//! [`HIDDEN`] neurons per perspective) followed by one dense output layer
//! over both perspectives' clipped activations. Weights are i16, quantized
//! at training time with `QA` on the accumulator and `QB` on the output
//! layer; the forward pass is pure integer arithmetic so scores are
//! reproducible across platforms.

use super::accumulator::Accumulator;
use super::features::FEATURES;

/// Accumulator width per perspective.
pub const HIDDEN: usize = 256;
/// Quantization factor of the accumulator layer.
pub const QA: i32 = 255;
/// Quantization factor of the output layer.
pub const QB: i32 = 64;
/// Centipawn scale of the raw network output.
pub const EVAL_SCALE: i32 = 400;

/// Immutable, read-only parameter blob. Loaded once at startup and shared
/// by reference between evaluator instances; never mutated during search.
pub struct Network {
    /// One weight row per input feature, added into the accumulator when
    /// the feature becomes active.
    pub(crate) feature_weights: Vec<Accumulator>,
    /// Accumulator starting point (layer bias).
    pub(crate) feature_bias: Accumulator,
    /// Output row per perspective: [side to move, side not to move].
    pub(crate) output_weights: [Accumulator; 2],
    pub(crate) output_bias: i32,
}

impl Network {
    /// An all-zero network. Scores every position as 0; used as the
    /// default when no weight file is configured, and in tests.
    pub fn zeroed() -> Self {
        Self {
            feature_weights: vec![Accumulator::ZERO; FEATURES],
            feature_bias: Accumulator::ZERO,
            output_weights: [Accumulator::ZERO; 2],
            output_bias: 0,
        }
    }

    /// Clipped ReLU on one accumulator lane.
    #[inline(always)]
    fn crelu(x: i16) -> i32 {
        (x as i32).clamp(0, QA)
    }

    /// Output layer: centipawns from the perspective of `us`.
    pub fn forward(&self, us: &Accumulator, them: &Accumulator) -> i32 {
        let mut sum = 0i64;
        for (&x, &w) in us.vals.iter().zip(&self.output_weights[0].vals) {
            sum += (Self::crelu(x) * w as i32) as i64;
        }
        for (&x, &w) in them.vals.iter().zip(&self.output_weights[1].vals) {
            sum += (Self::crelu(x) * w as i32) as i64;
        }
        let raw = sum as i32 + self.output_bias;
        raw * EVAL_SCALE / (QA * QB)
    }
}
