//! Binary weight-blob loading.
//!
//! The format is an external contract with the training pipeline: any
//! mismatch in magic, version, or dimensions fails fast with a descriptive
//! error before a single node is searched, rather than silently producing
//! garbage scores.
//!
//! Layout (all little-endian):
//! ```text
//! magic "FRNN" | version u32 | features u32 | hidden u32
//! feature_bias   [hidden] i16
//! feature_weights[features * hidden] i16
//! output_weights [2 * hidden] i16
//! output_bias    i32
//! ```

use std::path::Path;

use thiserror::Error;

use super::accumulator::Accumulator;
use super::features::FEATURES;
use super::network::{Network, HIDDEN};

pub const MAGIC: [u8; 4] = *b"FRNN";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("failed to read weights file: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a weights file (bad magic bytes)")]
    BadMagic,
    #[error("unsupported weights format version {0} (engine supports {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error(
        "network dimension mismatch: file declares {found_features}x{found_hidden}, \
         engine is built for {FEATURES}x{HIDDEN}"
    )]
    DimensionMismatch {
        found_features: u32,
        found_hidden: u32,
    },
    #[error("weights file truncated")]
    Truncated,
    #[error("weights file has {0} trailing bytes after the parameters")]
    TrailingBytes(usize),
}

/// Little-endian cursor over the raw blob.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WeightsError> {
        let end = self.pos.checked_add(n).ok_or(WeightsError::Truncated)?;
        if end > self.bytes.len() {
            return Err(WeightsError::Truncated);
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, WeightsError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, WeightsError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i16s(&mut self, out: &mut [i16]) -> Result<(), WeightsError> {
        let b = self.take(out.len() * 2)?;
        for (i, v) in out.iter_mut().enumerate() {
            *v = i16::from_le_bytes([b[2 * i], b[2 * i + 1]]);
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl Network {
    /// Parse a weight blob, validating the header against the dimensions
    /// this engine was built with.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WeightsError> {
        let mut r = Reader::new(bytes);

        if r.take(4)? != MAGIC {
            return Err(WeightsError::BadMagic);
        }
        let version = r.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(WeightsError::UnsupportedVersion(version));
        }
        let found_features = r.read_u32()?;
        let found_hidden = r.read_u32()?;
        if found_features as usize != FEATURES || found_hidden as usize != HIDDEN {
            return Err(WeightsError::DimensionMismatch {
                found_features,
                found_hidden,
            });
        }

        let mut net = Network::zeroed();
        r.read_i16s(&mut net.feature_bias.vals)?;
        for row in net.feature_weights.iter_mut() {
            r.read_i16s(&mut row.vals)?;
        }
        r.read_i16s(&mut net.output_weights[0].vals)?;
        r.read_i16s(&mut net.output_weights[1].vals)?;
        net.output_bias = r.read_i32()?;

        if r.remaining() != 0 {
            return Err(WeightsError::TrailingBytes(r.remaining()));
        }
        Ok(net)
    }

    /// Load a weight blob from disk.
    pub fn load(path: &Path) -> Result<Self, WeightsError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the network in the on-disk format. Used by tooling and
    /// round-trip tests.
    pub fn to_bytes(&self) -> Vec<u8> {
        let param_count = HIDDEN + FEATURES * HIDDEN + 2 * HIDDEN;
        let mut out = Vec::with_capacity(16 + param_count * 2 + 4);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(FEATURES as u32).to_le_bytes());
        out.extend_from_slice(&(HIDDEN as u32).to_le_bytes());

        let push_row = |out: &mut Vec<u8>, row: &Accumulator| {
            for v in row.vals.iter() {
                out.extend_from_slice(&v.to_le_bytes());
            }
        };
        push_row(&mut out, &self.feature_bias);
        for row in self.feature_weights.iter() {
            push_row(&mut out, row);
        }
        push_row(&mut out, &self.output_weights[0]);
        push_row(&mut out, &self.output_weights[1]);
        out.extend_from_slice(&self.output_bias.to_le_bytes());
        out
    }
}

#[cfg(test)]
#[path = "weights_tests.rs"]
mod weights_tests;
