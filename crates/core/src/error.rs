//! Error types for operator-state construction and updates.

use crate::backend::TransformError;

/// Failures surfaced by [`OperatorState`](crate::operator::OperatorState) and
/// its collaborators.
///
/// Only resource exhaustion and configuration problems are errors. Degenerate
/// wavevectors, axis-aligned plane waves and homogeneous cells all have
/// defined fallbacks and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum MaxwellError {
    #[error("out of memory: could not allocate {requested} elements for {what}")]
    OutOfMemory { what: &'static str, requested: usize },

    #[error("rank {rank} transforms are not supported by the {engine} engine (minimum rank {min_rank})")]
    UnsupportedRank {
        rank: usize,
        min_rank: usize,
        engine: &'static str,
    },

    #[error("unsupported transform mode: {0}")]
    UnsupportedMode(String),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("mesh size entries must be at least 1, got {0:?}")]
    InvalidMeshSize([usize; 3]),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("operator state has been released")]
    Released,
}

/// Allocates `len` copies of `value`, reporting allocation failure instead of
/// aborting the process.
pub(crate) fn alloc_filled<T: Clone>(
    len: usize,
    value: T,
    what: &'static str,
) -> Result<Vec<T>, MaxwellError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MaxwellError::OutOfMemory {
            what,
            requested: len,
        })?;
    data.resize(len, value);
    Ok(data)
}
