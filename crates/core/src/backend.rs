//! Transform-engine capability interface.
//!
//! The operator state never performs Fourier transforms itself. It asks an
//! engine for the local data layout, creates one forward and one inverse plan
//! against that layout, and later hands the scratch buffer to those plans.
//! Engines are chosen once at construction and held as trait objects, so the
//! serial/distributed and complex/real choices are runtime decisions.
//!
//! # Buffer convention
//!
//! Plans work in place on a `Complex64` scratch buffer holding `howmany`
//! interleaved components: element `p` of component `c` lives at slot
//! `p * howmany + c`. Transforms are unnormalized in both directions.
//!
//! For real-valued engines the real-space side is the same memory viewed as
//! `[re, im, re, im, ...]` f64 pairs, padded along the last axis to
//! `2 * (last_dim / 2 + 1)` reals; the spectrum side holds the
//! `last_dim / 2 + 1` non-redundant Hermitian coefficients per row.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::grid::GridDims;

/// Family of transform the engine performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Full complex-to-complex transforms.
    #[default]
    Complex,
    /// Real-to-complex with Hermitian packing of the last axis.
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Local decomposition reported by an engine for a requested grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalLayout {
    pub local_nx: usize,
    pub local_x_start: usize,
    pub local_ny: usize,
    pub local_y_start: usize,
    /// Plane waves owned locally.
    pub local_n: usize,
    /// Global offset of the local plane-wave block.
    pub n_start: usize,
    pub alloc_n: usize,
    /// Real-space points written locally (reals, padded, for real engines).
    pub fft_output_size: usize,
    /// Complex scratch slots needed per batched component.
    pub fft_data_size: usize,
}

impl LocalLayout {
    /// Layout of a single process owning the whole grid with complex transforms.
    pub fn serial_complex(dims: GridDims) -> Self {
        let n = dims.len();
        Self {
            local_nx: dims.nx,
            local_x_start: 0,
            local_ny: dims.ny,
            local_y_start: 0,
            local_n: n,
            n_start: 0,
            alloc_n: n,
            fft_output_size: n,
            fft_data_size: n,
        }
    }

    /// Layout of a single process owning the whole grid with Hermitian-packed
    /// real transforms.
    pub fn serial_real(dims: GridDims) -> Self {
        let n = dims.len();
        let last_dim = dims.last_dim();
        let other_dims = n / last_dim;
        let packed = last_dim / 2 + 1;
        Self {
            fft_output_size: other_dims * 2 * packed,
            fft_data_size: other_dims * packed,
            ..Self::serial_complex(dims)
        }
    }
}

/// Everything a plan needs to know about the buffer it will run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSpec {
    pub dims: GridDims,
    pub direction: Direction,
    /// Interleaved components transformed per call.
    pub howmany: usize,
    pub layout: LocalLayout,
}

impl PlanSpec {
    /// Scratch length in complex slots.
    pub fn buffer_len(&self) -> usize {
        self.howmany * self.layout.fft_data_size
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("plan creation failed: {0}")]
    PlanCreation(String),

    #[error("buffer holds {actual} complex values but the plan expects {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("slab exchange failed: {0}")]
    Exchange(String),
}

/// Opaque, executable plan. Dropping it releases the engine's resources.
pub trait TransformPlan: Send {
    fn direction(&self) -> Direction;

    /// Transforms `data` in place.
    fn execute(&mut self, data: &mut [Complex64]) -> Result<(), TransformError>;
}

/// Plan factory and layout oracle for one transform family.
pub trait TransformEngine: Send {
    fn name(&self) -> &'static str;

    fn kind(&self) -> TransformKind;

    /// Smallest grid rank this engine can transform.
    fn min_rank(&self) -> usize {
        1
    }

    fn local_layout(&self, dims: GridDims) -> Result<LocalLayout, TransformError>;

    fn create_plan(&self, spec: &PlanSpec) -> Result<Box<dyn TransformPlan>, TransformError>;
}

/// Forward/inverse plan pair bound to one operator state's scratch layout.
pub struct TransformBinding {
    pub forward: Box<dyn TransformPlan>,
    pub inverse: Box<dyn TransformPlan>,
}

impl TransformBinding {
    pub fn create(
        engine: &dyn TransformEngine,
        dims: GridDims,
        howmany: usize,
        layout: LocalLayout,
    ) -> Result<Self, TransformError> {
        let spec = |direction| PlanSpec {
            dims,
            direction,
            howmany,
            layout,
        };
        let forward = engine.create_plan(&spec(Direction::Forward))?;
        let inverse = engine.create_plan(&spec(Direction::Inverse))?;
        Ok(Self { forward, inverse })
    }
}

impl std::fmt::Debug for TransformBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformBinding")
            .field("forward", &self.forward.direction())
            .field("inverse", &self.inverse.direction())
            .finish()
    }
}

/// Reads the `index`-th f64 of a complex buffer viewed as `[re, im]` pairs.
#[inline]
pub fn real_at(data: &[Complex64], index: usize) -> f64 {
    let slot = &data[index / 2];
    if index % 2 == 0 { slot.re } else { slot.im }
}

/// Writes the `index`-th f64 of a complex buffer viewed as `[re, im]` pairs.
#[inline]
pub fn set_real_at(data: &mut [Complex64], index: usize, value: f64) {
    let slot = &mut data[index / 2];
    if index % 2 == 0 {
        slot.re = value;
    } else {
        slot.im = value;
    }
}
