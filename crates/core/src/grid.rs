//! Global grid dimensions and the local real-space / plane-wave layout.

use serde::{Deserialize, Serialize};

use crate::backend::LocalLayout;
use crate::error::MaxwellError;

/// Global `nx × ny × nz` grid. Trailing unit dimensions lower the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub nx: usize,
    #[serde(default = "default_extent")]
    pub ny: usize,
    #[serde(default = "default_extent")]
    pub nz: usize,
}

fn default_extent() -> usize {
    1
}

impl GridDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn validate(&self) -> Result<(), MaxwellError> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(MaxwellError::InvalidDimensions(format!(
                "grid dimensions must be non-zero, got {}x{}x{}",
                self.nx, self.ny, self.nz
            )));
        }
        Ok(())
    }

    /// Number of dimensions once trailing unit axes are dropped (1, 2 or 3).
    pub fn rank(&self) -> usize {
        if self.nz == 1 {
            if self.ny == 1 { 1 } else { 2 }
        } else {
            3
        }
    }

    /// Size of the last non-trivial axis.
    pub fn last_dim(&self) -> usize {
        self.as_array()[self.rank() - 1]
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Leading `rank()` dimensions, the shape handed to transform plans.
    pub fn shape(&self) -> Vec<usize> {
        self.as_array()[..self.rank()].to_vec()
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index with `z` fastest.
    #[inline]
    pub fn idx(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.ny + iy) * self.nz + iz
    }
}

/// Folds a grid index into a signed frequency about the Nyquist center:
/// indices above `size / 2` map to `index - size`.
#[inline]
pub fn fold_index(index: usize, size: usize) -> isize {
    if index > size / 2 {
        index as isize - size as isize
    } else {
        index as isize
    }
}

/// How the global grid is split between this process's real-space rows and
/// plane-wave block, as negotiated with the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub dims: GridDims,
    pub last_dim: usize,
    pub local_nx: usize,
    pub local_x_start: usize,
    pub local_ny: usize,
    pub local_y_start: usize,
    pub other_dims: usize,
    pub local_n: usize,
    pub n_start: usize,
    pub alloc_n: usize,
    pub n: usize,
    /// Real-space points the engine writes locally (padded for real transforms).
    pub fft_output_size: usize,
    /// Complex slots per batched component in the scratch buffer.
    pub fft_data_size: usize,
}

impl GridLayout {
    /// Records the engine's answer as-is; the partition parameters are trusted.
    pub fn from_local(dims: GridDims, local: LocalLayout) -> Self {
        let last_dim = dims.last_dim();
        let layout = Self {
            dims,
            last_dim,
            local_nx: local.local_nx,
            local_x_start: local.local_x_start,
            local_ny: local.local_ny,
            local_y_start: local.local_y_start,
            other_dims: local.local_n / last_dim,
            local_n: local.local_n,
            n_start: local.n_start,
            alloc_n: local.alloc_n,
            n: dims.len(),
            fft_output_size: local.fft_output_size,
            fft_data_size: local.fft_data_size,
        };
        debug_assert!(layout.local_n <= layout.alloc_n);
        debug_assert!(layout.n_start + layout.local_n <= layout.n);
        layout
    }

    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    /// Range of first-axis rows owned by this process.
    pub fn local_rows(&self) -> std::ops::Range<usize> {
        self.local_x_start..self.local_x_start + self.local_nx
    }

    pub fn is_distributed(&self) -> bool {
        self.local_n != self.n
    }
}
