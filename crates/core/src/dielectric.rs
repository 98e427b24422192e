//! Sub-cell dielectric averaging into anisotropic inverse tensors.
//!
//! Each grid point is surrounded by an `mx × my × mz` mesh of samples that
//! spans one grid step along every axis. A cell whose samples disagree and
//! whose permittivity-weighted displacement points somewhere gets the
//! effective-medium tensor: harmonic mean along the interface normal,
//! arithmetic mean tangentially. Every other cell gets the isotropic
//! `1 / ε̄`.

use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MaxwellError;
use crate::grid::{GridDims, GridLayout};
use crate::lattice::Lattice3D;
use crate::symmetric::SymmetricMatrix;
use crate::vec3::{self, Vec3};

/// Threshold on both the displacement length and the mean/harmonic contrast.
pub const INTERFACE_TOLERANCE: f64 = 1e-6;

/// Scalar permittivity as a function of cartesian position.
///
/// Must be deterministic; it is evaluated concurrently from worker threads.
/// Any context it needs is captured by the implementor.
pub trait DielectricFunction: Sync {
    fn epsilon(&self, r: Vec3) -> f64;
}

impl<F> DielectricFunction for F
where
    F: Fn(Vec3) -> f64 + Sync,
{
    fn epsilon(&self, r: Vec3) -> f64 {
        self(r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DielectricOptions {
    /// Oversampling mesh per grid cell along each lattice direction.
    pub mesh_size: [usize; 3],
}

impl Default for DielectricOptions {
    fn default() -> Self {
        Self {
            mesh_size: [3, 3, 3],
        }
    }
}

impl DielectricOptions {
    pub fn validate(&self) -> Result<(), MaxwellError> {
        if self.mesh_size.contains(&0) {
            return Err(MaxwellError::InvalidMeshSize(self.mesh_size));
        }
        Ok(())
    }
}

/// Sampling stencil shared by every cell of one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SubcellMesh {
    size: [usize; 3],
    center: [f64; 3],
    /// Grid step vectors `R_i / n_i`.
    steps: [Vec3; 3],
    /// Mesh step vectors: grid step divided by `size - 1` (or 1).
    mesh_steps: [Vec3; 3],
}

impl SubcellMesh {
    pub fn new(size: [usize; 3], basis: [Vec3; 3], grid: [usize; 3]) -> Self {
        let steps = Lattice3D::from_vectors(basis[0], basis[1], basis[2])
            .grid_steps(GridDims::new(grid[0], grid[1], grid[2]));
        let mut mesh_steps = [[0.0; 3]; 3];
        let mut center = [0.0; 3];
        for axis in 0..3 {
            let divisions = if size[axis] <= 1 { 1 } else { size[axis] - 1 };
            center[axis] = (size[axis] as f64 - 1.0) * 0.5;
            mesh_steps[axis] = vec3::scale(steps[axis], 1.0 / divisions as f64);
        }
        Self {
            size,
            center,
            steps,
            mesh_steps,
        }
    }

    /// Cartesian position of grid point `(i, j, k)`.
    pub fn grid_point(&self, i: usize, j: usize, k: usize) -> Vec3 {
        vec3::combine([i as f64, j as f64, k as f64], self.steps[0], self.steps[1], self.steps[2])
    }

    /// Offset of mesh sample `(mi, mj, mk)` from the grid point.
    pub fn offset(&self, mi: usize, mj: usize, mk: usize) -> Vec3 {
        vec3::combine(
            [
                mi as f64 - self.center[0],
                mj as f64 - self.center[1],
                mk as f64 - self.center[2],
            ],
            self.mesh_steps[0],
            self.mesh_steps[1],
            self.mesh_steps[2],
        )
    }

    pub fn sample_count(&self) -> usize {
        self.size.iter().product()
    }

    /// Samples `epsilon` over the mesh around `center`.
    pub fn average<F: DielectricFunction + ?Sized>(&self, center: Vec3, epsilon: &F) -> CellAverage {
        let mut eps_sum = 0.0;
        let mut inv_sum = 0.0;
        let mut displacement = [0.0; 3];
        for mi in 0..self.size[0] {
            for mj in 0..self.size[1] {
                for mk in 0..self.size[2] {
                    let del = self.offset(mi, mj, mk);
                    let eps = epsilon.epsilon(vec3::add(center, del));
                    eps_sum += eps;
                    inv_sum += 1.0 / eps;
                    displacement = vec3::add(displacement, vec3::scale(del, eps));
                }
            }
        }
        let count = self.sample_count() as f64;
        CellAverage {
            mean: eps_sum / count,
            harmonic: count / inv_sum,
            displacement,
        }
    }
}

/// Accumulated statistics of one cell's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAverage {
    /// Arithmetic mean `ε̄`.
    pub mean: f64,
    /// Harmonic mean `ε_h`.
    pub harmonic: f64,
    /// `Σ ε · offset`, pointing into the higher-permittivity side.
    pub displacement: Vec3,
}

impl CellAverage {
    /// Unit interface normal, if the cell straddles a detectable interface.
    pub fn interface_normal(&self) -> Option<Vec3> {
        let len = vec3::norm(self.displacement);
        if len > INTERFACE_TOLERANCE && (self.mean - self.harmonic).abs() > INTERFACE_TOLERANCE {
            Some(vec3::scale(self.displacement, 1.0 / len))
        } else {
            None
        }
    }

    /// Effective (non-inverted) dielectric tensor of the cell.
    pub fn effective_tensor(&self) -> SymmetricMatrix {
        match self.interface_normal() {
            Some(normal) => SymmetricMatrix::interface_tensor(self.mean, self.harmonic, normal),
            None => SymmetricMatrix::isotropic(self.mean),
        }
    }

    /// Inverse of [`effective_tensor`](Self::effective_tensor).
    pub fn effective_inverse(&self) -> SymmetricMatrix {
        match self.interface_normal() {
            Some(normal) => {
                SymmetricMatrix::interface_tensor(self.mean, self.harmonic, normal).inverse()
            }
            None => SymmetricMatrix::isotropic(1.0 / self.mean),
        }
    }
}

/// Fills `eps_inv[..local_n]` for the local rows of `layout` and returns
/// the mean of the stored diagonals, `Σ trace / (3 * local_n)`.
///
/// A process that owns no rows stores nothing and reports the vacuum mean
/// `1.0`.
///
/// Rows along the first axis are processed in parallel; each row reports a
/// partial diagonal sum that is reduced once at the end.
pub fn average_dielectric<F: DielectricFunction + ?Sized>(
    layout: &GridLayout,
    options: &DielectricOptions,
    basis: [Vec3; 3],
    epsilon: &F,
    eps_inv: &mut [SymmetricMatrix],
) -> Result<f64, MaxwellError> {
    options.validate()?;
    let dims = layout.dims;
    let row_len = dims.ny * dims.nz;
    let local_n = layout.local_n;
    if eps_inv.len() < local_n {
        return Err(MaxwellError::InvalidDimensions(format!(
            "dielectric storage holds {} tensors, layout needs {local_n}",
            eps_inv.len()
        )));
    }
    if local_n == 0 {
        return Ok(1.0);
    }
    let local_x_start = layout.n_start / row_len;
    let mesh = SubcellMesh::new(options.mesh_size, basis, dims.as_array());

    let total: f64 = eps_inv[..local_n]
        .par_chunks_mut(row_len)
        .enumerate()
        .map(|(i, row)| {
            let i2 = i + local_x_start;
            let mut partial = 0.0;
            for j in 0..dims.ny {
                for k in 0..dims.nz {
                    let cell = mesh.average(mesh.grid_point(i2, j, k), epsilon);
                    let inv = cell.effective_inverse();
                    partial += inv.trace();
                    row[j * dims.nz + k] = inv;
                }
            }
            partial
        })
        .sum();

    let mean = total / (3 * local_n) as f64;
    trace!(
        "averaged dielectric over {local_n} cells with mesh {:?}: eps_inv_mean = {mean}",
        options.mesh_size
    );
    Ok(mean)
}
