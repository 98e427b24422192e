//! State and geometry core for a plane-wave Maxwell eigenmode solver.
//!
//! For a wavevector `k` and a grid resolution this crate maintains the
//! distributed data layout used by the transform engine, an orthonormal
//! transverse frame per plane wave, and an effective anisotropic inverse
//! dielectric tensor per grid cell obtained by sub-cell averaging.

pub mod backend;
pub mod dielectric;
pub mod error;
pub mod evectmatrix;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod kvector;
pub mod lattice;
pub mod operator;
pub mod polarization;
pub mod symmetric;
pub mod target;
pub mod vec3;

pub use backend::{TransformEngine, TransformKind};
pub use error::MaxwellError;
pub use operator::{OperatorConfig, OperatorState};

#[cfg(test)]
mod _tests_backend;
#[cfg(test)]
mod _tests_io;
#[cfg(test)]
mod _tests_symmetric;
#[cfg(test)]
mod _tests_target;
