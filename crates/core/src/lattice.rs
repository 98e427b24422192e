//! Direct and reciprocal lattice bases.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;
use crate::vec3::{self, Vec3};

/// Direct lattice basis `R1, R2, R3` (cartesian).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice3D {
    pub r1: Vec3,
    pub r2: Vec3,
    pub r3: Vec3,
}

impl Lattice3D {
    pub fn cubic(a: f64) -> Self {
        Self {
            r1: [a, 0.0, 0.0],
            r2: [0.0, a, 0.0],
            r3: [0.0, 0.0, a],
        }
    }

    /// Square lattice in the xy-plane; the third vector is a unit-length
    /// placeholder for the invariant axis.
    pub fn square_2d(a: f64) -> Self {
        Self {
            r1: [a, 0.0, 0.0],
            r2: [0.0, a, 0.0],
            r3: [0.0, 0.0, 1.0],
        }
    }

    pub fn hexagonal_2d(a: f64) -> Self {
        let h = (3.0f64).sqrt() * 0.5 * a;
        Self {
            r1: [a, 0.0, 0.0],
            r2: [0.5 * a, h, 0.0],
            r3: [0.0, 0.0, 1.0],
        }
    }

    pub fn from_vectors(r1: Vec3, r2: Vec3, r3: Vec3) -> Self {
        Self { r1, r2, r3 }
    }

    /// Reciprocal basis with `G_i · R_j = 2π δ_ij`.
    pub fn reciprocal(&self) -> ReciprocalLattice3D {
        let det = self.determinant();
        assert!(
            det.abs() > f64::EPSILON,
            "primitive vectors are linearly dependent"
        );
        let inv = 2.0 * PI / det;
        ReciprocalLattice3D {
            g1: vec3::scale(vec3::cross(self.r2, self.r3), inv),
            g2: vec3::scale(vec3::cross(self.r3, self.r1), inv),
            g3: vec3::scale(vec3::cross(self.r1, self.r2), inv),
        }
    }

    pub fn fractional_to_cartesian(&self, frac: Vec3) -> Vec3 {
        vec3::combine(frac, self.r1, self.r2, self.r3)
    }

    pub fn cartesian_to_fractional(&self, cart: Vec3) -> Vec3 {
        let det = self.determinant();
        assert!(
            det.abs() > f64::EPSILON,
            "primitive vectors are linearly dependent"
        );
        // Rows of the inverse basis matrix are the reciprocal vectors / 2π.
        let inv_det = 1.0 / det;
        [
            vec3::dot(vec3::cross(self.r2, self.r3), cart) * inv_det,
            vec3::dot(vec3::cross(self.r3, self.r1), cart) * inv_det,
            vec3::dot(vec3::cross(self.r1, self.r2), cart) * inv_det,
        ]
    }

    /// Per-axis grid step vectors `R_i / n_i`.
    pub fn grid_steps(&self, dims: GridDims) -> [Vec3; 3] {
        [
            vec3::scale(self.r1, 1.0 / dims.nx as f64),
            vec3::scale(self.r2, 1.0 / dims.ny as f64),
            vec3::scale(self.r3, 1.0 / dims.nz as f64),
        ]
    }

    pub fn volume(&self) -> f64 {
        self.determinant().abs()
    }

    fn determinant(&self) -> f64 {
        vec3::dot(self.r1, vec3::cross(self.r2, self.r3))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReciprocalLattice3D {
    pub g1: Vec3,
    pub g2: Vec3,
    pub g3: Vec3,
}
