//! Real symmetric 3×3 tensors (dielectric and inverse-dielectric).

use crate::vec3::Vec3;

/// Symmetric 3×3 matrix storing only the upper triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricMatrix {
    pub m00: f64,
    pub m11: f64,
    pub m22: f64,
    pub m01: f64,
    pub m02: f64,
    pub m12: f64,
}

impl Default for SymmetricMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl SymmetricMatrix {
    pub const fn identity() -> Self {
        Self::isotropic(1.0)
    }

    pub const fn isotropic(value: f64) -> Self {
        Self {
            m00: value,
            m11: value,
            m22: value,
            m01: 0.0,
            m02: 0.0,
            m12: 0.0,
        }
    }

    /// Effective-medium tensor for a cell cut by an interface with unit
    /// normal `normal`: `harmonic` along the normal, `mean` tangentially.
    ///
    /// Equals `(harmonic - mean) N⊗N + mean I`.
    pub fn interface_tensor(mean: f64, harmonic: f64, normal: Vec3) -> Self {
        let delta = harmonic - mean;
        Self {
            m00: delta * normal[0] * normal[0] + mean,
            m11: delta * normal[1] * normal[1] + mean,
            m22: delta * normal[2] * normal[2] + mean,
            m01: delta * normal[0] * normal[1],
            m02: delta * normal[0] * normal[2],
            m12: delta * normal[1] * normal[2],
        }
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 * self.m22 - self.m02 * self.m11 * self.m02
            + 2.0 * self.m01 * self.m12 * self.m02
            - self.m01 * self.m01 * self.m22
            - self.m12 * self.m12 * self.m00
    }

    /// Closed-form cofactor inverse.
    ///
    /// Singular input is not checked for; a physically valid permittivity
    /// tensor is always positive definite, and a zero determinant yields
    /// non-finite entries.
    pub fn inverse(&self) -> Self {
        let detinv = 1.0 / self.determinant();
        Self {
            m00: detinv * (self.m11 * self.m22 - self.m12 * self.m12),
            m11: detinv * (self.m00 * self.m22 - self.m02 * self.m02),
            m22: detinv * (self.m11 * self.m00 - self.m01 * self.m01),
            m02: detinv * (self.m01 * self.m12 - self.m11 * self.m02),
            m01: -detinv * (self.m01 * self.m22 - self.m12 * self.m02),
            m12: -detinv * (self.m00 * self.m12 - self.m01 * self.m02),
        }
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        [
            self.m00 * v[0] + self.m01 * v[1] + self.m02 * v[2],
            self.m01 * v[0] + self.m11 * v[1] + self.m12 * v[2],
            self.m02 * v[0] + self.m12 * v[1] + self.m22 * v[2],
        ]
    }

    pub fn trace(&self) -> f64 {
        self.m00 + self.m11 + self.m22
    }

    pub fn diagonal(&self) -> Vec3 {
        [self.m00, self.m11, self.m22]
    }

    /// Row-major dense form.
    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.m00, self.m01, self.m02],
            [self.m01, self.m11, self.m12],
            [self.m02, self.m12, self.m22],
        ]
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        [
            self.m00 - other.m00,
            self.m11 - other.m11,
            self.m22 - other.m22,
            self.m01 - other.m01,
            self.m02 - other.m02,
            self.m12 - other.m12,
        ]
        .iter()
        .fold(0.0_f64, |acc, d| acc.max(d.abs()))
    }
}
