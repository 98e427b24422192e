//! Per-plane-wave `k+G` magnitudes and transverse frames.
//!
//! For each local plane wave the builder stores `|k+G|` and two unit vectors
//! `n`, `m` that together with `(k+G)/|k+G|` form an orthonormal basis, with
//! `m = n × (k+G) / |k+G|`. Fields expressed in the `(n, m)` frame are
//! divergence-free by construction.

use log::info;

use crate::grid::{GridLayout, fold_index};
use crate::vec3::{self, Vec3};

/// Value put on the first component when the wavevector is exactly zero.
pub const ZERO_K_SUBSTITUTE: f64 = 1e-5;

/// Allowed deviation from orthonormality of a computed frame.
pub const FRAME_TOLERANCE: f64 = 1e-6;

/// Invariant axis used to build `n = ẑ × (k+G)`.
const INVARIANT_AXIS: Vec3 = [0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KPlusG {
    pub kmag: f64,
    pub n: Vec3,
    pub m: Vec3,
}

impl KPlusG {
    /// Builds the frame for one `k+G` vector.
    ///
    /// When `k+G` lies along the invariant axis, `n` is `x̂`. When `k+G` is
    /// exactly zero the cross product for `m` vanishes and `m` is `ŷ`.
    pub fn from_vector(kpg: Vec3) -> Self {
        let kmag = vec3::norm(kpg);
        let n = if kpg[0] == 0.0 && kpg[1] == 0.0 {
            [1.0, 0.0, 0.0]
        } else {
            normalized(vec3::cross(INVARIANT_AXIS, kpg))
        };
        let m_raw = vec3::cross(n, kpg);
        let m = if vec3::norm(m_raw) == 0.0 {
            [0.0, 1.0, 0.0]
        } else {
            normalized(m_raw)
        };
        Self { kmag, n, m }
    }

    /// Checks unit norms and mutual orthogonality of `n`, `m` and `kpg`.
    pub fn is_orthonormal(&self, kpg: Vec3, tol: f64) -> bool {
        (vec3::dot(kpg, self.n)).abs() < tol
            && (vec3::dot(kpg, self.m)).abs() < tol
            && (vec3::dot(self.n, self.m)).abs() < tol
            && (vec3::dot(self.n, self.n) - 1.0).abs() < tol
            && (vec3::dot(self.m, self.m) - 1.0).abs() < tol
    }
}

fn normalized(v: Vec3) -> Vec3 {
    vec3::scale(v, 1.0 / vec3::norm(v))
}

/// Replaces an exactly-zero wavevector by `(ZERO_K_SUBSTITUTE, 0, 0)` so the
/// propagation direction is defined.
pub fn regularize_k(k: Vec3) -> Vec3 {
    if k[0] == 0.0 && k[1] == 0.0 && k[2] == 0.0 {
        info!("detected zero k, substituting ({ZERO_K_SUBSTITUTE:e}, 0, 0)");
        [ZERO_K_SUBSTITUTE, 0.0, 0.0]
    } else {
        k
    }
}

/// `k + kxi*G1 + kyi*G2 + kzi*G3`
#[inline]
pub fn k_plus_g(k: Vec3, folded: [isize; 3], g: &[Vec3; 3]) -> Vec3 {
    let offset = vec3::combine(
        [folded[0] as f64, folded[1] as f64, folded[2] as f64],
        g[0],
        g[1],
        g[2],
    );
    vec3::add(k, offset)
}

/// Fills `frames` and `normsqr` for every locally owned plane wave, in
/// `x`-major, `z`-fastest order over the local row range.
pub fn fill_frames(
    layout: &GridLayout,
    k: Vec3,
    g: &[Vec3; 3],
    frames: &mut [KPlusG],
    normsqr: &mut [f64],
) {
    let GridLayout { dims, .. } = *layout;
    let mut slots = frames.iter_mut().zip(normsqr.iter_mut());
    for x in layout.local_rows() {
        let kxi = fold_index(x, dims.nx);
        for y in 0..dims.ny {
            let kyi = fold_index(y, dims.ny);
            for z in 0..dims.nz {
                let Some((frame, n2)) = slots.next() else {
                    return;
                };
                let kzi = fold_index(z, dims.nz);
                let kpg = k_plus_g(k, [kxi, kyi, kzi], g);
                *frame = KPlusG::from_vector(kpg);
                *n2 = vec3::dot(kpg, kpg);
                debug_assert!(
                    frame.is_orthonormal(kpg, FRAME_TOLERANCE),
                    "k+G frame not orthonormal at ({x}, {y}, {z})"
                );
            }
        }
    }
}
