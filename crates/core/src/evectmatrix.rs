//! Block of eigenvectors distributed like the plane-wave index space.

use num_complex::Complex64;

use crate::error::{MaxwellError, alloc_filled};

/// `p` vectors of `n` plane waves with `c` components each. Only the local
/// block `[n_start, n_start + local_n)` is stored, with `alloc_n` rows of
/// capacity.
///
/// Storage is row-major over `(plane wave, component, band)`.
#[derive(Debug, Clone)]
pub struct EvectMatrix {
    pub n: usize,
    pub c: usize,
    pub p: usize,
    pub local_n: usize,
    pub n_start: usize,
    pub alloc_n: usize,
    data: Vec<Complex64>,
}

impl EvectMatrix {
    pub fn zeros(
        n: usize,
        c: usize,
        p: usize,
        local_n: usize,
        n_start: usize,
        alloc_n: usize,
    ) -> Result<Self, MaxwellError> {
        let data = alloc_filled(alloc_n * c * p, Complex64::default(), "eigenvector block")?;
        Ok(Self {
            n,
            c,
            p,
            local_n,
            n_start,
            alloc_n,
            data,
        })
    }

    #[inline]
    pub fn idx(&self, plane_wave: usize, component: usize, band: usize) -> usize {
        (plane_wave * self.c + component) * self.p + band
    }

    pub fn get(&self, plane_wave: usize, component: usize, band: usize) -> Complex64 {
        self.data[self.idx(plane_wave, component, band)]
    }

    pub fn set(&mut self, plane_wave: usize, component: usize, band: usize, value: Complex64) {
        let idx = self.idx(plane_wave, component, band);
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }
}
