//! Operator state: everything the Maxwell eigensolver reads at a given k.
//!
//! An [`OperatorState`] is built once per grid and band configuration. It
//! owns the grid layout, the forward/inverse transform plans, the averaged
//! inverse dielectric field, the per-plane-wave `k+G` frames and the batched
//! transform scratch buffer. Wavevector and dielectric updates mutate it in
//! place.

use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    backend::{TransformBinding, TransformEngine, TransformKind},
    dielectric::{self, DielectricFunction, DielectricOptions},
    error::{MaxwellError, alloc_filled},
    grid::{GridDims, GridLayout},
    kvector::{self, KPlusG},
    lattice::{Lattice3D, ReciprocalLattice3D},
    polarization::Polarization,
    symmetric::SymmetricMatrix,
    vec3::Vec3,
};

/// Construction parameters for an [`OperatorState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub grid: GridDims,
    pub num_bands: usize,
    /// Bands transformed per batched call; defaults to `num_bands`.
    #[serde(default)]
    pub num_fft_bands: Option<usize>,
    #[serde(default)]
    pub transform: TransformKind,
    #[serde(default)]
    pub polarization: Polarization,
}

impl OperatorConfig {
    pub fn new(grid: GridDims, num_bands: usize) -> Self {
        Self {
            grid,
            num_bands,
            num_fft_bands: None,
            transform: TransformKind::default(),
            polarization: Polarization::default(),
        }
    }

    pub fn fft_bands(&self) -> usize {
        self.num_fft_bands.unwrap_or(self.num_bands)
    }
}

pub struct OperatorState {
    engine: Box<dyn TransformEngine>,
    layout: GridLayout,
    binding: Option<TransformBinding>,
    num_bands: usize,
    num_fft_bands: usize,
    current_k: Vec3,
    polarization: Polarization,
    eps_inv: Vec<SymmetricMatrix>,
    eps_inv_mean: f64,
    k_plus_g: Vec<KPlusG>,
    k_plus_g_normsqr: Vec<f64>,
    fft_data: Vec<Complex64>,
}

impl OperatorState {
    /// Negotiates the local layout with `engine`, allocates every array and
    /// then creates the transform plans against the allocated scratch layout.
    ///
    /// Unsupported rank/mode combinations are rejected before anything is
    /// allocated.
    pub fn new(
        engine: Box<dyn TransformEngine>,
        dims: GridDims,
        num_bands: usize,
        num_fft_bands: usize,
    ) -> Result<Self, MaxwellError> {
        dims.validate()?;
        if num_bands == 0 || num_fft_bands == 0 {
            return Err(MaxwellError::InvalidDimensions(format!(
                "band counts must be non-zero (num_bands = {num_bands}, num_fft_bands = {num_fft_bands})"
            )));
        }
        let rank = dims.rank();
        if rank < engine.min_rank() {
            return Err(MaxwellError::UnsupportedRank {
                rank,
                min_rank: engine.min_rank(),
                engine: engine.name(),
            });
        }

        let num_fft_bands = num_bands.min(num_fft_bands);
        let howmany = 3 * num_fft_bands;
        let local = engine.local_layout(dims)?;
        let layout = GridLayout::from_local(dims, local);

        // Slab engines may report fewer transposed output points than local rows.
        let eps_inv = alloc_filled(
            layout.fft_output_size.max(layout.local_n),
            SymmetricMatrix::identity(),
            "inverse dielectric tensors",
        )?;
        let fft_data = alloc_filled(
            howmany * layout.fft_data_size,
            Complex64::default(),
            "transform scratch buffer",
        )?;
        let k_plus_g = alloc_filled(layout.local_n, KPlusG::default(), "k+G frames")?;
        let k_plus_g_normsqr = alloc_filled(layout.local_n, 0.0, "k+G squared norms")?;

        let binding = TransformBinding::create(engine.as_ref(), dims, howmany, local)?;

        debug!(
            "created operator state: engine={} rank={rank} grid={}x{}x{} local_n={} n_start={} alloc_n={} fft_output_size={} bands={num_bands}/{num_fft_bands}",
            engine.name(),
            dims.nx,
            dims.ny,
            dims.nz,
            layout.local_n,
            layout.n_start,
            layout.alloc_n,
            layout.fft_output_size,
        );

        Ok(Self {
            engine,
            layout,
            binding: Some(binding),
            num_bands,
            num_fft_bands,
            current_k: [0.0; 3],
            polarization: Polarization::None,
            eps_inv,
            eps_inv_mean: 1.0,
            k_plus_g,
            k_plus_g_normsqr,
            fft_data,
        })
    }

    /// Builds a state from `config`, checking that `engine` performs the
    /// configured transform family, and applies its polarization request.
    pub fn from_config(
        engine: Box<dyn TransformEngine>,
        config: &OperatorConfig,
    ) -> Result<Self, MaxwellError> {
        if engine.kind() != config.transform {
            return Err(MaxwellError::UnsupportedMode(format!(
                "engine {} performs {:?} transforms but {:?} were configured",
                engine.name(),
                engine.kind(),
                config.transform
            )));
        }
        let mut state = Self::new(engine, config.grid, config.num_bands, config.fft_bands())?;
        state.set_polarization(config.polarization);
        Ok(state)
    }

    /// Releases the transform plans and all owned arrays. Calling it again
    /// is a no-op.
    pub fn release(&mut self) {
        if let Some(binding) = self.binding.take() {
            drop(binding);
            self.eps_inv = Vec::new();
            self.fft_data = Vec::new();
            self.k_plus_g = Vec::new();
            self.k_plus_g_normsqr = Vec::new();
            debug!("released operator state ({} engine)", self.engine.name());
        }
    }

    pub fn is_released(&self) -> bool {
        self.binding.is_none()
    }

    fn ensure_live(&self) -> Result<(), MaxwellError> {
        if self.is_released() {
            Err(MaxwellError::Released)
        } else {
            Ok(())
        }
    }

    /// Sets the wavevector and rebuilds every local `k+G` frame.
    ///
    /// An exactly-zero `k` is replaced by `(1e-5, 0, 0)`; `current_k`
    /// reports the substituted value. The polarization is re-validated
    /// against the new `k`.
    pub fn update_k(
        &mut self,
        k: Vec3,
        g1: Vec3,
        g2: Vec3,
        g3: Vec3,
    ) -> Result<(), MaxwellError> {
        self.ensure_live()?;
        let k = kvector::regularize_k(k);
        self.current_k = k;
        self.set_polarization(self.polarization);
        kvector::fill_frames(
            &self.layout,
            k,
            &[g1, g2, g3],
            &mut self.k_plus_g,
            &mut self.k_plus_g_normsqr,
        );
        Ok(())
    }

    pub fn update_k_from_lattice(
        &mut self,
        k: Vec3,
        reciprocal: &ReciprocalLattice3D,
    ) -> Result<(), MaxwellError> {
        self.update_k(k, reciprocal.g1, reciprocal.g2, reciprocal.g3)
    }

    /// Requests a polarization; it is forced to `None` unless the grid is
    /// flat along z and the current wavevector is in-plane.
    pub fn set_polarization(&mut self, requested: Polarization) {
        let effective = requested.effective(self.layout.dims, self.current_k);
        if effective != requested {
            debug!("polarization {requested:?} is not valid here; using {effective:?}");
        }
        self.polarization = effective;
    }

    /// Recomputes the inverse dielectric field by sub-cell averaging of
    /// `epsilon` over the unit cell spanned by `lattice`.
    pub fn set_dielectric<F: DielectricFunction + ?Sized>(
        &mut self,
        options: &DielectricOptions,
        lattice: &Lattice3D,
        epsilon: &F,
    ) -> Result<(), MaxwellError> {
        self.set_dielectric_with_basis(options, [lattice.r1, lattice.r2, lattice.r3], epsilon)
    }

    pub fn set_dielectric_with_basis<F: DielectricFunction + ?Sized>(
        &mut self,
        options: &DielectricOptions,
        basis: [Vec3; 3],
        epsilon: &F,
    ) -> Result<(), MaxwellError> {
        self.ensure_live()?;
        self.eps_inv_mean =
            dielectric::average_dielectric(&self.layout, options, basis, epsilon, &mut self.eps_inv)?;
        Ok(())
    }

    /// Runs the forward plan in place on the scratch buffer.
    pub fn forward_fft(&mut self) -> Result<(), MaxwellError> {
        let binding = self.binding.as_mut().ok_or(MaxwellError::Released)?;
        binding.forward.execute(&mut self.fft_data)?;
        Ok(())
    }

    /// Runs the inverse plan in place on the scratch buffer.
    pub fn inverse_fft(&mut self) -> Result<(), MaxwellError> {
        let binding = self.binding.as_mut().ok_or(MaxwellError::Released)?;
        binding.inverse.execute(&mut self.fft_data)?;
        Ok(())
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn transform_kind(&self) -> TransformKind {
        self.engine.kind()
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn dims(&self) -> GridDims {
        self.layout.dims
    }

    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    pub fn num_fft_bands(&self) -> usize {
        self.num_fft_bands
    }

    pub fn current_k(&self) -> Vec3 {
        self.current_k
    }

    pub fn polarization(&self) -> Polarization {
        self.polarization
    }

    pub fn eps_inv(&self) -> &[SymmetricMatrix] {
        &self.eps_inv
    }

    /// Inverse tensor at local grid point `(i, j, k)`, `i` relative to the
    /// first local row.
    pub fn eps_inv_at(&self, i: usize, j: usize, k: usize) -> &SymmetricMatrix {
        let dims = self.layout.dims;
        &self.eps_inv[(i * dims.ny + j) * dims.nz + k]
    }

    pub fn eps_inv_mean(&self) -> f64 {
        self.eps_inv_mean
    }

    pub fn k_plus_g(&self) -> &[KPlusG] {
        &self.k_plus_g
    }

    pub fn k_plus_g_normsqr(&self) -> &[f64] {
        &self.k_plus_g_normsqr
    }

    pub fn fft_data(&self) -> &[Complex64] {
        &self.fft_data
    }

    pub fn fft_data_mut(&mut self) -> &mut [Complex64] {
        &mut self.fft_data
    }
}

impl std::fmt::Debug for OperatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorState")
            .field("engine", &self.engine.name())
            .field("layout", &self.layout)
            .field("num_bands", &self.num_bands)
            .field("num_fft_bands", &self.num_fft_bands)
            .field("current_k", &self.current_k)
            .field("polarization", &self.polarization)
            .field("eps_inv_mean", &self.eps_inv_mean)
            .field("released", &self.is_released())
            .finish()
    }
}
