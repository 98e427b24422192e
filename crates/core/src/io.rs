//! Job configuration loaded from TOML.
//!
//! ```toml
//! k_points = [[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]]
//!
//! [operator]
//! num_bands = 8
//! transform = "complex"
//! polarization = "TM"
//!
//! [operator.grid]
//! nx = 32
//! ny = 32
//!
//! [geometry]
//! eps_bg = 1.0
//!
//! [geometry.lattice]
//! r1 = [1.0, 0.0, 0.0]
//! r2 = [0.0, 1.0, 0.0]
//! r3 = [0.0, 0.0, 1.0]
//!
//! [[geometry.objects]]
//! type = "cylinder"
//! center = [0.0, 0.0, 0.0]
//! radius = 0.2
//! epsilon = 12.0
//!
//! [dielectric]
//! mesh_size = [4, 4, 1]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    dielectric::DielectricOptions, geometry::Geometry3D, operator::OperatorConfig, vec3::Vec3,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub operator: OperatorConfig,
    pub geometry: Geometry3D,
    #[serde(default)]
    pub dielectric: DielectricOptions,
    /// Wavevectors in units of the reciprocal basis.
    #[serde(default)]
    pub k_points: Vec<Vec3>,
}

impl JobConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.operator.grid;
        if grid.nx == 0 || grid.ny == 0 || grid.nz == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be non-zero, got {}x{}x{}",
                grid.nx, grid.ny, grid.nz
            )));
        }
        if self.operator.num_bands == 0 {
            return Err(ConfigError::Invalid("num_bands must be positive".into()));
        }
        if self.operator.num_fft_bands == Some(0) {
            return Err(ConfigError::Invalid("num_fft_bands must be positive".into()));
        }
        if self.dielectric.mesh_size.contains(&0) {
            return Err(ConfigError::Invalid(format!(
                "mesh_size entries must be at least 1, got {:?}",
                self.dielectric.mesh_size
            )));
        }
        if self.geometry.lattice.volume() <= f64::EPSILON {
            return Err(ConfigError::Invalid(
                "lattice vectors are linearly dependent".into(),
            ));
        }
        if self.geometry.eps_bg <= 0.0
            || self.geometry.objects.iter().any(|object| object.epsilon() <= 0.0)
        {
            return Err(ConfigError::Invalid(
                "permittivities must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `k_points` converted to cartesian wavevectors.
    pub fn cartesian_k_points(&self) -> Vec<Vec3> {
        let reciprocal = self.geometry.lattice.reciprocal();
        self.k_points
            .iter()
            .map(|&frac| crate::vec3::combine(frac, reciprocal.g1, reciprocal.g2, reciprocal.g3))
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
