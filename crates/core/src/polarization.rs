//! Polarization restriction (TE/TM) for 2D problems with in-plane k.

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;
use crate::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarization {
    #[default]
    None,
    TE,
    TM,
}

impl Polarization {
    /// The polarization that actually applies to `dims` at wavevector `k`.
    ///
    /// The TE/TM split only exists when the grid is flat along the third axis
    /// and `k` has no third component; anything else becomes `None`.
    pub fn effective(self, dims: GridDims, k: Vec3) -> Self {
        if k[2] != 0.0 || dims.nz != 1 {
            Polarization::None
        } else {
            self
        }
    }
}
