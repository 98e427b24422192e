//! Periodic geometry built from simple shapes in a background medium.
//!
//! [`Geometry3D`] is a ready-made [`DielectricFunction`]: positions are
//! wrapped to the nearest lattice image of each object's center, and objects
//! later in the list win where they overlap.

use serde::{Deserialize, Serialize};

use crate::dielectric::DielectricFunction;
use crate::lattice::Lattice3D;
use crate::vec3::{self, Vec3};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometricObject {
    Sphere {
        center: Vec3,
        radius: f64,
        epsilon: f64,
    },
    /// Circular cylinder; `height = None` extends it infinitely along `axis`.
    Cylinder {
        center: Vec3,
        #[serde(default = "default_axis")]
        axis: Vec3,
        radius: f64,
        #[serde(default)]
        height: Option<f64>,
        epsilon: f64,
    },
    /// Cartesian axis-aligned box.
    Block {
        center: Vec3,
        size: Vec3,
        epsilon: f64,
    },
}

fn default_axis() -> Vec3 {
    [0.0, 0.0, 1.0]
}

impl GeometricObject {
    pub fn center(&self) -> Vec3 {
        match *self {
            Self::Sphere { center, .. }
            | Self::Cylinder { center, .. }
            | Self::Block { center, .. } => center,
        }
    }

    pub fn epsilon(&self) -> f64 {
        match *self {
            Self::Sphere { epsilon, .. }
            | Self::Cylinder { epsilon, .. }
            | Self::Block { epsilon, .. } => epsilon,
        }
    }

    /// Whether the point at displacement `d` from the center is inside.
    pub fn contains_offset(&self, d: Vec3) -> bool {
        match *self {
            Self::Sphere { radius, .. } => vec3::dot(d, d) <= radius * radius,
            Self::Cylinder {
                axis,
                radius,
                height,
                ..
            } => {
                let axis = vec3::scale(axis, 1.0 / vec3::norm(axis));
                let along = vec3::dot(d, axis);
                let radial = vec3::sub(d, vec3::scale(axis, along));
                let within_height = height.is_none_or(|h| along.abs() <= 0.5 * h);
                within_height && vec3::dot(radial, radial) <= radius * radius
            }
            Self::Block { size, .. } => (0..3).all(|axis| d[axis].abs() <= 0.5 * size[axis]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry3D {
    pub lattice: Lattice3D,
    #[serde(default = "default_eps_bg")]
    pub eps_bg: f64,
    #[serde(default)]
    pub objects: Vec<GeometricObject>,
}

fn default_eps_bg() -> f64 {
    1.0
}

impl Geometry3D {
    pub fn uniform(lattice: Lattice3D, eps: f64) -> Self {
        Self {
            lattice,
            eps_bg: eps,
            objects: Vec::new(),
        }
    }

    pub fn with_objects(lattice: Lattice3D, eps_bg: f64, objects: Vec<GeometricObject>) -> Self {
        Self {
            lattice,
            eps_bg,
            objects,
        }
    }

    /// Displacement from `center` to the nearest lattice image of `r`.
    pub fn nearest_image_offset(&self, r: Vec3, center: Vec3) -> Vec3 {
        let frac = self.lattice.cartesian_to_fractional(vec3::sub(r, center));
        let wrapped = frac.map(|f| f - f.round());
        self.lattice.fractional_to_cartesian(wrapped)
    }

    pub fn permittivity_at(&self, r: Vec3) -> f64 {
        self.objects
            .iter()
            .rev()
            .find(|object| object.contains_offset(self.nearest_image_offset(r, object.center())))
            .map_or(self.eps_bg, GeometricObject::epsilon)
    }
}

impl DielectricFunction for Geometry3D {
    fn epsilon(&self, r: Vec3) -> f64 {
        self.permittivity_at(r)
    }
}
