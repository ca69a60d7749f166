use glam::{DMat3, DVec3};
use yaml_rust::Yaml;

use crate::errors::ConfigError;

/// The number of spatial dimensions of a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(usize)]
pub enum Dimensionality {
    TwoD = 2,
    ThreeD = 3,
}

impl Dimensionality {
    pub fn count(&self) -> usize {
        (*self).into()
    }

    /// Pads the unused directions of a nodal matrix with the identity so that
    /// a 2D system can be solved as a 3x3 one.
    pub fn pad(&self, mat: DMat3) -> DMat3 {
        match self {
            Dimensionality::TwoD => {
                let mut mat = mat;
                mat.z_axis = DVec3::Z;
                mat.x_axis.z = 0.;
                mat.y_axis.z = 0.;
                mat
            }
            Dimensionality::ThreeD => mat,
        }
    }
}

/// Outer product `a ⊗ b`.
pub fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(b.x * a, b.y * a, b.z * a)
}

/// Minimal pairwise distance between the given points.
pub fn min_pairwise_distance(points: impl Iterator<Item = DVec3> + Clone) -> f64 {
    let mut min_length = f64::INFINITY;
    for (i, pi) in points.clone().enumerate() {
        for pj in points.clone().skip(i + 1) {
            min_length = min_length.min(pi.distance(pj));
        }
    }
    min_length
}

/// Read the real number stored under `key`, accepting integer literals as well.
///
/// A missing key yields `None`, any other kind of value is an error naming
/// `section:key`.
pub fn read_f64(cfg: &Yaml, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
    let invalid = |value: &Yaml| ConfigError::InvalidValue(format!("{section}:{key}"), format!("{value:?}"));
    match &cfg[key] {
        Yaml::BadValue => Ok(None),
        Yaml::Integer(i) => Ok(Some(*i as f64)),
        value @ Yaml::Real(s) => s.parse::<f64>().map(Some).map_err(|_| invalid(value)),
        value => Err(invalid(value)),
    }
}
