use glam::DVec3;
use yaml_rust::Yaml;

use crate::{errors::ConfigError, physical_quantities::Primitives};

/// Initial conditions as a function of the position of a cell centroid.
pub type InitialConditionsFn = fn(DVec3) -> Primitives;

fn sod_shock(coordinate: DVec3) -> Primitives {
    if coordinate.x < 0.5 {
        Primitives::new(1., DVec3::ZERO, 1.)
    } else {
        Primitives::new(0.125, DVec3::ZERO, 0.1)
    }
}

/// Cold gas streaming radially towards the origin.
fn noh(coordinate: DVec3) -> Primitives {
    let radius = coordinate.length();
    let velocity = if radius > 0. {
        -coordinate / radius
    } else {
        DVec3::ZERO
    };
    Primitives::new(1., velocity, 1.0e-6)
}

/// Cold gas with an overpressured region of radius `0.1` around the origin.
fn sedov(coordinate: DVec3) -> Primitives {
    let pressure = if coordinate.length() < 0.1 { 10. } else { 1.0e-6 };
    Primitives::new(1., DVec3::ZERO, pressure)
}

/// Uniform gas at rest.
///
/// Left to itself this state has no volume change, so the first time step
/// fails with [`HydroError::DegenerateTimeStep`]. It is meant to be driven by a
/// velocity or pressure boundary.
///
/// [`HydroError::DegenerateTimeStep`]: crate::HydroError::DegenerateTimeStep
fn constant(_coordinate: DVec3) -> Primitives {
    Primitives::new(1., DVec3::ZERO, 1.)
}

/// Look up a preset by name.
pub fn ics_from_preset(name: &str) -> Result<InitialConditionsFn, ConfigError> {
    match name {
        "sodshock" => Ok(sod_shock),
        "noh" => Ok(noh),
        "sedov" => Ok(sedov),
        "constant" => Ok(constant),
        _ => Err(ConfigError::UnknownICs(name.to_string())),
    }
}

/// Read the `initial_conditions` section of the configuration.
pub fn ics_from_config(cfg: &Yaml) -> Result<InitialConditionsFn, ConfigError> {
    let kind = cfg["kind"].as_str().ok_or(ConfigError::MissingParameter(
        "initial_conditions:kind".to_string(),
    ))?;
    ics_from_preset(kind)
}

#[cfg(test)]
mod test {
    use glam::DVec3;

    use super::*;

    #[test]
    fn test_presets() {
        let sod = ics_from_preset("sodshock").unwrap();
        assert_eq!(sod(DVec3::new(0.25, 0.5, 0.)).pressure(), 1.);
        assert_eq!(sod(DVec3::new(0.75, 0.5, 0.)).density(), 0.125);

        let noh = ics_from_preset("noh").unwrap();
        assert_eq!(noh(DVec3::new(3., 4., 0.)).velocity(), DVec3::new(-0.6, -0.8, 0.));
        assert_eq!(noh(DVec3::ZERO).velocity(), DVec3::ZERO);

        assert!(matches!(
            ics_from_preset("evrard"),
            Err(ConfigError::UnknownICs(_))
        ));
    }
}
