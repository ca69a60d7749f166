use yaml_rust::Yaml;

use crate::{errors::ConfigError, utils::read_f64};

#[derive(Debug, Default, Clone, Copy)]
pub struct AdiabaticIndex {
    gamma: f64,
    odgm1: f64,
}

impl From<f64> for AdiabaticIndex {
    fn from(value: f64) -> Self {
        AdiabaticIndex {
            gamma: value,
            odgm1: 1. / (value - 1.),
        }
    }
}

impl From<AdiabaticIndex> for f64 {
    fn from(value: AdiabaticIndex) -> Self {
        value.gamma
    }
}

impl AdiabaticIndex {
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn gm1(&self) -> f64 {
        self.gamma - 1.
    }

    pub fn odgm1(&self) -> f64 {
        self.odgm1
    }

    /// (gamma + 1) / 2
    pub fn gp1d2(&self) -> f64 {
        0.5 * (self.gamma + 1.)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EquationOfState {
    Ideal,
    Isothermal { isothermal_internal_energy: f64 },
}

/// The thermodynamic closure of the Lagrangian equations.
///
/// All functions are pure maps from the primary cell state to secondary
/// quantities.
#[derive(Debug, Clone, Copy)]
pub struct GasLaw {
    gamma: AdiabaticIndex,
    specific_heat: f64,
    eos: EquationOfState,
}

impl GasLaw {
    pub fn new(gamma: f64, specific_heat: f64, eos: EquationOfState) -> Self {
        Self {
            gamma: gamma.into(),
            specific_heat,
            eos,
        }
    }

    pub fn ideal(gamma: f64) -> Self {
        Self::new(gamma, 1., EquationOfState::Ideal)
    }

    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let gamma = read_f64(cfg, "hydrodynamics", "gamma")?.ok_or(
            ConfigError::MissingParameter("hydrodynamics:gamma".to_string()),
        )?;
        if gamma <= 1. {
            return Err(ConfigError::InvalidValue(
                "hydrodynamics:gamma".to_string(),
                gamma.to_string(),
            ));
        }
        let specific_heat = read_f64(cfg, "hydrodynamics", "specific_heat")?.unwrap_or(1.);
        let kind = cfg["equation_of_state"].as_str().unwrap_or("Ideal");
        let eos = match kind {
            "Ideal" => EquationOfState::Ideal,
            "Isothermal" => {
                let isothermal_internal_energy =
                    read_f64(cfg, "hydrodynamics", "isothermal_internal_energy")?.ok_or(
                        ConfigError::MissingParameter(
                            "hydrodynamics:isothermal_internal_energy".to_string(),
                        ),
                    )?;
                EquationOfState::Isothermal {
                    isothermal_internal_energy,
                }
            }
            _ => return Err(ConfigError::UnknownEOS(kind.to_string())),
        };
        Ok(Self::new(gamma, specific_heat, eos))
    }

    pub fn gamma(&self) -> &AdiabaticIndex {
        &self.gamma
    }

    /// The internal energy every cell is pinned to, if the equation of state has one.
    pub fn fixed_internal_energy(&self) -> Option<f64> {
        match self.eos {
            EquationOfState::Ideal => None,
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => Some(isothermal_internal_energy),
        }
    }

    /// Specific internal energy
    pub fn gas_internal_energy_from_pressure(&self, pressure: f64, density_inv: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => pressure * density_inv * self.gamma.odgm1(),
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => isothermal_internal_energy,
        }
    }

    pub fn gas_pressure_from_internal_energy(&self, internal_energy: f64, density: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => self.gamma.gm1() * internal_energy * density,
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => self.gamma.gm1() * isothermal_internal_energy * density,
        }
    }

    pub fn sound_speed(&self, pressure: f64, density_inv: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => (self.gamma.gamma() * pressure * density_inv).sqrt(),
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => f64::sqrt(isothermal_internal_energy * self.gamma.gamma() * self.gamma.gm1()),
        }
    }

    pub fn temperature(&self, internal_energy: f64) -> f64 {
        match self.eos {
            EquationOfState::Ideal => internal_energy / self.specific_heat,
            EquationOfState::Isothermal {
                isothermal_internal_energy,
            } => isothermal_internal_energy / self.specific_heat,
        }
    }

    /// Coefficient of the velocity jump in the shock impedance estimate
    /// `z = rho * (a + G |du|)`.
    pub fn impedance_multiplier(&self) -> f64 {
        self.gamma.gp1d2()
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use yaml_rust::YamlLoader;

    use super::*;

    #[test]
    fn test_ideal_roundtrip() {
        let gas_law = GasLaw::ideal(1.4);
        let density = 2.;
        let pressure = 0.8;
        let u = gas_law.gas_internal_energy_from_pressure(pressure, 1. / density);
        assert_approx_eq!(f64, u, 1., epsilon = 1e-12);
        assert_approx_eq!(f64, gas_law.gas_pressure_from_internal_energy(u, density), pressure, epsilon = 1e-12);
        assert_approx_eq!(f64, gas_law.sound_speed(pressure, 1. / density), 0.56f64.sqrt(), epsilon = 1e-12);
        assert_approx_eq!(f64, gas_law.impedance_multiplier(), 1.2);
    }

    #[test]
    fn test_init() {
        let cfg = &YamlLoader::load_from_str(
            "gamma: 1.66666667\nspecific_heat: 2.\nequation_of_state: \"Ideal\"",
        )
        .unwrap()[0];
        let gas_law = GasLaw::init(cfg).unwrap();
        assert_approx_eq!(f64, gas_law.gamma().gamma(), 1.66666667);
        assert_approx_eq!(f64, gas_law.temperature(3.), 1.5);

        let cfg = &YamlLoader::load_from_str("gamma: 1.4\nequation_of_state: \"Polytropic\"")
            .unwrap()[0];
        assert!(matches!(GasLaw::init(cfg), Err(ConfigError::UnknownEOS(_))));

        let cfg = &YamlLoader::load_from_str("equation_of_state: \"Ideal\"").unwrap()[0];
        assert!(matches!(
            GasLaw::init(cfg),
            Err(ConfigError::MissingParameter(_))
        ));

        let cfg = &YamlLoader::load_from_str(
            "gamma: 2\nspecific_heat: 3\nequation_of_state: \"Isothermal\"\nisothermal_internal_energy: 1",
        )
        .unwrap()[0];
        let gas_law = GasLaw::init(cfg).unwrap();
        assert_eq!(gas_law.gamma().gamma(), 2.);
        assert_eq!(gas_law.fixed_internal_energy(), Some(1.));
        assert_approx_eq!(f64, gas_law.temperature(5.), 1. / 3.);

        let cfg = &YamlLoader::load_from_str("gamma: [1.4]").unwrap()[0];
        assert!(matches!(
            GasLaw::init(cfg),
            Err(ConfigError::InvalidValue(..))
        ));
    }
}
