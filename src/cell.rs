use glam::DVec3;

use crate::{
    gas_law::GasLaw,
    physical_quantities::{Conserved, Primitives, State},
};

/// Thermodynamic and kinematic state of a single (Lagrangian) cell.
///
/// `mass` is constant in time; every other quantity is refreshed by the state updater.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CellState {
    pub mass: f64,
    pub volume: f64,
    pub density: f64,
    pub pressure: f64,
    /// Specific internal energy
    pub internal_energy: f64,
    pub temperature: f64,
    pub sound_speed: f64,
    pub velocity: DVec3,
}

impl CellState {
    /// Initialize a cell of the given volume from its primitive variables.
    pub fn from_primitives(primitives: Primitives, volume: f64, gas_law: &GasLaw) -> Self {
        let mut cell = Self {
            mass: primitives.density() * volume,
            volume,
            density: primitives.density(),
            pressure: primitives.pressure(),
            velocity: primitives.velocity(),
            ..Default::default()
        };
        cell.update_state_from_pressure(gas_law);
        cell
    }

    /// (density, pressure) -> (internal energy, temperature, sound speed)
    ///
    /// With a fixed internal energy, the pressure is overwritten by the one of
    /// the equation of state.
    pub fn update_state_from_pressure(&mut self, gas_law: &GasLaw) {
        let density_inv = 1. / self.density;
        self.internal_energy = gas_law.gas_internal_energy_from_pressure(self.pressure, density_inv);
        if gas_law.fixed_internal_energy().is_some() {
            self.pressure = gas_law.gas_pressure_from_internal_energy(self.internal_energy, self.density);
        }
        self.temperature = gas_law.temperature(self.internal_energy);
        self.sound_speed = gas_law.sound_speed(self.pressure, density_inv);
    }

    /// (density, internal energy) -> (pressure, temperature, sound speed)
    ///
    /// With a fixed internal energy, the internal energy is reset first.
    pub fn update_state_from_energy(&mut self, gas_law: &GasLaw) {
        if let Some(internal_energy) = gas_law.fixed_internal_energy() {
            self.internal_energy = internal_energy;
        }
        self.pressure = gas_law.gas_pressure_from_internal_energy(self.internal_energy, self.density);
        self.temperature = gas_law.temperature(self.internal_energy);
        self.sound_speed = gas_law.sound_speed(self.pressure, 1. / self.density);
    }

    /// Acoustic impedance `density * sound_speed`.
    pub fn impedance(&self) -> f64 {
        self.density * self.sound_speed
    }

    /// Specific total energy
    pub fn total_energy(&self) -> f64 {
        self.internal_energy + 0.5 * self.velocity.length_squared()
    }

    pub fn conserved(&self) -> State<Conserved> {
        State::<Conserved>::new(self.mass, self.mass * self.velocity, self.mass * self.total_energy())
    }

    pub fn primitives(&self) -> Primitives {
        Primitives::new(self.density, self.velocity, self.pressure)
    }
}
