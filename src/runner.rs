use crate::{errors::ConfigError, errors::HydroError, Space};

mod forward_euler;
mod predictor_corrector;

pub use forward_euler::ForwardEuler;
pub use predictor_corrector::PredictorCorrector;

/// A time integration scheme built from the tasks of a [`Space`].
pub trait Runner {
    fn label(&self) -> String;

    /// Advance `space` over one time step. The time step is determined during the step.
    fn step(&self, space: &mut Space) -> Result<(), HydroError>;
}

impl dyn Runner {
    pub fn from_label(label: &str) -> Result<Box<dyn Runner>, ConfigError> {
        match label {
            "ForwardEuler" => Ok(Box::new(ForwardEuler)),
            "PredictorCorrector" => Ok(Box::new(PredictorCorrector)),
            _ => Err(ConfigError::UnknownRunner(label.to_string())),
        }
    }
}

/// Corner coefficients, nodal velocities and residuals of the current state.
fn evaluate_residuals(space: &mut Space) -> Result<(), HydroError> {
    space.evaluate_corner_coef()?;
    space.evaluate_nodal_state()?;
    space.evaluate_forces();
    Ok(())
}
