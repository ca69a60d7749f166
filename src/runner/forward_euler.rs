use super::{evaluate_residuals, Runner};
use crate::{errors::HydroError, Space};

/// First order scheme: a single evaluation of the residuals at the start of the step.
pub struct ForwardEuler;

impl Runner for ForwardEuler {
    fn label(&self) -> String {
        "ForwardEuler".to_string()
    }

    fn step(&self, space: &mut Space) -> Result<(), HydroError> {
        evaluate_residuals(space)?;
        space.evaluate_time_step()?;

        space.move_mesh(1.);
        space.apply_update(1.)?;

        space.advance_time();
        Ok(())
    }
}
