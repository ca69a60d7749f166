use super::{evaluate_residuals, Runner};
use crate::{errors::HydroError, Space};

/// Two stage scheme: the residuals are evaluated a second time at the half step
/// and used to advance the state saved at the start of the step.
pub struct PredictorCorrector;

impl Runner for PredictorCorrector {
    fn label(&self) -> String {
        "PredictorCorrector".to_string()
    }

    fn step(&self, space: &mut Space) -> Result<(), HydroError> {
        space.save_coordinates();
        space.save_solution();

        // Predictor
        evaluate_residuals(space)?;
        space.evaluate_time_step()?;
        space.move_mesh(0.5);
        space.apply_update(0.5)?;

        // Corrector
        evaluate_residuals(space)?;
        space.restore_coordinates()?;
        space.restore_solution()?;
        space.move_mesh(1.);
        space.apply_update(1.)?;

        space.advance_time();
        Ok(())
    }
}
