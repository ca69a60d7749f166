use yaml_rust::Yaml;

use crate::{
    errors::{ConfigError, HydroError},
    runner::Runner,
    space::Space,
    utils::read_f64,
};

/// Drives a [`Runner`] over a [`Space`] until the end time or the maximal
/// number of steps is reached.
pub struct Engine {
    runner: Box<dyn Runner>,
    initial_time_step: f64,
    t_end: f64,
    max_steps: usize,
    dt_status: f64,
    step_count: usize,
}

impl Engine {
    pub fn new(
        runner: Box<dyn Runner>,
        initial_time_step: f64,
        t_end: f64,
        max_steps: usize,
        dt_status: f64,
    ) -> Self {
        Self {
            runner,
            initial_time_step,
            t_end,
            max_steps,
            dt_status,
            step_count: 0,
        }
    }

    /// Set up an engine from the `time_integration` and `engine` sections of the configuration.
    pub fn init(time_integration_cfg: &Yaml, engine_cfg: &Yaml) -> Result<Self, ConfigError> {
        let runner = time_integration_cfg["runner"]
            .as_str()
            .unwrap_or("PredictorCorrector");
        let runner = <dyn Runner>::from_label(runner)?;
        let initial_time_step =
            read_f64(time_integration_cfg, "time_integration", "initial_time_step")?.ok_or(
                ConfigError::MissingParameter("time_integration:initial_time_step".to_string()),
            )?;
        if !(initial_time_step > 0.) {
            return Err(ConfigError::InvalidValue(
                "time_integration:initial_time_step".to_string(),
                initial_time_step.to_string(),
            ));
        }
        let t_end = read_f64(time_integration_cfg, "time_integration", "t_end")?
            .ok_or(ConfigError::MissingParameter(
                "time_integration:t_end".to_string(),
            ))?;
        let max_steps = match &time_integration_cfg["max_steps"] {
            Yaml::BadValue => usize::MAX,
            Yaml::Integer(max_steps) => (*max_steps).max(0) as usize,
            value => {
                return Err(ConfigError::InvalidValue(
                    "time_integration:max_steps".to_string(),
                    format!("{value:?}"),
                ))
            }
        };
        let dt_status = read_f64(engine_cfg, "engine", "dt_status")?.unwrap_or(t_end / 100.);

        Ok(Self::new(
            runner,
            initial_time_step,
            t_end,
            max_steps,
            dt_status,
        ))
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Run the simulation. Stops at the first error.
    pub fn run(&mut self, space: &mut Space) -> Result<(), HydroError> {
        if !(space.time_step() > 0.) {
            space.set_time_step(self.initial_time_step);
        }
        space.estimate_nodal_state();

        log::info!(
            "Running {} from t = {} to t = {}",
            self.runner.label(),
            space.time(),
            self.t_end
        );
        let mut t_status = space.time() + self.dt_status;
        while space.time() < self.t_end && self.step_count < self.max_steps {
            if let Err(error) = self.runner.step(space) {
                log::error!(
                    "Step {} failed at t = {}: {error}",
                    self.step_count,
                    space.time()
                );
                return Err(error);
            }
            self.step_count += 1;
            space.self_check();

            if space.time() >= t_status {
                log::info!(
                    "[step {}] t = {:.6e}, dt = {:.6e} ({})",
                    self.step_count,
                    space.time(),
                    space.time_step(),
                    space.limiter().map_or("none", |limiter| limiter.label())
                );
                t_status += self.dt_status;
            }
        }

        let totals = space.conservation_totals();
        log::info!(
            "Finished after {} steps at t = {}: mass = {:.12e}, energy = {:.12e}",
            self.step_count,
            space.time(),
            totals.mass(),
            totals.energy()
        );
        Ok(())
    }
}
