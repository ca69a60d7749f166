use rayon::prelude::*;
use yaml_rust::Yaml;

use crate::{
    cell::CellState, errors::ConfigError, errors::HydroError, mesh::Mesh,
    physical_quantities::Residual, utils::read_f64,
};

/// The CFL-like constants of the three time step criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConstants {
    pub acoustic: f64,
    pub volume: f64,
    /// Maximal growth factor of the time step between two steps.
    pub growth: f64,
}

impl Default for TimeConstants {
    fn default() -> Self {
        Self {
            acoustic: 0.5,
            volume: 0.1,
            growth: 1.01,
        }
    }
}

impl TimeConstants {
    /// Read the `cfl` section of the time integration configuration.
    /// Missing entries take their default value.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let default = Self::default();
        let read = |key: &str, default: f64| -> Result<f64, ConfigError> {
            let value = read_f64(cfg, "time_integration:cfl", key)?.unwrap_or(default);
            if value > 0. {
                Ok(value)
            } else {
                Err(ConfigError::InvalidValue(
                    format!("time_integration:cfl:{key}"),
                    value.to_string(),
                ))
            }
        };
        Ok(Self {
            acoustic: read("acoustic", default.acoustic)?,
            volume: read("volume", default.volume)?,
            growth: read("growth", default.growth)?,
        })
    }
}

/// The criterion that limited the last time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[repr(usize)]
pub enum TimeStepLimiter {
    Acoustic = 0,
    Volume = 1,
    Growth = 2,
}

impl TimeStepLimiter {
    pub fn label(&self) -> &'static str {
        match self {
            TimeStepLimiter::Acoustic => "accoustic",
            TimeStepLimiter::Volume => "volume",
            TimeStepLimiter::Growth => "growth",
        }
    }
}

/// Select the smallest candidate time step. Ties go to the first candidate.
pub fn select(candidates: &[f64]) -> Result<(f64, TimeStepLimiter), HydroError> {
    let (index, &dt) = candidates
        .iter()
        .enumerate()
        .fold(None, |min: Option<(usize, &f64)>, (index, dt)| match min {
            Some((_, min_dt)) if min_dt <= dt => min,
            _ => Some((index, dt)),
        })
        .ok_or(HydroError::UnclassifiedLimiter(0))?;
    let limiter =
        TimeStepLimiter::try_from(index).map_err(|_| HydroError::UnclassifiedLimiter(index))?;
    Ok((dt, limiter))
}

/// Compute the next time step from the acoustic, volumetric and growth criteria.
pub fn compute_time_step(
    mesh: &Mesh,
    cells: &[CellState],
    residuals: &[Residual],
    constants: &TimeConstants,
    previous: f64,
) -> Result<(f64, TimeStepLimiter), HydroError> {
    let (dt_acc_inv, dt_vol_inv) = cells
        .par_iter()
        .zip(residuals.par_iter())
        .enumerate()
        .map(|(cell_idx, (cell, residual))| {
            if !(cell.volume > 0.) {
                return Err(HydroError::DegenerateCell {
                    cell: cell_idx,
                    volume: cell.volume,
                });
            }
            let dt_acc_inv = cell.sound_speed / mesh.cell_min_length(cell_idx) / constants.acoustic;
            let dt_vol_inv = residual.volume().abs() / cell.volume / constants.volume;
            Ok((dt_acc_inv, dt_vol_inv))
        })
        .try_reduce(|| (0., 0.), |a, b| Ok((a.0.max(b.0), a.1.max(b.1))))?;

    if !(dt_acc_inv > 0. && dt_vol_inv > 0. && dt_acc_inv.is_finite() && dt_vol_inv.is_finite()) {
        return Err(HydroError::DegenerateTimeStep {
            dt_acc_inv,
            dt_vol_inv,
        });
    }

    let dt_acc = constants.acoustic / dt_acc_inv;
    let dt_vol = constants.volume / dt_vol_inv;
    let dt_growth = constants.growth * previous;
    select(&[dt_acc, dt_vol, dt_growth])
}
