use glam::DVec3;
use rayon::prelude::*;

use crate::{cell::CellState, errors::HydroError, mesh::Mesh};

/// Snapshot of the mesh coordinates and of the cell solution at the start of a step.
///
/// The buffers are reused between saves.
#[derive(Debug, Default, Clone)]
pub struct Checkpoint {
    coordinates: Option<Vec<DVec3>>,
    solution: Option<Vec<(DVec3, f64)>>,
}

impl Checkpoint {
    pub fn save_coordinates(&mut self, mesh: &Mesh) {
        let buffer = self.coordinates.get_or_insert_with(Vec::new);
        buffer.clear();
        buffer.extend_from_slice(mesh.coordinates());
    }

    /// Restore the saved coordinates and recompute the mesh geometry.
    pub fn restore_coordinates(&self, mesh: &mut Mesh) -> Result<(), HydroError> {
        let saved = self
            .coordinates
            .as_ref()
            .ok_or(HydroError::MissingCheckpoint("coordinates"))?;
        mesh.coordinates_mut().copy_from_slice(saved);
        mesh.update_geometry();
        Ok(())
    }

    /// Save the velocity and internal energy of every cell.
    pub fn save_solution(&mut self, cells: &[CellState]) {
        let buffer = self.solution.get_or_insert_with(Vec::new);
        buffer.clear();
        buffer.par_extend(cells.par_iter().map(|cell| (cell.velocity, cell.internal_energy)));
    }

    pub fn restore_solution(&self, cells: &mut [CellState]) -> Result<(), HydroError> {
        let saved = self
            .solution
            .as_ref()
            .ok_or(HydroError::MissingCheckpoint("solution"))?;
        cells
            .par_iter_mut()
            .zip(saved.par_iter())
            .for_each(|(cell, &(velocity, internal_energy))| {
                cell.velocity = velocity;
                cell.internal_energy = internal_energy;
            });
        Ok(())
    }
}
