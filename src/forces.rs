use glam::DVec3;
use rayon::prelude::*;

use crate::{
    cell::CellState, corner::CornerCoefficients, mesh::Mesh, physical_quantities::Residual,
};

/// Accumulate the residual (dV/dt, momentum rate, energy rate) of every cell from
/// the sub-cell forces of its corners.
///
/// Corners are visited in the per-cell order of the mesh, so the result does
/// not depend on the thread schedule.
pub fn compute_residuals(
    mesh: &Mesh,
    cells: &[CellState],
    corners: &[CornerCoefficients],
    vertex_velocities: &[DVec3],
    residuals: &mut [Residual],
) {
    residuals
        .par_iter_mut()
        .zip(cells.par_iter())
        .enumerate()
        .for_each(|(cell_idx, (residual, cell))| {
            *residual = Residual::vacuum();
            for corner in mesh.cell_corners(cell_idx) {
                let coefficients = &corners[corner];
                let vertex_velocity = vertex_velocities[mesh.corner_vertex(corner)];
                let force = coefficients.force(cell.pressure, cell.velocity, vertex_velocity);
                residual.add_corner_force(force, coefficients.normal, vertex_velocity);
            }
        });
}
