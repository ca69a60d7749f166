use glam::DVec3;
use rayon::prelude::*;

use crate::{
    boundary::BoundaryMap,
    cell::CellState,
    checkpoint::Checkpoint,
    corner::CornerCoefficients,
    errors::HydroError,
    forces::compute_residuals,
    gas_law::GasLaw,
    mesh::Mesh,
    nodal::{estimate_nodal_state, NodalSolver},
    physical_quantities::{Conserved, Primitives, Residual, State},
    time_step::{compute_time_step, TimeConstants, TimeStepLimiter},
    update::{apply_update, conservation_totals, Diagnostics, LogDiagnostics},
};

/// The complete state of a Lagrangian hydro simulation: the mesh, the per cell,
/// per vertex and per corner quantities, and the global time step state.
///
/// The per entity buffers are allocated once and overwritten by the tasks.
pub struct Space {
    mesh: Mesh,
    cells: Vec<CellState>,
    vertex_velocities: Vec<DVec3>,
    corners: Vec<CornerCoefficients>,
    residuals: Vec<Residual>,
    checkpoint: Checkpoint,
    gas_law: GasLaw,
    boundaries: BoundaryMap,
    time_constants: TimeConstants,
    time: f64,
    time_step: f64,
    limiter: Option<TimeStepLimiter>,
    diagnostics: Box<dyn Diagnostics>,
}

impl Space {
    pub fn new(
        mesh: Mesh,
        gas_law: GasLaw,
        boundaries: BoundaryMap,
        time_constants: TimeConstants,
    ) -> Self {
        Self {
            cells: vec![CellState::default(); mesh.num_cells()],
            vertex_velocities: vec![DVec3::ZERO; mesh.num_vertices()],
            corners: vec![CornerCoefficients::default(); mesh.num_corners()],
            residuals: vec![Residual::vacuum(); mesh.num_cells()],
            checkpoint: Checkpoint::default(),
            mesh,
            gas_law,
            boundaries,
            time_constants,
            time: 0.,
            time_step: 0.,
            limiter: None,
            diagnostics: Box::new(LogDiagnostics),
        }
    }

    /// Replace the receiver of the conservation sums.
    pub fn set_diagnostics(&mut self, diagnostics: Box<dyn Diagnostics>) {
        self.diagnostics = diagnostics;
    }

    /// Set the state of every cell from `ics(centroid, time)`.
    pub fn initial_conditions<F>(&mut self, ics: F)
    where
        F: Fn(DVec3, f64) -> Primitives + Sync,
    {
        let mesh = &self.mesh;
        let gas_law = &self.gas_law;
        let time = self.time;
        self.cells
            .par_iter_mut()
            .enumerate()
            .for_each(|(cell_idx, cell)| {
                let primitives = ics(mesh.cell_centroid(cell_idx), time);
                *cell = CellState::from_primitives(primitives, mesh.cell_volume(cell_idx), gas_law);
            });
    }

    /// Initial guess of the vertex velocities from the incident cells.
    pub fn estimate_nodal_state(&mut self) {
        estimate_nodal_state(&self.mesh, &self.cells, &mut self.vertex_velocities);
    }

    /// Rebuild the corner matrices and corner normals.
    ///
    /// Every cell must have a positive impedance, otherwise the nodal systems
    /// lose their definiteness.
    pub fn evaluate_corner_coef(&mut self) -> Result<(), HydroError> {
        self.cells
            .par_iter()
            .enumerate()
            .try_for_each(|(cell_idx, cell)| {
                let impedance = cell.impedance();
                if impedance > 0. {
                    Ok(())
                } else {
                    Err(HydroError::NonPositiveImpedance { cell: cell_idx, impedance })
                }
            })?;

        let mesh = &self.mesh;
        let cells = &self.cells;
        self.corners
            .par_iter_mut()
            .enumerate()
            .for_each(|(corner, coefficients)| {
                *coefficients = CornerCoefficients::build(mesh, corner, &cells[mesh.corner_cell(corner)]);
            });
        Ok(())
    }

    /// Solve for the velocity of every vertex.
    pub fn evaluate_nodal_state(&mut self) -> Result<(), HydroError> {
        let solver = NodalSolver {
            mesh: &self.mesh,
            cells: &self.cells,
            corners: &self.corners,
            boundaries: &self.boundaries,
            time: self.time,
        };
        solver.solve(&mut self.vertex_velocities)
    }

    /// Accumulate the cell residuals from the corner forces.
    pub fn evaluate_forces(&mut self) {
        compute_residuals(
            &self.mesh,
            &self.cells,
            &self.corners,
            &self.vertex_velocities,
            &mut self.residuals,
        );
    }

    /// Compute the next time step from the current residuals and store it,
    /// together with the criterion that limited it.
    pub fn evaluate_time_step(&mut self) -> Result<(), HydroError> {
        let (time_step, limiter) = compute_time_step(
            &self.mesh,
            &self.cells,
            &self.residuals,
            &self.time_constants,
            self.time_step,
        )?;
        self.time_step = time_step;
        self.limiter = Some(limiter);
        Ok(())
    }

    /// Move the vertices over `coef` times the time step and update the geometry.
    pub fn move_mesh(&mut self, coef: f64) {
        let dt = coef * self.time_step;
        self.mesh
            .coordinates_mut()
            .par_iter_mut()
            .zip(self.vertex_velocities.par_iter())
            .for_each(|(x, &u)| *x += dt * u);
        self.mesh.update_geometry();
    }

    /// Integrate the cell state over `coef` times the time step.
    pub fn apply_update(&mut self, coef: f64) -> Result<(), HydroError> {
        apply_update(
            &self.mesh,
            &mut self.cells,
            &self.residuals,
            &self.gas_law,
            coef * self.time_step,
        )?;
        let totals = self.conservation_totals();
        self.diagnostics.conservation(self.time, totals);
        Ok(())
    }

    pub fn save_coordinates(&mut self) {
        self.checkpoint.save_coordinates(&self.mesh);
    }

    pub fn restore_coordinates(&mut self) -> Result<(), HydroError> {
        self.checkpoint.restore_coordinates(&mut self.mesh)
    }

    pub fn save_solution(&mut self) {
        self.checkpoint.save_solution(&self.cells);
    }

    pub fn restore_solution(&mut self) -> Result<(), HydroError> {
        self.checkpoint.restore_solution(&mut self.cells)
    }

    /// Advance the simulation time by the current time step.
    pub fn advance_time(&mut self) {
        self.time += self.time_step;
    }

    pub fn conservation_totals(&self) -> State<Conserved> {
        conservation_totals(&self.cells)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    pub fn vertex_velocities(&self) -> &[DVec3] {
        &self.vertex_velocities
    }

    pub fn corners(&self) -> &[CornerCoefficients] {
        &self.corners
    }

    pub fn residuals(&self) -> &[Residual] {
        &self.residuals
    }

    pub fn gas_law(&self) -> &GasLaw {
        &self.gas_law
    }

    pub fn boundaries(&self) -> &BoundaryMap {
        &self.boundaries
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn set_time_step(&mut self, time_step: f64) {
        self.time_step = time_step;
    }

    /// The criterion that limited the last computed time step.
    pub fn limiter(&self) -> Option<TimeStepLimiter> {
        self.limiter
    }

    pub fn self_check(&self) {
        for cell in self.cells.iter() {
            debug_assert!(cell.mass > 0.);
            debug_assert!(cell.volume > 0.);
            debug_assert!(cell.velocity.is_finite());
            debug_assert!(cell.internal_energy.is_finite());
            debug_assert!(cell.pressure >= 0.);
        }
        for velocity in self.vertex_velocities.iter() {
            debug_assert!(velocity.is_finite());
        }
    }
}
