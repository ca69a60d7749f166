use rayon::prelude::*;

use crate::{
    cell::CellState,
    errors::HydroError,
    gas_law::GasLaw,
    mesh::Mesh,
    physical_quantities::{Conserved, Residual, State},
};

/// Receiver of the global conservation sums computed after every state update.
pub trait Diagnostics: Send {
    fn conservation(&mut self, time: f64, totals: State<Conserved>);
}

/// Reports the conservation sums through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn conservation(&mut self, time: f64, totals: State<Conserved>) {
        log::debug!(
            "t = {time:.6e}: mass = {:.12e}, momentum = {:?}, energy = {:.12e}",
            totals.mass(),
            totals.momentum(),
            totals.energy()
        );
    }
}

/// Advance the state of every cell by `fact` times its residual.
///
/// The cell volumes are taken from the (already moved) mesh, and the
/// thermodynamic state is refreshed from the new density and internal energy.
///
/// All cells are validated before any of them is written: on error, `cells`
/// is left as it was.
pub fn apply_update(
    mesh: &Mesh,
    cells: &mut [CellState],
    residuals: &[Residual],
    gas_law: &GasLaw,
    fact: f64,
) -> Result<(), HydroError> {
    let updates = cells
        .par_iter()
        .zip(residuals.par_iter())
        .enumerate()
        .map(|(cell_idx, (cell, residual))| {
            let fact_m = fact / cell.mass;
            let total_energy = cell.total_energy() + fact_m * residual.energy();
            let velocity = cell.velocity + fact_m * residual.momentum();
            let internal_energy = total_energy - 0.5 * velocity.length_squared();
            if !(internal_energy >= 0.) {
                return Err(HydroError::NegativeInternalEnergy {
                    cell: cell_idx,
                    internal_energy,
                });
            }
            let volume = mesh.cell_volume(cell_idx);
            if !(volume > 0.) {
                return Err(HydroError::DegenerateCell { cell: cell_idx, volume });
            }
            Ok((velocity, internal_energy, volume))
        })
        .collect::<Result<Vec<_>, _>>()?;

    cells
        .par_iter_mut()
        .zip(updates.into_par_iter())
        .for_each(|(cell, (velocity, internal_energy, volume))| {
            cell.velocity = velocity;
            cell.internal_energy = internal_energy;
            cell.volume = volume;
            cell.density = cell.mass / volume;
            cell.update_state_from_energy(gas_law);
        });
    Ok(())
}

/// Total mass, momentum and energy of all cells.
pub fn conservation_totals(cells: &[CellState]) -> State<Conserved> {
    cells
        .par_iter()
        .map(|cell| cell.conserved())
        .reduce(State::<Conserved>::vacuum, |a, b| a + b)
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use glam::DVec3;

    use super::*;
    use crate::physical_quantities::Primitives;

    #[test]
    fn test_apply_update() {
        let mesh = Mesh::rectangle([1, 1], [2., 1.]);
        let gas_law = GasLaw::ideal(1.4);
        let mut cells = vec![CellState::from_primitives(
            Primitives::new(1., DVec3::ZERO, 0.4),
            2.,
            &gas_law,
        )];
        assert_approx_eq!(f64, cells[0].internal_energy, 1., epsilon = 1e-12);
        let residuals = vec![Residual::new(0., DVec3::new(2., 0., 0.), 4.)];
        apply_update(&mesh, &mut cells, &residuals, &gas_law, 0.5).unwrap();
        let cell = &cells[0];
        // mass 2: velocity 0.5, total energy 1 + 1 = 2, internal 2 - 0.125
        assert_approx_eq!(f64, cell.velocity.x, 0.5);
        assert_approx_eq!(f64, cell.internal_energy, 1.875, epsilon = 1e-12);
        assert_approx_eq!(f64, cell.mass, 2.);
        assert_approx_eq!(f64, cell.density, 1.);
        assert_approx_eq!(f64, cell.pressure, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_internal_energy() {
        let mesh = Mesh::rectangle([1, 1], [1., 1.]);
        let gas_law = GasLaw::ideal(1.4);
        let mut cells = vec![CellState::from_primitives(
            Primitives::new(1., DVec3::ZERO, 0.4),
            1.,
            &gas_law,
        )];
        let residuals = vec![Residual::new(0., DVec3::ZERO, -2.)];
        match apply_update(&mesh, &mut cells, &residuals, &gas_law, 1.) {
            Err(HydroError::NegativeInternalEnergy {
                cell,
                internal_energy,
            }) => {
                assert_eq!(cell, 0);
                assert_approx_eq!(f64, internal_energy, -1., epsilon = 1e-12);
            }
            other => panic!("Expected negative internal energy, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_update_leaves_cells_untouched() {
        let mesh = Mesh::rectangle([2, 1], [2., 1.]);
        let gas_law = GasLaw::ideal(1.4);
        let mut cells = vec![
            CellState::from_primitives(Primitives::new(1., DVec3::ZERO, 0.4), 1., &gas_law),
            CellState::from_primitives(Primitives::new(1., DVec3::ZERO, 0.4), 1., &gas_law),
        ];
        let before = cells.clone();
        // Only the second cell runs out of energy
        let residuals = vec![
            Residual::new(0., DVec3::new(1., 0., 0.), 0.5),
            Residual::new(0., DVec3::ZERO, -2.),
        ];
        assert!(matches!(
            apply_update(&mesh, &mut cells, &residuals, &gas_law, 1.),
            Err(HydroError::NegativeInternalEnergy { cell: 1, .. })
        ));
        assert_eq!(cells, before);
    }

    #[test]
    fn test_inverted_cell() {
        let mut mesh = Mesh::rectangle([2, 1], [2., 1.]);
        let gas_law = GasLaw::ideal(1.4);
        let mut cells: Vec<_> = (0..2)
            .map(|_| CellState::from_primitives(Primitives::new(1., DVec3::ZERO, 0.4), 1., &gas_law))
            .collect();
        let before = cells.clone();

        // Push the middle edge past the right wall
        mesh.coordinates_mut()[1].x = 2.5;
        mesh.coordinates_mut()[4].x = 2.5;
        mesh.update_geometry();
        assert_approx_eq!(f64, mesh.cell_volume(1), -0.5, epsilon = 1e-14);

        let residuals = vec![Residual::vacuum(), Residual::vacuum()];
        match apply_update(&mesh, &mut cells, &residuals, &gas_law, 1.) {
            Err(HydroError::DegenerateCell { cell, volume }) => {
                assert_eq!(cell, 1);
                assert_approx_eq!(f64, volume, -0.5, epsilon = 1e-14);
            }
            other => panic!("Expected degenerate cell, got {other:?}"),
        }
        assert_eq!(cells, before);
    }

    #[test]
    fn test_conservation_totals() {
        let gas_law = GasLaw::ideal(1.4);
        let cells = vec![
            CellState::from_primitives(Primitives::new(1., DVec3::X, 0.4), 1., &gas_law),
            CellState::from_primitives(Primitives::new(2., -DVec3::X, 0.4), 1., &gas_law),
        ];
        let totals = conservation_totals(&cells);
        assert_approx_eq!(f64, totals.mass(), 3.);
        assert_approx_eq!(f64, totals.momentum().x, -1.);
        assert_approx_eq!(f64, totals.energy(), 1. + 0.5 + 1. + 1., epsilon = 1e-12);
    }
}
