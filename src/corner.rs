use glam::{DMat3, DVec3};

use crate::{cell::CellState, mesh::Mesh, utils::outer};

/// Per corner coefficients of the nodal solver.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct CornerCoefficients {
    /// `sum_w z l_w n_w (x) n_w` over the wedges of the corner.
    pub matrix: DMat3,
    /// `sum_w l_w n_w` over the wedges of the corner.
    pub normal: DVec3,
}

impl CornerCoefficients {
    /// Assemble the coefficients of `corner` from its wedges, weighted with the
    /// acoustic impedance of `cell`.
    pub fn build(mesh: &Mesh, corner: usize, cell: &CellState) -> Self {
        let impedance = cell.impedance();
        let mut coefficients = Self::default();
        for wedge in mesh.corner_wedges(corner) {
            let normal = mesh.wedge_facet_normal(wedge);
            let area = mesh.wedge_facet_area(wedge);
            coefficients.matrix += impedance * area * outer(normal, normal);
            coefficients.normal += area * normal;
        }
        coefficients
    }

    /// The sub-cell force exerted by a cell with pressure `pressure` and velocity
    /// `cell_velocity` on a vertex moving with `vertex_velocity`.
    pub fn force(&self, pressure: f64, cell_velocity: DVec3, vertex_velocity: DVec3) -> DVec3 {
        pressure * self.normal + self.matrix * (cell_velocity - vertex_velocity)
    }
}
