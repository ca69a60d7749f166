use glam::{DMat3, DVec3};
use rayon::prelude::*;

use crate::{
    boundary::{BoundaryMap, Tag},
    cell::CellState,
    corner::CornerCoefficients,
    errors::HydroError,
    linalg,
    mesh::Mesh,
};

/// Symmetry normals of a single vertex, merged per tag and kept in ascending tag order.
#[derive(Default, Debug)]
struct SymmetryNormals {
    tags: Vec<Tag>,
    normals: Vec<DVec3>,
}

impl SymmetryNormals {
    fn clear(&mut self) {
        self.tags.clear();
        self.normals.clear();
    }

    fn add(&mut self, tag: Tag, normal: DVec3) {
        match self.tags.binary_search(&tag) {
            Ok(idx) => self.normals[idx] += normal,
            Err(idx) => {
                self.tags.insert(idx, tag);
                self.normals.insert(idx, normal);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Read-only view of everything the nodal velocity solve depends on.
pub struct NodalSolver<'a> {
    pub mesh: &'a Mesh,
    pub cells: &'a [CellState],
    pub corners: &'a [CornerCoefficients],
    pub boundaries: &'a BoundaryMap,
    pub time: f64,
}

impl<'a> NodalSolver<'a> {
    /// Compute the velocity of every vertex.
    ///
    /// Vertices are independent, so they are solved in parallel.
    pub fn solve(&self, velocities: &mut [DVec3]) -> Result<(), HydroError> {
        velocities
            .par_iter_mut()
            .enumerate()
            .try_for_each_init(SymmetryNormals::default, |normals, (vertex, velocity)| {
                *velocity = self.solve_vertex(vertex, normals)?;
                Ok(())
            })
    }

    /// Assemble `M = sum M_c` and `rhs = sum (p_c n_c + M_c u_c)` over the corners of `vertex`.
    fn assemble(&self, vertex: usize) -> (DMat3, DVec3) {
        let mut matrix = DMat3::ZERO;
        let mut rhs = DVec3::ZERO;
        for &corner in self.mesh.vertex_corners(vertex) {
            let cell = &self.cells[self.mesh.corner_cell(corner)];
            let coefficients = &self.corners[corner];
            matrix += coefficients.matrix;
            rhs += cell.pressure * coefficients.normal + coefficients.matrix * cell.velocity;
        }
        (matrix, rhs)
    }

    fn solve_vertex(&self, vertex: usize, normals: &mut SymmetryNormals) -> Result<DVec3, HydroError> {
        let dimensionality = self.mesh.dimensionality();
        let (matrix, mut rhs) = self.assemble(vertex);

        let tags = self.mesh.vertex_tags(vertex);
        if tags.is_empty() {
            return linalg::solve(matrix, rhs, dimensionality)
                .ok_or(HydroError::SingularNodalSystem { vertex });
        }

        // A prescribed velocity overrides everything else
        let position = self.mesh.coordinates()[vertex];
        for &tag in tags {
            if let Some(velocity) = self.boundaries.get(tag)?.velocity(position, self.time) {
                return Ok(velocity);
            }
        }

        normals.clear();
        for wedge in self.mesh.vertex_boundary_wedges(vertex) {
            let normal = self.mesh.wedge_facet_normal(wedge);
            let area = self.mesh.wedge_facet_area(wedge);
            for &tag in self.mesh.face_tags(self.mesh.wedge_face(wedge)) {
                let condition = self.boundaries.get(tag)?;
                if let Some(pressure) =
                    condition.pressure(self.mesh.wedge_facet_centroid(wedge), self.time)
                {
                    rhs -= area * pressure * normal;
                } else if condition.has_symmetry() {
                    normals.add(tag, area * normal);
                }
            }
        }

        if normals.is_empty() {
            linalg::solve(matrix, rhs, dimensionality)
        } else {
            linalg::solve_constrained(matrix, rhs, &normals.normals, dimensionality)
        }
        .ok_or(HydroError::SingularNodalSystem { vertex })
    }
}

/// Initial guess of the vertex velocities: the average velocity of the incident cells.
pub fn estimate_nodal_state(mesh: &Mesh, cells: &[CellState], velocities: &mut [DVec3]) {
    velocities
        .par_iter_mut()
        .enumerate()
        .for_each(|(vertex, velocity)| {
            let corners = mesh.vertex_corners(vertex);
            *velocity = corners
                .iter()
                .map(|&corner| cells[mesh.corner_cell(corner)].velocity)
                .sum::<DVec3>()
                / corners.len().max(1) as f64;
        });
}
