use common::assert_approx_eq_dvec3;
use float_cmp::assert_approx_eq;
use glam::DVec3;
use lagrangian_hydro::{corner::CornerCoefficients, CellState, Mesh};

mod common;

fn corner_normals(mesh: &Mesh) -> Vec<DVec3> {
    let cell = CellState::default();
    (0..mesh.num_corners())
        .map(|corner| CornerCoefficients::build(mesh, corner, &cell).normal)
        .collect()
}

fn check_closure(mesh: &Mesh) {
    let normals = corner_normals(mesh);

    // Every cell is closed
    for cell in 0..mesh.num_cells() {
        let sum: DVec3 = mesh.cell_corners(cell).map(|corner| normals[corner]).sum();
        assert_approx_eq_dvec3(sum, DVec3::ZERO, 1e-14);
    }

    // Interior vertices have a closed ring of corners, boundary vertices
    // only see their boundary facets
    for vertex in 0..mesh.num_vertices() {
        let sum: DVec3 = mesh
            .vertex_corners(vertex)
            .iter()
            .map(|&corner| normals[corner])
            .sum();
        let boundary: DVec3 = mesh
            .vertex_boundary_wedges(vertex)
            .map(|wedge| mesh.wedge_facet_area(wedge) * mesh.wedge_facet_normal(wedge))
            .sum();
        if mesh.vertex_on_boundary(vertex) {
            assert!(boundary.length() > 0.);
        } else {
            assert_eq!(boundary, DVec3::ZERO);
        }
        assert_approx_eq_dvec3(sum, boundary, 1e-14);
    }
}

#[test]
fn test_closure_2d() {
    let mut mesh = Mesh::rectangle([7, 5], [1., 0.6]);
    mesh.perturb(0.25, 3);
    check_closure(&mesh);
    assert_approx_eq!(f64, mesh.total_volume(), 0.6, epsilon = 1e-14);
}

#[test]
fn test_closure_3d() {
    let mut mesh = Mesh::cuboid([4, 3, 2], [1., 0.75, 0.5]);
    mesh.perturb(0.15, 8);
    check_closure(&mesh);
    assert_approx_eq!(f64, mesh.total_volume(), 0.375, epsilon = 1e-14);
}

#[test]
fn test_general_polygons() {
    // A hexagon split into a triangle, a quadrilateral and a pentagon,
    // with mixed orientations
    let coordinates = vec![
        DVec3::new(0., 0., 0.),
        DVec3::new(2., 0., 0.),
        DVec3::new(3., 1., 0.),
        DVec3::new(2., 2., 0.),
        DVec3::new(0., 2., 0.),
        DVec3::new(-1., 1., 0.),
        DVec3::new(1., 1., 0.),
    ];
    let mesh = Mesh::polygons(
        coordinates,
        vec![
            vec![0, 1, 6],
            vec![6, 1, 2, 3],
            vec![0, 6, 3, 4, 5].into_iter().rev().collect(),
        ],
    );
    assert_eq!(mesh.num_cells(), 3);
    assert_eq!(mesh.num_faces(), 9);
    assert_approx_eq!(f64, mesh.cell_volume(0), 1.);
    assert_approx_eq!(f64, mesh.cell_volume(1), 2.);
    assert_approx_eq!(f64, mesh.cell_volume(2), 3.);
    assert_approx_eq!(f64, mesh.total_volume(), 6.);
    check_closure(&mesh);
}
