//! Unstructured polygonal (2D) and polyhedral (3D) mesh with the corner and wedge
//! sub-cell entities used by the Lagrangian scheme.
//!
//! A *corner* is the association of one cell with one of its vertices. A *wedge*
//! is the part of a corner that touches a single (cell face, face edge) pair:
//! - in 2D, the half of a cell edge between the vertex and the edge midpoint;
//! - in 3D, the triangle spanned by the vertex, the edge midpoint and the face center.
//!
//! Wedge facets carry an outward (with respect to their cell) unit normal and an
//! area, so that summing `area * normal` over the wedges of a cell gives zero, and
//! summing over the wedges around an interior vertex gives zero as well.

use std::{collections::HashMap, ops::Range};

use glam::DVec3;
use rayon::prelude::*;

use crate::{boundary::Tag, utils::min_pairwise_distance, Dimensionality};

mod lattice;

pub use lattice::wall_tag;

#[derive(Debug, Clone)]
struct MeshCell {
    vertices: Vec<usize>,
    /// The faces of this cell, with their vertex loop oriented outward from this cell.
    faces: Vec<(usize, Vec<usize>)>,
    corners: Range<usize>,
    volume: f64,
    centroid: DVec3,
    min_length: f64,
}

#[derive(Debug, Clone)]
pub struct Face {
    vertices: Vec<usize>,
    left: usize,
    right: Option<usize>,
    tags: Vec<Tag>,
    area: f64,
    normal: DVec3,
    centroid: DVec3,
}

impl Face {
    fn new(vertices: Vec<usize>, left: usize) -> Self {
        Self {
            vertices,
            left,
            right: None,
            tags: vec![],
            area: 0.,
            normal: DVec3::ZERO,
            centroid: DVec3::ZERO,
        }
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// The cell w.r.t. which the normal of this face points outward.
    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> Option<usize> {
        self.right
    }

    pub fn is_boundary(&self) -> bool {
        self.right.is_none()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }
}

#[derive(Debug, Clone)]
struct Corner {
    cell: usize,
    vertex: usize,
    wedges: Range<usize>,
}

#[derive(Debug, Clone)]
struct Wedge {
    vertex: usize,
    face: usize,
    /// Edge of the face, oriented along the outward loop of the face as seen from
    /// the cell of this wedge. `vertex` is one of its endpoints.
    edge: (usize, usize),
    facet_normal: DVec3,
    facet_area: f64,
    facet_centroid: DVec3,
}

pub struct Mesh {
    dimensionality: Dimensionality,
    coordinates: Vec<DVec3>,
    cells: Vec<MeshCell>,
    faces: Vec<Face>,
    corners: Vec<Corner>,
    wedges: Vec<Wedge>,
    vertex_corners: Vec<Vec<usize>>,
    vertex_tags: Vec<Vec<Tag>>,
    vertex_on_boundary: Vec<bool>,
}

impl Mesh {
    /// Build a 2D mesh from polygons given as vertex loops.
    ///
    /// Clockwise loops are reversed, so that every cell is counter-clockwise.
    pub fn polygons(coordinates: Vec<DVec3>, cells: Vec<Vec<usize>>) -> Self {
        let mut face_map: HashMap<(usize, usize), usize> = HashMap::new();
        let mut faces: Vec<Face> = vec![];
        let mesh_cells = cells
            .into_iter()
            .enumerate()
            .map(|(cell_idx, mut vertices)| {
                if polygon_signed_area(&coordinates, &vertices) < 0. {
                    vertices.reverse();
                }
                let count = vertices.len();
                let cell_faces = (0..count)
                    .map(|i| {
                        let a = vertices[i];
                        let b = vertices[(i + 1) % count];
                        let face_idx = register_face(
                            &mut face_map,
                            &mut faces,
                            (a.min(b), a.max(b)),
                            vec![a, b],
                            cell_idx,
                        );
                        (face_idx, vec![a, b])
                    })
                    .collect();
                MeshCell::new(vertices, cell_faces)
            })
            .collect();

        Self::from_parts(Dimensionality::TwoD, coordinates, mesh_cells, faces)
    }

    /// Build a 3D mesh from polyhedra given as lists of face loops.
    ///
    /// Every face loop must be counter-clockwise when seen from outside its cell.
    pub fn polyhedra(coordinates: Vec<DVec3>, cells: Vec<Vec<Vec<usize>>>) -> Self {
        let mut face_map: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut faces: Vec<Face> = vec![];
        let mesh_cells = cells
            .into_iter()
            .enumerate()
            .map(|(cell_idx, cell_faces)| {
                let mut vertices = vec![];
                let cell_faces = cell_faces
                    .into_iter()
                    .map(|face_loop| {
                        for &v in face_loop.iter() {
                            if !vertices.contains(&v) {
                                vertices.push(v);
                            }
                        }
                        let mut key = face_loop.clone();
                        key.sort_unstable();
                        let face_idx = register_face(
                            &mut face_map,
                            &mut faces,
                            key,
                            face_loop.clone(),
                            cell_idx,
                        );
                        (face_idx, face_loop)
                    })
                    .collect();
                MeshCell::new(vertices, cell_faces)
            })
            .collect();

        Self::from_parts(Dimensionality::ThreeD, coordinates, mesh_cells, faces)
    }

    fn from_parts(
        dimensionality: Dimensionality,
        coordinates: Vec<DVec3>,
        mut cells: Vec<MeshCell>,
        faces: Vec<Face>,
    ) -> Self {
        let num_vertices = coordinates.len();
        let mut corners = vec![];
        let mut wedges = vec![];
        let mut vertex_corners = vec![vec![]; num_vertices];

        for (cell_idx, cell) in cells.iter_mut().enumerate() {
            let corner_start = corners.len();
            for &vertex in cell.vertices.iter() {
                let wedge_start = wedges.len();
                for (face_idx, face_loop) in cell.faces.iter() {
                    for edge in loop_edges(face_loop, dimensionality) {
                        if edge.0 == vertex || edge.1 == vertex {
                            wedges.push(Wedge::new(vertex, *face_idx, edge));
                        }
                    }
                }
                vertex_corners[vertex].push(corners.len());
                corners.push(Corner {
                    cell: cell_idx,
                    vertex,
                    wedges: wedge_start..wedges.len(),
                });
            }
            cell.corners = corner_start..corners.len();
        }

        let mut vertex_on_boundary = vec![false; num_vertices];
        for face in faces.iter().filter(|face| face.is_boundary()) {
            for &v in face.vertices.iter() {
                vertex_on_boundary[v] = true;
            }
        }

        let mut mesh = Self {
            dimensionality,
            coordinates,
            cells,
            faces,
            corners,
            wedges,
            vertex_corners,
            vertex_tags: vec![vec![]; num_vertices],
            vertex_on_boundary,
        };
        mesh.update_geometry();
        mesh
    }

    /// Recompute all derived geometric quantities from the current vertex coordinates.
    ///
    /// Must be called after every change of the coordinates.
    pub fn update_geometry(&mut self) {
        let Self {
            dimensionality,
            coordinates,
            cells,
            faces,
            wedges,
            ..
        } = self;
        let dimensionality = *dimensionality;
        let coordinates = &coordinates[..];

        cells.par_iter_mut().for_each(|cell| {
            let (volume, centroid) = match dimensionality {
                Dimensionality::TwoD => polygon_volume_centroid(coordinates, &cell.vertices),
                Dimensionality::ThreeD => polyhedron_volume_centroid(coordinates, &cell.faces),
            };
            cell.volume = volume;
            cell.centroid = centroid;
            cell.min_length = min_pairwise_distance(cell.vertices.iter().map(|&v| coordinates[v]));
        });

        faces.par_iter_mut().for_each(|face| {
            let area_vector = loop_area_vector(coordinates, &face.vertices, dimensionality);
            face.area = area_vector.length();
            face.normal = area_vector / face.area;
            face.centroid = loop_center(coordinates, &face.vertices);
        });

        let faces = &faces[..];
        wedges.par_iter_mut().for_each(|wedge| {
            let face = &faces[wedge.face];
            wedge.update_geometry(coordinates, face, dimensionality);
        });
    }

    /// Tag the boundary faces for which `tagger(centroid, normal)` returns a tag.
    pub fn tag_boundary<F>(&mut self, tagger: F)
    where
        F: Fn(DVec3, DVec3) -> Option<Tag>,
    {
        for face in self.faces.iter_mut().filter(|face| face.is_boundary()) {
            if let Some(tag) = tagger(face.centroid, face.normal) {
                if !face.tags.contains(&tag) {
                    face.tags.push(tag);
                }
            }
        }
        self.rebuild_vertex_tags();
    }

    /// Add a tag to a single face.
    pub fn add_face_tag(&mut self, face: usize, tag: Tag) {
        if !self.faces[face].tags.contains(&tag) {
            self.faces[face].tags.push(tag);
        }
        self.rebuild_vertex_tags();
    }

    fn rebuild_vertex_tags(&mut self) {
        for tags in self.vertex_tags.iter_mut() {
            tags.clear();
        }
        for face in self.faces.iter().filter(|face| face.is_boundary()) {
            for &v in face.vertices.iter() {
                self.vertex_tags[v].extend(face.tags.iter().copied());
            }
        }
        for tags in self.vertex_tags.iter_mut() {
            tags.sort_unstable();
            tags.dedup();
        }
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn num_vertices(&self) -> usize {
        self.coordinates.len()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    pub fn num_wedges(&self) -> usize {
        self.wedges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn coordinates(&self) -> &[DVec3] {
        &self.coordinates
    }

    /// Mutable access to the vertex coordinates.
    ///
    /// Call [`Mesh::update_geometry`] after modifying them.
    pub fn coordinates_mut(&mut self) -> &mut [DVec3] {
        &mut self.coordinates
    }

    pub fn cell_vertices(&self, cell: usize) -> &[usize] {
        &self.cells[cell].vertices
    }

    pub fn cell_corners(&self, cell: usize) -> Range<usize> {
        self.cells[cell].corners.clone()
    }

    pub fn cell_volume(&self, cell: usize) -> f64 {
        self.cells[cell].volume
    }

    pub fn cell_centroid(&self, cell: usize) -> DVec3 {
        self.cells[cell].centroid
    }

    pub fn cell_min_length(&self, cell: usize) -> f64 {
        self.cells[cell].min_length
    }

    pub fn vertex_corners(&self, vertex: usize) -> &[usize] {
        &self.vertex_corners[vertex]
    }

    /// The cells sharing the given vertex.
    pub fn vertex_cells(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_corners[vertex]
            .iter()
            .map(|&corner| self.corners[corner].cell)
    }

    pub fn vertex_tags(&self, vertex: usize) -> &[Tag] {
        &self.vertex_tags[vertex]
    }

    pub fn vertex_on_boundary(&self, vertex: usize) -> bool {
        self.vertex_on_boundary[vertex]
    }

    /// The wedges of the given vertex that lie on a boundary face.
    pub fn vertex_boundary_wedges(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_corners[vertex]
            .iter()
            .flat_map(|&corner| self.corners[corner].wedges.clone())
            .filter(|&wedge| self.faces[self.wedges[wedge].face].is_boundary())
    }

    pub fn corner_cell(&self, corner: usize) -> usize {
        self.corners[corner].cell
    }

    pub fn corner_vertex(&self, corner: usize) -> usize {
        self.corners[corner].vertex
    }

    pub fn corner_wedges(&self, corner: usize) -> Range<usize> {
        self.corners[corner].wedges.clone()
    }

    pub fn wedge_vertex(&self, wedge: usize) -> usize {
        self.wedges[wedge].vertex
    }

    pub fn wedge_face(&self, wedge: usize) -> usize {
        self.wedges[wedge].face
    }

    pub fn face_tags(&self, face: usize) -> &[Tag] {
        &self.faces[face].tags
    }

    pub fn face_is_boundary(&self, face: usize) -> bool {
        self.faces[face].is_boundary()
    }

    pub fn wedge_facet_normal(&self, wedge: usize) -> DVec3 {
        self.wedges[wedge].facet_normal
    }

    pub fn wedge_facet_area(&self, wedge: usize) -> f64 {
        self.wedges[wedge].facet_area
    }

    pub fn wedge_facet_centroid(&self, wedge: usize) -> DVec3 {
        self.wedges[wedge].facet_centroid
    }

    /// Total volume of all cells.
    pub fn total_volume(&self) -> f64 {
        self.cells.par_iter().map(|cell| cell.volume).sum()
    }
}

impl MeshCell {
    fn new(vertices: Vec<usize>, faces: Vec<(usize, Vec<usize>)>) -> Self {
        Self {
            vertices,
            faces,
            corners: 0..0,
            volume: 0.,
            centroid: DVec3::ZERO,
            min_length: 0.,
        }
    }
}

impl Wedge {
    fn new(vertex: usize, face: usize, edge: (usize, usize)) -> Self {
        Self {
            vertex,
            face,
            edge,
            facet_normal: DVec3::ZERO,
            facet_area: 0.,
            facet_centroid: DVec3::ZERO,
        }
    }

    fn update_geometry(
        &mut self,
        coordinates: &[DVec3],
        face: &Face,
        dimensionality: Dimensionality,
    ) {
        let a = coordinates[self.edge.0];
        let b = coordinates[self.edge.1];
        let midpoint = 0.5 * (a + b);
        let at_start = self.vertex == self.edge.0;
        let area_vector = match dimensionality {
            Dimensionality::TwoD => {
                let t = b - a;
                let normal = DVec3::new(t.y, -t.x, 0.);
                self.facet_centroid = if at_start {
                    0.5 * (a + midpoint)
                } else {
                    0.5 * (midpoint + b)
                };
                0.5 * normal
            }
            Dimensionality::ThreeD => {
                let center = loop_center(coordinates, &face.vertices);
                let (p, q, r) = if at_start {
                    (a, midpoint, center)
                } else {
                    (b, center, midpoint)
                };
                self.facet_centroid = (p + q + r) / 3.;
                0.5 * (q - p).cross(r - p)
            }
        };
        self.facet_area = area_vector.length();
        self.facet_normal = area_vector / self.facet_area;
    }
}

fn register_face<K: std::hash::Hash + Eq>(
    face_map: &mut HashMap<K, usize>,
    faces: &mut Vec<Face>,
    key: K,
    vertices: Vec<usize>,
    cell: usize,
) -> usize {
    match face_map.get(&key) {
        Some(&face_idx) => {
            let face = &mut faces[face_idx];
            assert!(
                face.right.is_none(),
                "Face {:?} is shared by more than two cells!",
                face.vertices
            );
            face.right = Some(cell);
            face_idx
        }
        None => {
            let face_idx = faces.len();
            faces.push(Face::new(vertices, cell));
            face_map.insert(key, face_idx);
            face_idx
        }
    }
}

/// The edges of a face loop. In 2D a face is a single edge.
fn loop_edges(face_loop: &[usize], dimensionality: Dimensionality) -> Vec<(usize, usize)> {
    match dimensionality {
        Dimensionality::TwoD => vec![(face_loop[0], face_loop[1])],
        Dimensionality::ThreeD => {
            let count = face_loop.len();
            (0..count)
                .map(|i| (face_loop[i], face_loop[(i + 1) % count]))
                .collect()
        }
    }
}

fn loop_center(coordinates: &[DVec3], vertices: &[usize]) -> DVec3 {
    vertices.iter().map(|&v| coordinates[v]).sum::<DVec3>() / vertices.len() as f64
}

/// Area weighted normal of an oriented face loop.
fn loop_area_vector(
    coordinates: &[DVec3],
    vertices: &[usize],
    dimensionality: Dimensionality,
) -> DVec3 {
    match dimensionality {
        Dimensionality::TwoD => {
            let t = coordinates[vertices[1]] - coordinates[vertices[0]];
            DVec3::new(t.y, -t.x, 0.)
        }
        Dimensionality::ThreeD => {
            let center = loop_center(coordinates, vertices);
            let count = vertices.len();
            (0..count)
                .map(|i| {
                    let a = coordinates[vertices[i]] - center;
                    let b = coordinates[vertices[(i + 1) % count]] - center;
                    0.5 * a.cross(b)
                })
                .sum()
        }
    }
}

fn polygon_signed_area(coordinates: &[DVec3], vertices: &[usize]) -> f64 {
    let count = vertices.len();
    0.5 * (0..count)
        .map(|i| {
            let a = coordinates[vertices[i]];
            let b = coordinates[vertices[(i + 1) % count]];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
}

fn polygon_volume_centroid(coordinates: &[DVec3], vertices: &[usize]) -> (f64, DVec3) {
    let count = vertices.len();
    let mut area = 0.;
    let mut centroid = DVec3::ZERO;
    for i in 0..count {
        let a = coordinates[vertices[i]];
        let b = coordinates[vertices[(i + 1) % count]];
        let cross = a.x * b.y - b.x * a.y;
        area += cross;
        centroid += cross * (a + b);
    }
    area *= 0.5;
    (area, centroid / (6. * area))
}

/// Volume and centroid from a decomposition in tetrahedra
/// (vertex average, face center, edge).
fn polyhedron_volume_centroid(
    coordinates: &[DVec3],
    faces: &[(usize, Vec<usize>)],
) -> (f64, DVec3) {
    let mut vertex_sum = DVec3::ZERO;
    let mut vertex_count = 0;
    for (_, face_loop) in faces.iter() {
        for &v in face_loop.iter() {
            vertex_sum += coordinates[v];
            vertex_count += 1;
        }
    }
    let origin = vertex_sum / vertex_count as f64;

    let mut volume = 0.;
    let mut centroid = DVec3::ZERO;
    for (_, face_loop) in faces.iter() {
        let center = loop_center(coordinates, face_loop);
        let count = face_loop.len();
        for i in 0..count {
            let a = coordinates[face_loop[i]];
            let b = coordinates[face_loop[(i + 1) % count]];
            let tet_volume = (a - center).cross(b - center).dot(center - origin) / 6.;
            volume += tet_volume;
            centroid += tet_volume * 0.25 * (origin + center + a + b);
        }
    }
    (volume, centroid / volume)
}
