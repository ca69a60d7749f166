use glam::DVec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use yaml_rust::Yaml;

use super::Mesh;
use crate::{boundary::Tag, errors::ConfigError, utils::read_f64};

fn read_array<const N: usize>(cfg: &Yaml, key: &str) -> Result<Option<[f64; N]>, ConfigError> {
    let values = match &cfg[key] {
        Yaml::BadValue => return Ok(None),
        Yaml::Array(values) => values,
        value => return Err(ConfigError::InvalidArrayFormat(value.clone())),
    };
    if values.len() != N {
        return Err(ConfigError::InvalidArrayLength(N, values.len()));
    }
    let mut array = [0.; N];
    for (entry, value) in array.iter_mut().zip(values.iter()) {
        *entry = match value {
            Yaml::Real(s) => s
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidArrayFormat(cfg[key].clone()))?,
            Yaml::Integer(i) => *i as f64,
            _ => return Err(ConfigError::InvalidArrayFormat(cfg[key].clone())),
        };
    }
    Ok(Some(array))
}

fn read_num_cells<const N: usize>(cfg: &Yaml) -> Result<[usize; N], ConfigError> {
    let num_cells = read_array::<N>(cfg, "num_cells")?
        .ok_or(ConfigError::MissingParameter("mesh:num_cells".to_string()))?;
    let mut counts = [0; N];
    for (count, &value) in counts.iter_mut().zip(num_cells.iter()) {
        if !(value >= 1.) || value.fract() != 0. {
            return Err(ConfigError::InvalidValue(
                "mesh:num_cells".to_string(),
                value.to_string(),
            ));
        }
        *count = value as usize;
    }
    Ok(counts)
}

/// Tag of the axis-aligned wall with the given outward normal:
/// `1, 2` for `-x, +x`, `3, 4` for `-y, +y` and `5, 6` for `-z, +z`.
pub fn wall_tag(normal: DVec3) -> Option<Tag> {
    let axis = normal.abs().max_element();
    let tag = if normal.x.abs() == axis {
        if normal.x < 0. {
            1
        } else {
            2
        }
    } else if normal.y.abs() == axis {
        if normal.y < 0. {
            3
        } else {
            4
        }
    } else if normal.z < 0. {
        5
    } else {
        6
    };
    Some(tag)
}

impl Mesh {
    /// Build a lattice mesh from the `mesh` section of the configuration.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["kind"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("mesh:kind".to_string()))?;
        let mut mesh = match kind {
            "rectangle" => {
                let num_cells = read_num_cells::<2>(cfg)?;
                let size = read_array::<2>(cfg, "size")?.unwrap_or([1.; 2]);
                Self::rectangle(num_cells, size)
            }
            "box" => {
                let num_cells = read_num_cells::<3>(cfg)?;
                let size = read_array::<3>(cfg, "size")?.unwrap_or([1.; 3]);
                Self::cuboid(num_cells, size)
            }
            _ => return Err(ConfigError::UnknownMesh(kind.to_string())),
        };
        if let Some(amplitude) = read_f64(cfg, "mesh", "perturbation")? {
            let seed = cfg["seed"].as_i64().unwrap_or(0) as u64;
            mesh.perturb(amplitude, seed);
        }
        Ok(mesh)
    }

    /// Quadrilateral lattice covering `[0, size[0]] x [0, size[1]]`.
    ///
    /// Boundary faces are tagged with [`wall_tag`].
    pub fn rectangle(num_cells: [usize; 2], size: [f64; 2]) -> Self {
        let [nx, ny] = num_cells;
        let dx = size[0] / nx as f64;
        let dy = size[1] / ny as f64;
        let vertex = |i: usize, j: usize| j * (nx + 1) + i;

        let mut coordinates = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                coordinates.push(DVec3::new(i as f64 * dx, j as f64 * dy, 0.));
            }
        }

        let mut cells = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                cells.push(vec![
                    vertex(i, j),
                    vertex(i + 1, j),
                    vertex(i + 1, j + 1),
                    vertex(i, j + 1),
                ]);
            }
        }

        let mut mesh = Self::polygons(coordinates, cells);
        mesh.tag_boundary(|_, normal| wall_tag(normal));
        mesh
    }

    /// Hexahedral lattice covering `[0, size[0]] x [0, size[1]] x [0, size[2]]`.
    ///
    /// Boundary faces are tagged with [`wall_tag`].
    pub fn cuboid(num_cells: [usize; 3], size: [f64; 3]) -> Self {
        let [nx, ny, nz] = num_cells;
        let dx = size[0] / nx as f64;
        let dy = size[1] / ny as f64;
        let dz = size[2] / nz as f64;
        let vertex = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;

        let mut coordinates = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    coordinates.push(DVec3::new(
                        i as f64 * dx,
                        j as f64 * dy,
                        k as f64 * dz,
                    ));
                }
            }
        }

        let mut cells = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let v = |di: usize, dj: usize, dk: usize| vertex(i + di, j + dj, k + dk);
                    cells.push(vec![
                        vec![v(0, 0, 0), v(0, 0, 1), v(0, 1, 1), v(0, 1, 0)],
                        vec![v(1, 0, 0), v(1, 1, 0), v(1, 1, 1), v(1, 0, 1)],
                        vec![v(0, 0, 0), v(1, 0, 0), v(1, 0, 1), v(0, 0, 1)],
                        vec![v(0, 1, 0), v(0, 1, 1), v(1, 1, 1), v(1, 1, 0)],
                        vec![v(0, 0, 0), v(0, 1, 0), v(1, 1, 0), v(1, 0, 0)],
                        vec![v(0, 0, 1), v(1, 0, 1), v(1, 1, 1), v(0, 1, 1)],
                    ]);
                }
            }
        }

        let mut mesh = Self::polyhedra(coordinates, cells);
        mesh.tag_boundary(|_, normal| wall_tag(normal));
        mesh
    }

    /// Randomly displace all interior vertices by at most `amplitude` times the
    /// local minimal edge length in every direction.
    pub fn perturb(&mut self, amplitude: f64, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dimensionality = self.dimensionality;
        let mut scale = vec![f64::INFINITY; self.num_vertices()];
        for corner in self.corners.iter() {
            let length = self.cells[corner.cell].min_length;
            scale[corner.vertex] = scale[corner.vertex].min(length);
        }
        for (vertex, x) in self.coordinates.iter_mut().enumerate() {
            if self.vertex_on_boundary[vertex] || !scale[vertex].is_finite() {
                continue;
            }
            let mut displacement = DVec3::new(
                rng.gen_range(-1. ..1.),
                rng.gen_range(-1. ..1.),
                rng.gen_range(-1. ..1.),
            );
            if dimensionality == crate::Dimensionality::TwoD {
                displacement.z = 0.;
            }
            *x += amplitude * scale[vertex] * displacement;
        }
        self.update_geometry();
    }
}
