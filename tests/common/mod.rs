#![allow(dead_code)]

use float_cmp::approx_eq;
use glam::DVec3;
use lagrangian_hydro::{
    gas_law::GasLaw, physical_quantities::Primitives, BoundaryCondition, BoundaryMap, Engine,
    Mesh, Space, TimeConstants,
};
use yaml_rust::{Yaml, YamlLoader};

pub const CONFIG: &'static str = r###"
hydrodynamics:
  equation_of_state: "Ideal"
  gamma: 1.4

time_integration:
  cfl:
    acoustic: 0.5
    volume: 0.1
    growth: 1.01
  initial_time_step: 1e-4
  t_end: 0.01
  max_steps: 20
  runner: "PredictorCorrector"

engine:
  dt_status: 0.001

mesh:
  kind: "rectangle"
  num_cells: [8, 4]
  size: [1., 0.5]

boundaries:
  - { tag: 1, kind: "symmetry" }
  - { tag: 2, kind: "symmetry" }
  - { tag: 3, kind: "symmetry" }
  - { tag: 4, kind: "symmetry" }

initial_conditions:
  kind: "sodshock"
"###;

pub const HYDRO_CONFIG: &'static str = r##"
equation_of_state: "Ideal"
gamma: 1.4
"##;

pub const TIME_INTEGRATION_CONFIG: &'static str = r##"
cfl:
  acoustic: 0.5
  volume: 0.1
  growth: 1.01
initial_time_step: 1e-4
t_end: 0.01
max_steps: 5
runner: "ForwardEuler"
"##;

pub const ENGINE_CONFIG: &'static str = r##"
dt_status: 0.001
"##;

pub const BOX_CONFIG: &'static str = r##"
kind: "box"
num_cells: [4, 4, 4]
size: [1., 1., 1.]
"##;

pub fn load(cfg: &str) -> Yaml {
    YamlLoader::load_from_str(cfg).expect("Error loading cfg!")[0].clone()
}

pub fn get_gas_law(cfg: &str) -> GasLaw {
    GasLaw::init(&load(cfg)).expect("Error creating GasLaw!")
}

pub fn get_time_constants(cfg: &str) -> TimeConstants {
    TimeConstants::init(&load(cfg)["cfl"]).expect("Error reading time constants!")
}

pub fn get_engine(time_integration_cfg: &str, engine_cfg: &str) -> Engine {
    Engine::init(&load(time_integration_cfg), &load(engine_cfg))
        .expect("Error initializing engine!")
}

pub fn get_mesh(cfg: &str) -> Mesh {
    Mesh::init(&load(cfg)).expect("Error creating mesh!")
}

/// All walls of a lattice mesh act as symmetry planes.
pub fn symmetry_walls(dimension: u32) -> BoundaryMap {
    let mut boundaries = BoundaryMap::new();
    for tag in 1..=2 * dimension {
        boundaries.insert(tag, BoundaryCondition::Symmetry);
    }
    boundaries
}

/// Build a space from `mesh` and set its state from `ics`.
pub fn get_space<F>(mesh: Mesh, boundaries: BoundaryMap, ics: F) -> Space
where
    F: Fn(DVec3) -> Primitives + Sync,
{
    let mut space = Space::new(
        mesh,
        get_gas_law(HYDRO_CONFIG),
        boundaries,
        get_time_constants(TIME_INTEGRATION_CONFIG),
    );
    space.initial_conditions(|x, _| ics(x));
    space.set_time_step(1e-4);
    space.estimate_nodal_state();
    space
}

/// Pressure pulse of radius `0.25` around `center`.
pub fn pulse(x: DVec3, center: DVec3, velocity: DVec3) -> Primitives {
    let pressure = if x.distance(center) < 0.25 { 10. } else { 1. };
    Primitives::new(1., velocity, pressure)
}

pub fn assert_approx_eq_dvec3(a: DVec3, b: DVec3, epsilon: f64) {
    assert!(
        approx_eq!(f64, a.x, b.x, epsilon = epsilon)
            && approx_eq!(f64, a.y, b.y, epsilon = epsilon)
            && approx_eq!(f64, a.z, b.z, epsilon = epsilon),
        "{a} != {b}"
    );
}
