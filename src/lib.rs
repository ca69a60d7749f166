//! Cell-centered Lagrangian hydrodynamics on unstructured polygonal and polyhedral meshes.
//!
//! The vertices of the mesh move with the fluid. Every step, the velocity of each
//! vertex is found from a small linear system assembled from the impedance weighted
//! corner normals of the surrounding cells, with boundary conditions enforced through
//! prescribed velocities, external pressures or (Lagrange multiplier) symmetry
//! constraints. The resulting sub-cell forces update the cell state conservatively.

pub use boundary::{BoundaryCondition, BoundaryMap, Prescribed, Tag};
pub use cell::CellState;
pub use engine::Engine;
pub use errors::{ConfigError, HydroError};
pub use initial_conditions::{ics_from_config, ics_from_preset, InitialConditionsFn};
pub use mesh::{wall_tag, Mesh};
pub use runner::{ForwardEuler, PredictorCorrector, Runner};
pub use space::Space;
pub use time_step::{TimeConstants, TimeStepLimiter};
pub use update::{Diagnostics, LogDiagnostics};
pub use utils::Dimensionality;

pub mod boundary;
mod cell;
mod checkpoint;
pub mod corner;
mod engine;
mod errors;
pub mod forces;
pub mod gas_law;
mod initial_conditions;
pub mod linalg;
pub mod mesh;
pub mod nodal;
pub mod physical_quantities;
mod runner;
mod space;
pub mod time_step;
pub mod update;
mod utils;
