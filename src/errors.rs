use yaml_rust::Yaml;

use crate::boundary::Tag;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required parameter in configuration: {0}")]
    MissingParameter(String),
    #[error("Unknown type of runner configured: {0}")]
    UnknownRunner(String),
    #[error("Unknown type of initial conditions configured: {0}")]
    UnknownICs(String),
    #[error("Unknown type of boundary condition configured: {0}")]
    UnknownBoundaryCondition(String),
    #[error("Unknown type of equation of state configured: {0}")]
    UnknownEOS(String),
    #[error("Unknown type of mesh configured: {0}")]
    UnknownMesh(String),
    #[error("Boundary tag {0} configured more than once")]
    DuplicateBoundaryTag(Tag),
    #[error("Expected array but found: {0:?}")]
    InvalidArrayFormat(Yaml),
    #[error("Expected array of length {0}, but found {1}")]
    InvalidArrayLength(usize, usize),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Failures that abort a hydro step.
///
/// None of these are recoverable locally: the driver must either roll back to a
/// checkpoint or stop. A failed update leaves the cell states untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HydroError {
    #[error("Singular nodal system at vertex {vertex}")]
    SingularNodalSystem { vertex: usize },
    #[error("No boundary condition registered for tag {tag}")]
    UnmappedBoundaryTag { tag: Tag },
    #[error("Infinite time step: acoustic reduction {dt_acc_inv}, volume reduction {dt_vol_inv}")]
    DegenerateTimeStep { dt_acc_inv: f64, dt_vol_inv: f64 },
    #[error("Could not determine time step limit (candidate {0})")]
    UnclassifiedLimiter(usize),
    #[error("Non-positive impedance {impedance} in cell {cell}")]
    NonPositiveImpedance { cell: usize, impedance: f64 },
    #[error("Degenerate cell {cell} with volume {volume}")]
    DegenerateCell { cell: usize, volume: f64 },
    #[error("Negative internal energy {internal_energy} in cell {cell}")]
    NegativeInternalEnergy { cell: usize, internal_energy: f64 },
    #[error("Restore requested without a saved {0}")]
    MissingCheckpoint(&'static str),
}
