use std::{collections::BTreeMap, fmt, sync::Arc};

use glam::DVec3;
use yaml_rust::Yaml;

use crate::{
    errors::{ConfigError, HydroError},
    utils::read_f64,
};

/// Integer label attached to boundary faces (and through them, to vertices).
pub type Tag = u32;

/// A value prescribed on a boundary, either constant or a function of position and time.
#[derive(Clone)]
pub enum Prescribed<T> {
    Constant(T),
    Function(Arc<dyn Fn(DVec3, f64) -> T + Send + Sync>),
}

impl<T: Copy> Prescribed<T> {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(DVec3, f64) -> T + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    pub fn evaluate(&self, position: DVec3, time: f64) -> T {
        match self {
            Prescribed::Constant(value) => *value,
            Prescribed::Function(f) => f(position, time),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Prescribed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prescribed::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Prescribed::Function(_) => f.write_str("Function"),
        }
    }
}

/// The condition applied on faces (and vertices) carrying a given tag.
#[derive(Debug, Clone)]
pub enum BoundaryCondition {
    /// Zero normal velocity through the boundary.
    Symmetry,
    /// The vertex velocity is imposed.
    Velocity(Prescribed<DVec3>),
    /// An external pressure acts on the boundary facets.
    Pressure(Prescribed<f64>),
}

impl BoundaryCondition {
    pub fn has_symmetry(&self) -> bool {
        matches!(self, BoundaryCondition::Symmetry)
    }

    pub fn has_prescribed_velocity(&self) -> bool {
        matches!(self, BoundaryCondition::Velocity(_))
    }

    pub fn has_prescribed_pressure(&self) -> bool {
        matches!(self, BoundaryCondition::Pressure(_))
    }

    /// The prescribed velocity at `position` and `time`, if any.
    pub fn velocity(&self, position: DVec3, time: f64) -> Option<DVec3> {
        match self {
            BoundaryCondition::Velocity(velocity) => Some(velocity.evaluate(position, time)),
            _ => None,
        }
    }

    /// The prescribed external pressure at `position` and `time`, if any.
    pub fn pressure(&self, position: DVec3, time: f64) -> Option<f64> {
        match self {
            BoundaryCondition::Pressure(pressure) => Some(pressure.evaluate(position, time)),
            _ => None,
        }
    }

    fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["kind"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("boundaries:kind".to_string()))?;
        match kind {
            "symmetry" => Ok(BoundaryCondition::Symmetry),
            "velocity" => {
                let velocity = match &cfg["velocity"] {
                    Yaml::BadValue => DVec3::ZERO,
                    value => parse_vector(value)?,
                };
                Ok(BoundaryCondition::Velocity(Prescribed::Constant(velocity)))
            }
            "pressure" => {
                let pressure = read_f64(cfg, "boundaries", "pressure")?.ok_or(
                    ConfigError::MissingParameter("boundaries:pressure".to_string()),
                )?;
                Ok(BoundaryCondition::Pressure(Prescribed::Constant(pressure)))
            }
            _ => Err(ConfigError::UnknownBoundaryCondition(kind.to_string())),
        }
    }
}

fn parse_vector(cfg: &Yaml) -> Result<DVec3, ConfigError> {
    let values = cfg
        .as_vec()
        .ok_or(ConfigError::InvalidArrayFormat(cfg.clone()))?;
    if values.len() > 3 || values.is_empty() {
        return Err(ConfigError::InvalidArrayLength(3, values.len()));
    }
    let mut vector = DVec3::ZERO;
    for (i, value) in values.iter().enumerate() {
        vector[i] = value
            .as_f64()
            .or_else(|| value.as_i64().map(|v| v as f64))
            .ok_or(ConfigError::InvalidArrayFormat(cfg.clone()))?;
    }
    Ok(vector)
}

/// Registry of the boundary condition attached to every tag.
///
/// Iteration happens in ascending tag order.
#[derive(Debug, Clone, Default)]
pub struct BoundaryMap {
    conditions: BTreeMap<Tag, BoundaryCondition>,
}

impl BoundaryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `condition` for `tag`, replacing any previous registration.
    pub fn insert(&mut self, tag: Tag, condition: BoundaryCondition) -> &mut Self {
        self.conditions.insert(tag, condition);
        self
    }

    /// Read a list of `{tag, kind, ...}` entries.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        let entries = match cfg {
            Yaml::BadValue | Yaml::Null => return Ok(map),
            cfg => cfg
                .as_vec()
                .ok_or(ConfigError::InvalidArrayFormat(cfg.clone()))?,
        };
        for entry in entries {
            let tag = entry["tag"]
                .as_i64()
                .and_then(|tag| Tag::try_from(tag).ok())
                .ok_or(ConfigError::MissingParameter("boundaries:tag".to_string()))?;
            if map.conditions.contains_key(&tag) {
                return Err(ConfigError::DuplicateBoundaryTag(tag));
            }
            map.insert(tag, BoundaryCondition::init(entry)?);
        }
        Ok(map)
    }

    pub fn get(&self, tag: Tag) -> Result<&BoundaryCondition, HydroError> {
        self.conditions
            .get(&tag)
            .ok_or(HydroError::UnmappedBoundaryTag { tag })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &BoundaryCondition)> {
        self.conditions.iter().map(|(&tag, condition)| (tag, condition))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
