use std::{
    marker::PhantomData,
    ops::{Add, Mul},
};

use glam::DVec3;

/// Marker: (density, velocity, pressure).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Primitive;
/// Marker: (mass, momentum, total energy).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Conserved;
/// Marker: (volume, momentum, total energy) rates of change of a cell.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rate;

/// A scalar–vector–scalar triple, interpreted through the marker type `T`.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct State<T>(f64, DVec3, f64, PhantomData<T>);

impl<T> Add for State<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2, PhantomData)
    }
}

impl<T> Mul<State<T>> for f64 {
    type Output = State<T>;

    fn mul(self, rhs: State<T>) -> Self::Output {
        State::<T>(self * rhs.0, self * rhs.1, self * rhs.2, PhantomData)
    }
}

impl<T> State<T> {
    pub fn vacuum() -> Self {
        Self(0., DVec3::ZERO, 0., PhantomData)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite()
    }
}

impl State<Primitive> {
    pub fn new(density: f64, velocity: DVec3, pressure: f64) -> Self {
        Self(density, velocity, pressure, PhantomData)
    }

    pub fn density(&self) -> f64 {
        self.0
    }

    pub fn velocity(&self) -> DVec3 {
        self.1
    }

    pub fn pressure(&self) -> f64 {
        self.2
    }
}

impl State<Conserved> {
    pub fn new(mass: f64, momentum: DVec3, energy: f64) -> Self {
        Self(mass, momentum, energy, PhantomData)
    }

    pub fn mass(&self) -> f64 {
        self.0
    }

    pub fn momentum(&self) -> DVec3 {
        self.1
    }

    pub fn energy(&self) -> f64 {
        self.2
    }
}

impl State<Rate> {
    pub fn new(volume: f64, momentum: DVec3, energy: f64) -> Self {
        Self(volume, momentum, energy, PhantomData)
    }

    /// dV/dt
    pub fn volume(&self) -> f64 {
        self.0
    }

    pub fn momentum(&self) -> DVec3 {
        self.1
    }

    pub fn energy(&self) -> f64 {
        self.2
    }

    /// Add the contribution of one sub-cell force `force` acting through a corner
    /// with aggregated normal `corner_normal` on a vertex moving at `vertex_velocity`.
    pub fn add_corner_force(&mut self, force: DVec3, corner_normal: DVec3, vertex_velocity: DVec3) {
        self.0 += corner_normal.dot(vertex_velocity);
        self.1 -= force;
        self.2 -= force.dot(vertex_velocity);
    }
}

pub type Primitives = State<Primitive>;
pub type Residual = State<Rate>;
