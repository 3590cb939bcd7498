use serde::{Deserialize, Serialize};

/// A point in the XZ plane used by 2-D cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Velocity varying linearly between two heights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearVelocity {
    pub v1: f64,
    pub v2: f64,
    pub z1: f64,
    pub z2: f64,
}

/// Velocity following a parabola through three (height, velocity) pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParabolicVelocity {
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
}

/// Jet profile imposed on a circle zone: `velocity` at the centre, decaying
/// to zero over `distance` from the rim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JetCircle {
    pub velocity: f64,
    pub distance: f64,
}

/// Mesh data read by the solver for interpolated velocity or elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub file: String,
    pub initial_time: f64,
    pub set_pos: Point3,
    pub set_vel_mul: Point3,
    pub set_vel_add: Point3,
    pub reverse: bool,
}

impl Default for MeshData {
    fn default() -> Self {
        Self {
            file: String::new(),
            initial_time: 0.0,
            set_pos: Point3::default(),
            set_vel_mul: Point3::new(1.0, 1.0, 1.0),
            set_vel_add: Point3::default(),
            reverse: false,
        }
    }
}

/// One row of a scalar time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: f64,
    pub value: f64,
}

impl TimeValue {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearTimeValue {
    pub time: f64,
    pub profile: LinearVelocity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParabolicTimeValue {
    pub time: f64,
    pub profile: ParabolicVelocity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
    pub path: String,
}

/// Velocity file whose columns are applied at two heights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearFileSource {
    pub path: String,
    pub z1: f64,
    pub z2: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParabolicFileSource {
    pub path: String,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
}
