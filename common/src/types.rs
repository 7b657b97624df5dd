//! Common Types for Heterogeneous Network Deployments
//!
//! Defines the geometric value types and identifiers shared by every crate

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point or displacement in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (height above ground)
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned box in meters
///
/// Used both as the overall deployment area and as the footprint of a
/// femtocell block or building. A box with `z_min == z_max` is flat.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl BoundingBox {
    /// Create a new box from its six bounds
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_min: f64, z_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max, z_min, z_max }
    }

    /// Create a flat box lying at height `z`
    pub fn flat(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z: f64) -> Self {
        Self::new(x_min, x_max, y_min, y_max, z, z)
    }

    /// Extent along x
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y
    pub fn depth(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Extent along z
    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Area of the xy footprint in square meters
    pub fn footprint_area(&self) -> f64 {
        self.width() * self.depth()
    }

    /// Check whether the bounds are ordered on every axis
    pub fn is_well_formed(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max && self.z_min <= self.z_max
    }

    /// Check whether two footprints overlap
    ///
    /// Boxes that merely touch along an edge count as overlapping; only a
    /// box lying strictly left, right, above or below the other is disjoint.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.x_min > other.x_max
            || other.x_min > self.x_max
            || self.y_min > other.y_max
            || other.y_min > self.y_max)
    }

    /// Check whether `other`'s footprint lies entirely inside this one
    pub fn contains_footprint(&self, other: &BoundingBox) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Check whether a point lies inside the box, bounds included
    pub fn contains_point(&self, p: &Vector3) -> bool {
        p.x >= self.x_min
            && p.x <= self.x_max
            && p.y >= self.y_min
            && p.y <= self.y_max
            && p.z >= self.z_min
            && p.z <= self.z_max
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}] x [{}, {}]",
            self.x_min, self.x_max, self.y_min, self.y_max, self.z_min, self.z_max
        )
    }
}

/// Cell Identity, assigned in installation order starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u16);

/// International Mobile Subscriber Identity, assigned in installation order starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Imsi(pub u64);

/// Handle of a node created through an installer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw node index
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Handle of a building installed through an installer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Sector of a three-sector macro site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Boresight at 0 degrees
    Alpha = 0,
    /// Boresight at 120 degrees
    Beta = 1,
    /// Boresight at 240 degrees
    Gamma = 2,
}

impl Sector {
    /// Sectors per macro site
    pub const PER_SITE: u32 = 3;

    /// All sectors in installation order
    pub const ALL: [Sector; 3] = [Sector::Alpha, Sector::Beta, Sector::Gamma];

    /// Antenna boresight in degrees
    pub fn orientation_degrees(&self) -> f64 {
        match self {
            Sector::Alpha => 0.0,
            Sector::Beta => 120.0,
            Sector::Gamma => 240.0,
        }
    }
}
