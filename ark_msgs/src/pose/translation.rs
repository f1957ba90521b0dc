//! Wire translation message
//!
//! A 3-vector with single-precision semantics throughout: the wire schema
//! stores f32 fields, so every conversion narrows to f32 before a value is
//! constructed and array round-trips are exact.

use serde::{Deserialize, Serialize};

use crate::pose::math::Vec3;

/// Translation [x, y, z] in meters, wire precision (f32)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Translation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The zero translation
    pub fn zero() -> Self {
        Self::default()
    }

    /// Create from an array of three components
    pub fn from_array(array: [f32; 3]) -> Self {
        Self {
            x: array[0],
            y: array[1],
            z: array[2],
        }
    }

    /// Represent as an array of three components
    pub fn as_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean norm in f64
    pub fn magnitude(&self) -> f64 {
        crate::pose::math::norm3(self.as_vec3())
    }

    /// Components widened to f64 for internal math
    pub(crate) fn as_vec3(&self) -> Vec3 {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    /// Narrow an f64 vector to wire precision
    pub(crate) fn from_vec3(v: Vec3) -> Self {
        Self {
            x: v[0] as f32,
            y: v[1] as f32,
            z: v[2] as f32,
        }
    }
}

crate::impl_wire_message!(Translation, "ark.Translation");
