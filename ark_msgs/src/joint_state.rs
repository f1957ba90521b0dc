//! Joint state message
//!
//! Standard message type reporting the state of a set of named joints.
//! Arrays are index-aligned with `names`; an empty array means the field
//! was not reported.

use serde::{Deserialize, Serialize};

use crate::clock::timestamp_now;

/// State of a set of named joints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    /// Timestamp in nanoseconds since UNIX epoch
    pub stamp_nanos: u64,
    /// Joint names
    pub names: Vec<String>,
    /// Joint positions in radians (or meters for prismatic joints)
    pub positions: Vec<f64>,
    /// Joint velocities in rad/s (or m/s)
    pub velocities: Vec<f64>,
    /// Joint efforts in N·m (or N)
    pub efforts: Vec<f64>,
}

impl JointState {
    /// Create a joint state with the current timestamp
    pub fn new(names: Vec<String>, positions: Vec<f64>) -> Self {
        Self {
            stamp_nanos: timestamp_now(),
            names,
            positions,
            velocities: Vec::new(),
            efforts: Vec::new(),
        }
    }

    /// Create a single-joint state with the current timestamp
    pub fn single(name: &str, position: f64, velocity: f64, effort: f64) -> Self {
        Self {
            stamp_nanos: timestamp_now(),
            names: vec![name.to_string()],
            positions: vec![position],
            velocities: vec![velocity],
            efforts: vec![effort],
        }
    }

    /// Number of joints reported
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a joint by name
    pub fn position(&self, name: &str) -> Option<f64> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.positions.get(idx).copied()
    }
}

crate::impl_wire_message!(JointState, "ark.JointState");
