//! Spatial pose algebra
//!
//! Wire message types for rotation, translation and rigid transforms with
//! the conversion and composition contract: every parameterization has a
//! paired constructor and accessor producing numerically equivalent results,
//! and group operations (compose, invert) follow the usual non-commutative
//! convention where `a.compose(&b)` applies `b` first.
//!
//! Stored components are wire precision (f32); internal math runs in f64
//! and narrows once on construction, so round-trips are stable at single
//! precision rather than merely close.

mod math;
mod rigid_transform;
mod rotation;
mod translation;

pub use rigid_transform::{RigidTransform, DEFAULT_CHILD_ID, DEFAULT_PARENT_ID};
pub use rotation::{AngleOrder, Rotation};
pub use translation::Translation;
