//! Wire rotation message and its parameterizations
//!
//! A [`Rotation`] always holds a unit quaternion, scalar-last, stored at
//! wire precision (f32). Construction from any parameterization normalizes;
//! every operation produces a new value. Math runs in f64 and the result is
//! narrowed once, so accessors return exactly the stored components widened
//! back and round-trips are stable at single precision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ArkMsgsError, ArkMsgsResult};
use crate::pose::math::{
    self, axis_sequence_from_quat, quat_canonical, quat_from_axis_sequence, quat_multiply,
    quat_normalize, Quat, Vec3,
};

/// Whether a multi-rotation sequence is about fixed or moving axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleOrder {
    /// Rotations about the fixed parent frame axes
    Extrinsic,
    /// Rotations about the moving body frame axes
    Intrinsic,
}

/// Unit quaternion rotation, scalar-last `[x, y, z, w]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    /// The identity rotation
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// Create from a quaternion, normalizing it
    ///
    /// `scalar_first` selects `[w, x, y, z]` input order; the default wire
    /// order is scalar-last `[x, y, z, w]`. Fails with
    /// [`ArkMsgsError::InvalidShape`] on a zero-norm quaternion.
    pub fn from_quat(quat: [f64; 4], scalar_first: bool) -> ArkMsgsResult<Self> {
        let q = if scalar_first {
            [quat[1], quat[2], quat[3], quat[0]]
        } else {
            quat
        };
        let q = quat_normalize(q)
            .ok_or_else(|| ArkMsgsError::InvalidShape("zero-norm quaternion".to_string()))?;
        Ok(Self::store(q))
    }

    /// Create from a 3x3 rotation matrix (row-major)
    pub fn from_matrix(matrix: [[f64; 3]; 3]) -> Self {
        Self::store_normalized(math::matrix_to_quat(matrix))
    }

    /// Create from a rotation vector (axis scaled by angle)
    pub fn from_rotvec(rotvec: [f64; 3], degrees: bool) -> Self {
        let v = if degrees {
            [
                rotvec[0].to_radians(),
                rotvec[1].to_radians(),
                rotvec[2].to_radians(),
            ]
        } else {
            rotvec
        };
        let angle = math::norm3(v);
        // sin(x/2)/x stays well-conditioned through the Taylor branch
        let scale = if angle < 1e-6 {
            0.5 - angle * angle / 48.0
        } else {
            (angle / 2.0).sin() / angle
        };
        Self::store_normalized([
            v[0] * scale,
            v[1] * scale,
            v[2] * scale,
            (angle / 2.0).cos(),
        ])
    }

    /// Create from Modified Rodrigues Parameters
    pub fn from_mrp(mrp: [f64; 3]) -> Self {
        let p2 = math::dot3(mrp, mrp);
        let denom = 1.0 + p2;
        Self::store_normalized([
            2.0 * mrp[0] / denom,
            2.0 * mrp[1] / denom,
            2.0 * mrp[2] / denom,
            (1.0 - p2) / denom,
        ])
    }

    /// Create from Euler angles
    ///
    /// `seq` is three characters from `xyz` (extrinsic, fixed axes) or `XYZ`
    /// (intrinsic, moving axes); consecutive axes must differ. Fails with
    /// [`ArkMsgsError::InvalidShape`] on a malformed sequence.
    pub fn from_euler(seq: &str, angles: [f64; 3], degrees: bool) -> ArkMsgsResult<Self> {
        let (axes, order) = parse_euler_seq(seq)?;
        let angles = to_radians(angles, degrees);
        Ok(Self::store_normalized(quat_from_axis_sequence(
            axes,
            order == AngleOrder::Extrinsic,
            angles,
        )))
    }

    /// Create from generalized Davenport angles
    ///
    /// The three rotation axes may be arbitrary unit vectors as long as
    /// consecutive axes are orthogonal. Fails with
    /// [`ArkMsgsError::InvalidShape`] on a degenerate axis and
    /// [`ArkMsgsError::Unsupported`] when consecutive axes are not
    /// orthogonal.
    pub fn from_davenport(
        axes: [[f64; 3]; 3],
        order: AngleOrder,
        angles: [f64; 3],
        degrees: bool,
    ) -> ArkMsgsResult<Self> {
        let axes = validate_davenport_axes(axes)?;
        let angles = to_radians(angles, degrees);
        Ok(Self::store_normalized(quat_from_axis_sequence(
            axes,
            order == AngleOrder::Extrinsic,
            angles,
        )))
    }

    /// Uniformly distributed random rotation
    pub fn random(rng: &mut impl Rng) -> Self {
        // Shoemake's subgroup algorithm
        let u1: f64 = rng.gen();
        let u2: f64 = rng.gen::<f64>() * 2.0 * std::f64::consts::PI;
        let u3: f64 = rng.gen::<f64>() * 2.0 * std::f64::consts::PI;
        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        Self::store_normalized([a * u2.sin(), a * u2.cos(), b * u3.sin(), b * u3.cos()])
    }

    /// Represent as a quaternion
    ///
    /// `canonical` forces a non-negative scalar part (the double-cover
    /// representative with `w >= 0`); `scalar_first` selects `[w, x, y, z]`
    /// output order.
    pub fn as_quat(&self, canonical: bool, scalar_first: bool) -> [f64; 4] {
        let mut q = self.quat();
        if canonical {
            q = quat_canonical(q);
        }
        if scalar_first {
            [q[3], q[0], q[1], q[2]]
        } else {
            q
        }
    }

    /// Represent as a 3x3 rotation matrix (row-major)
    pub fn as_matrix(&self) -> [[f64; 3]; 3] {
        math::quat_to_matrix(self.quat())
    }

    /// Represent as a rotation vector (magnitude at most pi)
    pub fn as_rotvec(&self, degrees: bool) -> [f64; 3] {
        let q = quat_canonical(self.quat());
        let vec_norm = math::norm3([q[0], q[1], q[2]]);
        let angle = 2.0 * vec_norm.atan2(q[3]);
        // x/sin(x/2) via Taylor near zero
        let scale = if angle < 1e-6 {
            2.0 + angle * angle / 12.0
        } else {
            angle / (angle / 2.0).sin()
        };
        let scale = if degrees { scale.to_degrees() } else { scale };
        [q[0] * scale, q[1] * scale, q[2] * scale]
    }

    /// Represent as Modified Rodrigues Parameters (norm at most 1)
    pub fn as_mrp(&self) -> [f64; 3] {
        let q = quat_canonical(self.quat());
        let denom = 1.0 + q[3];
        [q[0] / denom, q[1] / denom, q[2] / denom]
    }

    /// Represent as Euler angles for the given sequence
    pub fn as_euler(&self, seq: &str, degrees: bool) -> ArkMsgsResult<[f64; 3]> {
        let (axes, order) = parse_euler_seq(seq)?;
        let angles =
            axis_sequence_from_quat(self.quat(), axes, order == AngleOrder::Extrinsic);
        Ok(from_radians(angles, degrees))
    }

    /// Represent as generalized Davenport angles for the given axes
    pub fn as_davenport(
        &self,
        axes: [[f64; 3]; 3],
        order: AngleOrder,
        degrees: bool,
    ) -> ArkMsgsResult<[f64; 3]> {
        let axes = validate_davenport_axes(axes)?;
        let angles =
            axis_sequence_from_quat(self.quat(), axes, order == AngleOrder::Extrinsic);
        Ok(from_radians(angles, degrees))
    }

    /// Compose rotations: the result applies `other` first, then `self`
    pub fn compose(&self, other: &Rotation) -> Rotation {
        Self::store_normalized(quat_multiply(self.quat(), other.quat()))
    }

    /// Invert this rotation
    pub fn inv(&self) -> Rotation {
        Self::store(math::quat_conjugate(self.quat()))
    }

    /// Rotation angle in radians, in `[0, pi]`
    pub fn magnitude(&self) -> f64 {
        let q = self.quat();
        2.0 * math::norm3([q[0], q[1], q[2]]).atan2(q[3].abs())
    }

    /// Whether `other` is within `atol` radians of this rotation
    pub fn approx_equal(&self, other: &Rotation, atol: f64) -> bool {
        self.inv().compose(other).magnitude() <= atol
    }

    /// Apply the rotation to a 3D vector
    pub fn apply(&self, vector: [f64; 3]) -> [f64; 3] {
        math::rotate_vector(vector, self.quat())
    }

    /// Stored components widened to f64, scalar-last
    pub(crate) fn quat(&self) -> Quat {
        [
            self.x as f64,
            self.y as f64,
            self.z as f64,
            self.w as f64,
        ]
    }

    /// Narrow a unit quaternion to wire precision
    pub(crate) fn store(q: Quat) -> Self {
        Self {
            x: q[0] as f32,
            y: q[1] as f32,
            z: q[2] as f32,
            w: q[3] as f32,
        }
    }

    /// Normalize then narrow; for internally constructed quaternions that
    /// are unit up to rounding
    pub(crate) fn store_normalized(q: Quat) -> Self {
        match quat_normalize(q) {
            Some(q) => Self::store(q),
            None => Self::identity(),
        }
    }
}

crate::impl_wire_message!(Rotation, "ark.Rotation");

fn to_radians(angles: [f64; 3], degrees: bool) -> [f64; 3] {
    if degrees {
        [
            angles[0].to_radians(),
            angles[1].to_radians(),
            angles[2].to_radians(),
        ]
    } else {
        angles
    }
}

fn from_radians(angles: [f64; 3], degrees: bool) -> [f64; 3] {
    if degrees {
        [
            angles[0].to_degrees(),
            angles[1].to_degrees(),
            angles[2].to_degrees(),
        ]
    } else {
        angles
    }
}

fn parse_euler_seq(seq: &str) -> ArkMsgsResult<([Vec3; 3], AngleOrder)> {
    let chars: Vec<char> = seq.chars().collect();
    if chars.len() != 3 {
        return Err(ArkMsgsError::InvalidShape(format!(
            "Euler sequence '{}' must have exactly 3 axes",
            seq
        )));
    }
    let intrinsic = chars.iter().all(|c| c.is_ascii_uppercase());
    let extrinsic = chars.iter().all(|c| c.is_ascii_lowercase());
    if !intrinsic && !extrinsic {
        return Err(ArkMsgsError::InvalidShape(format!(
            "Euler sequence '{}' mixes intrinsic and extrinsic axes",
            seq
        )));
    }

    let mut axes = [[0.0; 3]; 3];
    for (i, c) in chars.iter().enumerate() {
        axes[i] = match c.to_ascii_lowercase() {
            'x' => [1.0, 0.0, 0.0],
            'y' => [0.0, 1.0, 0.0],
            'z' => [0.0, 0.0, 1.0],
            other => {
                return Err(ArkMsgsError::InvalidShape(format!(
                    "Euler axis '{}' is not one of x, y, z",
                    other
                )))
            }
        };
    }
    if chars[0].eq_ignore_ascii_case(&chars[1]) || chars[1].eq_ignore_ascii_case(&chars[2]) {
        return Err(ArkMsgsError::InvalidShape(format!(
            "Euler sequence '{}' repeats consecutive axes",
            seq
        )));
    }

    let order = if extrinsic {
        AngleOrder::Extrinsic
    } else {
        AngleOrder::Intrinsic
    };
    Ok((axes, order))
}

fn validate_davenport_axes(axes: [[f64; 3]; 3]) -> ArkMsgsResult<[Vec3; 3]> {
    let mut unit = [[0.0; 3]; 3];
    for (i, axis) in axes.iter().enumerate() {
        unit[i] = math::normalize3(*axis).ok_or_else(|| {
            ArkMsgsError::InvalidShape(format!("Davenport axis {} has zero length", i))
        })?;
    }
    const ORTHO_TOL: f64 = 1e-7;
    if math::dot3(unit[0], unit[1]).abs() > ORTHO_TOL
        || math::dot3(unit[1], unit[2]).abs() > ORTHO_TOL
    {
        return Err(ArkMsgsError::Unsupported(
            "consecutive Davenport axes must be orthogonal".to_string(),
        ));
    }
    Ok(unit)
}
