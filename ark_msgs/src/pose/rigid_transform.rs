//! Wire rigid transform message
//!
//! A [`RigidTransform`] maps points in the `child_id` frame into the
//! `parent_id` frame: rotation plus translation plus the two frame labels.
//! Pure algebraic operations never invent labels: `compose` yields an
//! unlabeled result (the caller re-derives frame semantics) while `inv`
//! swaps child and parent to reflect the reversed mapping direction.

use serde::{Deserialize, Serialize};

use crate::error::{ArkMsgsError, ArkMsgsResult};
use crate::pose::math::{
    self, exp_so3_jacobian, exp_so3_jacobian_inv, mat3_mul_vec, quat_conjugate, quat_multiply,
    quat_normalize, rotate_vector,
};
use crate::pose::rotation::Rotation;
use crate::pose::translation::Translation;

/// Placeholder child label for unlabeled results
pub const DEFAULT_CHILD_ID: &str = "child";
/// Placeholder parent label for unlabeled results
pub const DEFAULT_PARENT_ID: &str = "parent";

/// Rigid transform between two named frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub translation: Translation,
    pub rotation: Rotation,
    /// Frame the transform maps from
    pub child_id: String,
    /// Frame the transform maps into
    pub parent_id: String,
}

impl RigidTransform {
    /// Identity transform with placeholder labels
    pub fn identity() -> Self {
        Self::from_components(Translation::zero(), Rotation::identity())
    }

    /// Create from rotation and translation parts
    pub fn from_components(translation: Translation, rotation: Rotation) -> Self {
        Self {
            translation,
            rotation,
            child_id: DEFAULT_CHILD_ID.to_string(),
            parent_id: DEFAULT_PARENT_ID.to_string(),
        }
    }

    /// Create from rotation only (zero translation)
    pub fn from_rotation(rotation: Rotation) -> Self {
        Self::from_components(Translation::zero(), rotation)
    }

    /// Create from translation only (identity rotation)
    pub fn from_translation(translation: Translation) -> Self {
        Self::from_components(translation, Rotation::identity())
    }

    /// Create from a 4x4 homogeneous matrix (row-major)
    pub fn from_matrix(matrix: [[f64; 4]; 4]) -> Self {
        let rotation = Rotation::from_matrix([
            [matrix[0][0], matrix[0][1], matrix[0][2]],
            [matrix[1][0], matrix[1][1], matrix[1][2]],
            [matrix[2][0], matrix[2][1], matrix[2][2]],
        ]);
        let translation = Translation::from_vec3([matrix[0][3], matrix[1][3], matrix[2][3]]);
        Self::from_components(translation, rotation)
    }

    /// Create from exponential coordinates `[rotvec; v]`
    pub fn from_exp_coords(exp_coords: [f64; 6]) -> Self {
        let omega = [exp_coords[0], exp_coords[1], exp_coords[2]];
        let v = [exp_coords[3], exp_coords[4], exp_coords[5]];
        let rotation = Rotation::from_rotvec(omega, false);
        let translation = Translation::from_vec3(mat3_mul_vec(exp_so3_jacobian(omega), v));
        Self::from_components(translation, rotation)
    }

    /// Create from a dual quaternion `[real; dual]`
    ///
    /// `scalar_first` selects `[w, x, y, z]` order for both parts. The real
    /// part is normalized and the dual part re-orthogonalized against it.
    /// Fails with [`ArkMsgsError::InvalidShape`] when the real part has zero
    /// norm.
    pub fn from_dual_quat(dual_quat: [f64; 8], scalar_first: bool) -> ArkMsgsResult<Self> {
        let (real, dual) = if scalar_first {
            (
                [dual_quat[1], dual_quat[2], dual_quat[3], dual_quat[0]],
                [dual_quat[5], dual_quat[6], dual_quat[7], dual_quat[4]],
            )
        } else {
            (
                [dual_quat[0], dual_quat[1], dual_quat[2], dual_quat[3]],
                [dual_quat[4], dual_quat[5], dual_quat[6], dual_quat[7]],
            )
        };

        let norm = math::quat_dot(real, real).sqrt();
        if norm < 1e-12 {
            return Err(ArkMsgsError::InvalidShape(
                "dual quaternion real part has zero norm".to_string(),
            ));
        }
        let real = [real[0] / norm, real[1] / norm, real[2] / norm, real[3] / norm];
        let mut dual = [dual[0] / norm, dual[1] / norm, dual[2] / norm, dual[3] / norm];
        // Unit dual quaternion constraint: real and dual parts orthogonal
        let drift = math::quat_dot(real, dual);
        for (d, r) in dual.iter_mut().zip(real.iter()) {
            *d -= drift * r;
        }

        // t = 2 * dual ∘ conj(real)
        let t_quat = quat_multiply(dual, quat_conjugate(real));
        let translation =
            Translation::from_vec3([2.0 * t_quat[0], 2.0 * t_quat[1], 2.0 * t_quat[2]]);
        Ok(Self::from_components(translation, Rotation::store(real)))
    }

    /// Relabel the frames this transform maps between
    pub fn with_frames(mut self, child_id: &str, parent_id: &str) -> Self {
        self.child_id = child_id.to_string();
        self.parent_id = parent_id.to_string();
        self
    }

    /// Represent as a 4x4 homogeneous matrix (row-major)
    ///
    /// The rotation block is always orthonormal and the bottom row is
    /// `[0, 0, 0, 1]`.
    pub fn as_matrix(&self) -> [[f64; 4]; 4] {
        let r = self.rotation.as_matrix();
        let t = self.translation.as_vec3();
        [
            [r[0][0], r[0][1], r[0][2], t[0]],
            [r[1][0], r[1][1], r[1][2], t[1]],
            [r[2][0], r[2][1], r[2][2], t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// Rotation and translation parts
    pub fn as_components(&self) -> (Translation, Rotation) {
        (self.translation, self.rotation)
    }

    /// Represent as exponential coordinates `[rotvec; v]`
    pub fn as_exp_coords(&self) -> [f64; 6] {
        let omega = self.rotation.as_rotvec(false);
        let v = mat3_mul_vec(exp_so3_jacobian_inv(omega), self.translation.as_vec3());
        [omega[0], omega[1], omega[2], v[0], v[1], v[2]]
    }

    /// Represent as a dual quaternion `[real; dual]`
    pub fn as_dual_quat(&self, scalar_first: bool) -> [f64; 8] {
        let real = self.rotation.as_quat(false, false);
        let t = self.translation.as_vec3();
        // dual = 0.5 * t ∘ real, t as a pure quaternion
        let dual = quat_multiply([t[0], t[1], t[2], 0.0], real);
        let dual = [dual[0] / 2.0, dual[1] / 2.0, dual[2] / 2.0, dual[3] / 2.0];
        if scalar_first {
            [
                real[3], real[0], real[1], real[2], dual[3], dual[0], dual[1], dual[2],
            ]
        } else {
            [
                real[0], real[1], real[2], real[3], dual[0], dual[1], dual[2], dual[3],
            ]
        }
    }

    /// Compose transforms: the result applies `other` first, then `self`
    ///
    /// Matches 4x4 homogeneous matrix multiplication: rotation blocks
    /// combine by matrix product and translation by `R_a · t_b + t_a`.
    /// The result carries placeholder labels; frame semantics of a
    /// composition are ambiguous in general and are left to the caller.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        let q_a = self.rotation.quat();
        let t_a = self.translation.as_vec3();
        let t_b = other.translation.as_vec3();

        let rotated = rotate_vector(t_b, q_a);
        let translation = Translation::from_vec3([
            t_a[0] + rotated[0],
            t_a[1] + rotated[1],
            t_a[2] + rotated[2],
        ]);
        let rotation = match quat_normalize(quat_multiply(q_a, other.rotation.quat())) {
            Some(q) => Rotation::store(q),
            None => Rotation::identity(),
        };
        Self::from_components(translation, rotation)
    }

    /// Invert this transform, swapping the frame labels
    pub fn inv(&self) -> RigidTransform {
        let q_inv = quat_conjugate(self.rotation.quat());
        let t = self.translation.as_vec3();
        let t_inv = rotate_vector([-t[0], -t[1], -t[2]], q_inv);

        Self {
            translation: Translation::from_vec3(t_inv),
            rotation: Rotation::store(q_inv),
            child_id: self.parent_id.clone(),
            parent_id: self.child_id.clone(),
        }
    }

    /// Map a point from the child frame into the parent frame
    pub fn transform_point(&self, point: [f64; 3]) -> [f64; 3] {
        let rotated = rotate_vector(point, self.rotation.quat());
        let t = self.translation.as_vec3();
        [rotated[0] + t[0], rotated[1] + t[1], rotated[2] + t[2]]
    }
}

crate::impl_wire_message!(RigidTransform, "ark.RigidTransform");

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    fn approx_eq_arr3(a: [f64; 3], b: [f64; 3]) -> bool {
        approx_eq(a[0], b[0]) && approx_eq(a[1], b[1]) && approx_eq(a[2], b[2])
    }

    fn approx_eq_mat4(a: [[f64; 4]; 4], b: [[f64; 4]; 4]) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| approx_eq(*x, *y))
    }

    fn mat4_mul(a: [[f64; 4]; 4], b: [[f64; 4]; 4]) -> [[f64; 4]; 4] {
        let mut out = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = (0..4).map(|k| a[i][k] * b[k][j]).sum();
            }
        }
        out
    }

    fn sample_transform() -> RigidTransform {
        RigidTransform::from_components(
            Translation::new(1.0, -2.0, 0.5),
            Rotation::from_euler("xyz", [0.3, -0.7, 1.2], false).unwrap(),
        )
        .with_frames("camera", "base_link")
    }

    #[test]
    fn test_identity() {
        let tf = RigidTransform::identity();
        assert!(approx_eq_arr3(tf.transform_point([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]));
        assert_eq!(tf.child_id, DEFAULT_CHILD_ID);
        assert_eq!(tf.parent_id, DEFAULT_PARENT_ID);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let tf = sample_transform();
        let back = RigidTransform::from_matrix(tf.as_matrix());
        assert!(approx_eq_mat4(tf.as_matrix(), back.as_matrix()));
    }

    #[test]
    fn test_matrix_is_homogeneous() {
        let m = sample_transform().as_matrix();
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
        // Orthonormal rotation block
        for i in 0..3 {
            for j in 0..3 {
                let dot = (0..3).map(|k| m[k][i] * m[k][j]).sum::<f64>();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_compose_matches_matrix_product() {
        let t1 = sample_transform();
        let t2 = RigidTransform::from_components(
            Translation::new(0.2, 0.0, -1.0),
            Rotation::from_rotvec([0.0, FRAC_PI_2, 0.0], false),
        );

        let composed = t1.compose(&t2);
        let expected = mat4_mul(t1.as_matrix(), t2.as_matrix());
        assert!(approx_eq_mat4(composed.as_matrix(), expected));
    }

    #[test]
    fn test_compose_is_unlabeled() {
        let t1 = sample_transform();
        let t2 = sample_transform();
        let composed = t1.compose(&t2);
        assert_eq!(composed.child_id, DEFAULT_CHILD_ID);
        assert_eq!(composed.parent_id, DEFAULT_PARENT_ID);
    }

    #[test]
    fn test_compose_translation_law() {
        // R_a · t_b + t_a with a quarter turn about z
        let a = RigidTransform::from_components(
            Translation::new(1.0, 0.0, 0.0),
            Rotation::from_rotvec([0.0, 0.0, FRAC_PI_2], false),
        );
        let b = RigidTransform::from_translation(Translation::new(1.0, 0.0, 0.0));
        let composed = a.compose(&b);
        assert!(approx_eq_arr3(
            composed.translation.as_vec3(),
            [1.0, 1.0, 0.0]
        ));
    }

    #[test]
    fn test_inverse_is_identity() {
        let tf = sample_transform();
        let composed = tf.inv().compose(&tf);
        assert!(approx_eq_mat4(
            composed.as_matrix(),
            RigidTransform::identity().as_matrix()
        ));
    }

    #[test]
    fn test_inverse_swaps_frame_labels() {
        let tf = sample_transform();
        let inv = tf.inv();
        assert_eq!(inv.child_id, "base_link");
        assert_eq!(inv.parent_id, "camera");
    }

    #[test]
    fn test_transform_point() {
        let tf = RigidTransform::from_components(
            Translation::new(1.0, 0.0, 0.0),
            Rotation::from_rotvec([0.0, 0.0, FRAC_PI_2], false),
        );
        assert!(approx_eq_arr3(tf.transform_point([1.0, 0.0, 0.0]), [1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_exp_coords_roundtrip() {
        let tf = sample_transform();
        let back = RigidTransform::from_exp_coords(tf.as_exp_coords());
        assert!(approx_eq_mat4(tf.as_matrix(), back.as_matrix()));
    }

    #[test]
    fn test_exp_coords_pure_translation() {
        // Zero rotation: exponential coordinates are the translation itself
        let tf = RigidTransform::from_translation(Translation::new(1.0, 2.0, 3.0));
        let exp = tf.as_exp_coords();
        assert!(approx_eq_arr3([exp[0], exp[1], exp[2]], [0.0, 0.0, 0.0]));
        assert!(approx_eq_arr3([exp[3], exp[4], exp[5]], [1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_dual_quat_roundtrip() {
        let tf = sample_transform();
        for scalar_first in [false, true] {
            let dq = tf.as_dual_quat(scalar_first);
            let back = RigidTransform::from_dual_quat(dq, scalar_first).unwrap();
            assert!(approx_eq_mat4(tf.as_matrix(), back.as_matrix()));
        }
    }

    #[test]
    fn test_dual_quat_unit_constraints() {
        let dq = sample_transform().as_dual_quat(false);
        let real = [dq[0], dq[1], dq[2], dq[3]];
        let dual = [dq[4], dq[5], dq[6], dq[7]];
        assert!(approx_eq(math::quat_dot(real, real).sqrt(), 1.0));
        assert!(approx_eq(math::quat_dot(real, dual), 0.0));
    }

    #[test]
    fn test_dual_quat_zero_real_part_fails() {
        let err = RigidTransform::from_dual_quat([0.0; 8], false).unwrap_err();
        assert!(matches!(err, ArkMsgsError::InvalidShape(_)));
    }

    #[test]
    fn test_wire_roundtrip() {
        use crate::message::Message;
        let tf = sample_transform();
        let bytes = tf.to_wire().unwrap();
        assert_eq!(RigidTransform::from_wire(&bytes).unwrap(), tf);
    }
}
