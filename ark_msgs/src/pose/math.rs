//! Quaternion and matrix kernels shared by the pose types
//!
//! All computation here runs in f64. The pose message types narrow final
//! component values to their wire precision (f32) on construction, so every
//! accessor sees exactly the stored wire values widened back to f64 and
//! repeated round-trips are bit-stable.
//!
//! Quaternions are scalar-last `[x, y, z, w]` (Hamilton convention)
//! throughout, matching the wire schema.

use std::f64::consts::PI;

pub(crate) type Quat = [f64; 4];
pub(crate) type Vec3 = [f64; 3];
pub(crate) type Mat3 = [[f64; 3]; 3];

pub(crate) fn dot3(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn norm3(v: Vec3) -> f64 {
    dot3(v, v).sqrt()
}

pub(crate) fn neg3(v: Vec3) -> Vec3 {
    [-v[0], -v[1], -v[2]]
}

pub(crate) fn normalize3(v: Vec3) -> Option<Vec3> {
    let n = norm3(v);
    if n < 1e-12 {
        return None;
    }
    Some([v[0] / n, v[1] / n, v[2] / n])
}

pub(crate) fn quat_dot(a: Quat, b: Quat) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub(crate) fn quat_normalize(q: Quat) -> Option<Quat> {
    let n2 = quat_dot(q, q);
    if n2 < 1e-24 {
        return None;
    }
    // Already unit within wire tolerance: return unchanged so narrowing to
    // f32 reproduces previously stored components bit for bit.
    if (n2 - 1.0).abs() <= 1e-6 {
        return Some(q);
    }
    let n = n2.sqrt();
    Some([q[0] / n, q[1] / n, q[2] / n, q[3] / n])
}

/// Canonical form: non-negative scalar part, ties broken lexicographically
pub(crate) fn quat_canonical(q: Quat) -> Quat {
    let [x, y, z, w] = q;
    let flip = w < 0.0
        || (w == 0.0 && (x < 0.0 || (x == 0.0 && (y < 0.0 || (y == 0.0 && z < 0.0)))));
    if flip {
        [-x, -y, -z, -w]
    } else {
        q
    }
}

pub(crate) fn quat_conjugate(q: Quat) -> Quat {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Hamilton product a ∘ b (applies b first, then a)
pub(crate) fn quat_multiply(a: Quat, b: Quat) -> Quat {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

pub(crate) fn rotate_vector(v: Vec3, q: Quat) -> Vec3 {
    let [qx, qy, qz, qw] = q;

    let t = [
        2.0 * (qy * v[2] - qz * v[1]),
        2.0 * (qz * v[0] - qx * v[2]),
        2.0 * (qx * v[1] - qy * v[0]),
    ];

    [
        v[0] + qw * t[0] + qy * t[2] - qz * t[1],
        v[1] + qw * t[1] + qz * t[0] - qx * t[2],
        v[2] + qw * t[2] + qx * t[1] - qy * t[0],
    ]
}

/// Axis must already be unit length
pub(crate) fn quat_from_axis_angle(axis: Vec3, angle: f64) -> Quat {
    let half = angle / 2.0;
    let s = half.sin();
    [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()]
}

pub(crate) fn quat_to_matrix(q: Quat) -> Mat3 {
    let [x, y, z, w] = q;

    let xx = x * x;
    let yy = y * y;
    let zz = z * z;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;

    [
        [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)],
        [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)],
        [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)],
    ]
}

pub(crate) fn matrix_to_quat(m: Mat3) -> Quat {
    let trace = m[0][0] + m[1][1] + m[2][2];

    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        [
            (m[2][1] - m[1][2]) * s,
            (m[0][2] - m[2][0]) * s,
            (m[1][0] - m[0][1]) * s,
            0.25 / s,
        ]
    } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
        let s = 2.0 * (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt();
        [
            0.25 * s,
            (m[0][1] + m[1][0]) / s,
            (m[0][2] + m[2][0]) / s,
            (m[2][1] - m[1][2]) / s,
        ]
    } else if m[1][1] > m[2][2] {
        let s = 2.0 * (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt();
        [
            (m[0][1] + m[1][0]) / s,
            0.25 * s,
            (m[1][2] + m[2][1]) / s,
            (m[0][2] - m[2][0]) / s,
        ]
    } else {
        let s = 2.0 * (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt();
        [
            (m[0][2] + m[2][0]) / s,
            (m[1][2] + m[2][1]) / s,
            0.25 * s,
            (m[1][0] - m[0][1]) / s,
        ]
    }
}

pub(crate) fn mat3_mul_vec(m: Mat3, v: Vec3) -> Vec3 {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

pub(crate) fn skew(v: Vec3) -> Mat3 {
    [
        [0.0, -v[2], v[1]],
        [v[2], 0.0, -v[0]],
        [-v[1], v[0], 0.0],
    ]
}

pub(crate) fn mat3_mul(a: Mat3, b: Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// I + a·K + b·K² for K = skew(omega)
pub(crate) fn so3_series(omega: Vec3, a: f64, b: f64) -> Mat3 {
    let k = skew(omega);
    let k2 = mat3_mul(k, k);
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = a * k[i][j] + b * k2[i][j];
        }
        out[i][i] += 1.0;
    }
    out
}

/// Left Jacobian of SO(3): V such that t = V·v in exp([omega; v])
pub(crate) fn exp_so3_jacobian(omega: Vec3) -> Mat3 {
    let theta2 = dot3(omega, omega);
    let theta = theta2.sqrt();
    if theta < 1e-4 {
        // Taylor expansion around zero rotation
        let a = 0.5 - theta2 / 24.0;
        let b = 1.0 / 6.0 - theta2 / 120.0;
        so3_series(omega, a, b)
    } else {
        let a = (1.0 - theta.cos()) / theta2;
        let b = (theta - theta.sin()) / (theta2 * theta);
        so3_series(omega, a, b)
    }
}

/// Inverse of the left Jacobian of SO(3)
pub(crate) fn exp_so3_jacobian_inv(omega: Vec3) -> Mat3 {
    let theta2 = dot3(omega, omega);
    let theta = theta2.sqrt();
    if theta < 1e-4 {
        let c = 1.0 / 12.0 + theta2 / 720.0;
        so3_series(omega, -0.5, c)
    } else {
        let half = theta / 2.0;
        let c = (1.0 - half * half.cos() / half.sin()) / theta2;
        so3_series(omega, -0.5, c)
    }
}

pub(crate) fn wrap_angle(angle: f64) -> f64 {
    if angle < -PI {
        angle + 2.0 * PI
    } else if angle > PI {
        angle - 2.0 * PI
    } else {
        angle
    }
}

/// Compose a rotation from three angles about the given axes
///
/// Axes must be unit length. `extrinsic` rotations are about fixed axes and
/// apply in sequence order; intrinsic rotations are about the moving frame.
pub(crate) fn quat_from_axis_sequence(axes: [Vec3; 3], extrinsic: bool, angles: [f64; 3]) -> Quat {
    let q0 = quat_from_axis_angle(axes[0], angles[0]);
    let q1 = quat_from_axis_angle(axes[1], angles[1]);
    let q2 = quat_from_axis_angle(axes[2], angles[2]);
    if extrinsic {
        quat_multiply(q2, quat_multiply(q1, q0))
    } else {
        quat_multiply(q0, quat_multiply(q1, q2))
    }
}

/// Solve a rotation for three angles about the given axes
///
/// Direct quaternion method of Bernardes & Viollet, generalized over
/// Davenport axis triads: consecutive axes must be orthogonal, the first and
/// third may be at any angle. Euler sequences are the special case of basis
/// axes. Axes must be unit length.
///
/// At gimbal lock the third angle is pinned to zero and the remaining
/// degrees of freedom land on the first angle.
pub(crate) fn axis_sequence_from_quat(q: Quat, axes: [Vec3; 3], extrinsic: bool) -> [f64; 3] {
    let (n1, n3) = if extrinsic {
        (axes[0], axes[2])
    } else {
        (axes[2], axes[0])
    };
    let mut n2 = axes[1];
    let mut n_cross = cross(n1, n2);
    let mut lamb = dot3(n3, n_cross).atan2(dot3(n3, n1));

    // Flip the middle axis so the offset angle is non-negative; the middle
    // result angle is negated back at the end.
    let correct_set = lamb < 0.0;
    if correct_set {
        n2 = neg3(n2);
        lamb = -lamb;
        n_cross = neg3(n_cross);
    }

    // Rotating by lamb about the middle axis aligns the third axis with the
    // first, reducing the problem to a symmetric sequence.
    let q_lamb = quat_from_axis_angle(n2, lamb);
    let qt = quat_multiply(q_lamb, q);
    let qt_vec = [qt[0], qt[1], qt[2]];

    let a = qt[3];
    let b = dot3(qt_vec, n1);
    let c = dot3(qt_vec, n2);
    let d = dot3(qt_vec, n_cross);

    let (first, third) = if extrinsic { (0, 2) } else { (2, 0) };
    let mut angles = [0.0_f64; 3];
    angles[1] = 2.0 * c.hypot(d).atan2(a.hypot(b));

    let eps = 1e-7;
    let gimbal_low = angles[1].abs() <= eps;
    let gimbal_high = (angles[1] - PI).abs() <= eps;

    let half_sum = b.atan2(a);
    let half_diff = d.atan2(c);

    if !gimbal_low && !gimbal_high {
        angles[first] = half_sum - half_diff;
        angles[third] = half_sum + half_diff;
    } else {
        // Gimbal lock: only the sum (or difference) of the first and third
        // angles is observable.
        log::warn!("gimbal lock detected, setting third angle to zero");
        angles[2] = 0.0;
        if gimbal_low {
            angles[0] = 2.0 * half_sum;
        } else {
            angles[0] = 2.0 * half_diff * if extrinsic { -1.0 } else { 1.0 };
        }
    }

    angles[1] -= lamb;
    for angle in &mut angles {
        *angle = wrap_angle(*angle);
    }
    if correct_set {
        angles[1] = -angles[1];
    }
    angles
}

#[cfg(test)]
mod tests {
    use super::*;

    const EX: Vec3 = [1.0, 0.0, 0.0];
    const EY: Vec3 = [0.0, 1.0, 0.0];
    const EZ: Vec3 = [0.0, 0.0, 1.0];

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quat_multiply_identity() {
        let q = quat_normalize([0.1, 0.2, 0.3, 0.9]).unwrap();
        let identity = [0.0, 0.0, 0.0, 1.0];
        let prod = quat_multiply(q, identity);
        for i in 0..4 {
            assert!(approx_eq(prod[i], q[i]));
        }
    }

    #[test]
    fn test_rotate_vector_z_quarter_turn() {
        let q = quat_from_axis_angle(EZ, std::f64::consts::FRAC_PI_2);
        let v = rotate_vector(EX, q);
        assert!(approx_eq(v[0], 0.0));
        assert!(approx_eq(v[1], 1.0));
        assert!(approx_eq(v[2], 0.0));
    }

    #[test]
    fn test_matrix_quat_roundtrip() {
        let q = quat_normalize([0.3, -0.4, 0.1, 0.85]).unwrap();
        let back = matrix_to_quat(quat_to_matrix(q));
        // Same rotation up to double cover
        assert!(approx_eq(quat_dot(q, back).abs(), 1.0));
    }

    #[test]
    fn test_axis_sequence_pure_rotations() {
        let theta = 0.7;
        // Extrinsic xyz, rotation about x only
        let q = quat_from_axis_angle(EX, theta);
        let angles = axis_sequence_from_quat(q, [EX, EY, EZ], true);
        assert!(approx_eq(angles[0], theta));
        assert!(approx_eq(angles[1], 0.0));
        assert!(approx_eq(angles[2], 0.0));

        // Intrinsic XYZ, rotation about z only lands on the third angle
        let q = quat_from_axis_angle(EZ, theta);
        let angles = axis_sequence_from_quat(q, [EX, EY, EZ], false);
        assert!(approx_eq(angles[0], 0.0));
        assert!(approx_eq(angles[1], 0.0));
        assert!(approx_eq(angles[2], theta));
    }

    #[test]
    fn test_axis_sequence_roundtrip_symmetric() {
        let angles = [0.4, 1.1, -0.6];
        let axes = [EZ, EX, EZ];
        let q = quat_from_axis_sequence(axes, true, angles);
        let solved = axis_sequence_from_quat(q, axes, true);
        for i in 0..3 {
            assert!(approx_eq(solved[i], angles[i]), "{:?} vs {:?}", solved, angles);
        }
    }

    #[test]
    fn test_jacobian_inverse() {
        let omega = [0.3, -0.5, 0.8];
        let v = mat3_mul(exp_so3_jacobian(omega), exp_so3_jacobian_inv(omega));
        for (i, row) in v.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((cell - expected).abs() < 1e-9);
            }
        }
    }
}
