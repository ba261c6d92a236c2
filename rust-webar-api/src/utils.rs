//! Transform codec.
//!
//! Flat matrices use a single layout everywhere: euclid's row-major order of
//! its row-vector matrix, `[m11, m12, ..., m44]`. Read with column vectors this
//! is column-major, so element `(row, col)` lives at `col * 4 + row` and the
//! translation is at indices 12, 13 and 14.
//!
//! Every function here is total. Non-finite input produces non-finite output.

use crate::{ARTransform, ARVector3};

// Native matrix to its flat wire form
pub fn matrix_to_array(m: &ARTransform) -> [f32; 16] {
    [m.m11, m.m12, m.m13, m.m14,
     m.m21, m.m22, m.m23, m.m24,
     m.m31, m.m32, m.m33, m.m34,
     m.m41, m.m42, m.m43, m.m44]
}

// Flat wire matrix back to the native form
pub fn array_to_matrix(a: &[f32; 16]) -> ARTransform {
    ARTransform::new(a[0], a[1], a[2], a[3],
                     a[4], a[5], a[6], a[7],
                     a[8], a[9], a[10], a[11],
                     a[12], a[13], a[14], a[15])
}

pub fn vector_to_array(v: &ARVector3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

#[inline]
fn at(m: &[f32; 16], row: usize, col: usize) -> f32 {
    m[col * 4 + row]
}

/// Translation part of a flat matrix.
pub fn matrix_position(m: &[f32; 16]) -> [f32; 3] {
    [m[12], m[13], m[14]]
}

// Multiply 4x4 matrices, `a` applied after `b`
pub fn multiply_matrix(a: &[f32; 16], b: &[f32; 16]) -> [f32; 16] {
    let mut out = [0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = at(a, row, 0) * at(b, 0, col)
                               + at(a, row, 1) * at(b, 1, col)
                               + at(a, row, 2) * at(b, 2, col)
                               + at(a, row, 3) * at(b, 3, col);
        }
    }
    out
}

/// Inverse through the adjugate. A singular matrix divides by a zero
/// determinant and comes back non-finite.
pub fn inverse_matrix(m: &[f32; 16]) -> [f32; 16] {
    let mut out = [0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            // The adjugate is the transposed cofactor matrix
            out[col * 4 + row] = cofactor(m, col, row);
        }
    }
    let det = determinant(m);
    for value in out.iter_mut() {
        *value /= det;
    }
    out
}

/// Laplace expansion along the first row.
pub fn determinant(m: &[f32; 16]) -> f32 {
    (0..4).map(|col| at(m, 0, col) * cofactor(m, 0, col)).sum()
}

fn cofactor(m: &[f32; 16], row: usize, col: usize) -> f32 {
    let mut minor = [0f32; 9];
    let mut next = 0;
    for c in (0..4).filter(|&c| c != col) {
        for r in (0..4).filter(|&r| r != row) {
            minor[next] = at(m, r, c);
            next += 1;
        }
    }
    // Column-major 3x3, same as the 4x4 layout
    let det = minor[0] * (minor[4] * minor[8] - minor[7] * minor[5])
            - minor[3] * (minor[1] * minor[8] - minor[7] * minor[2])
            + minor[6] * (minor[1] * minor[5] - minor[4] * minor[2]);
    if (row + col) % 2 == 0 { det } else { -det }
}

/// Rotation part of a flat matrix as `[x, y, z, w]`.
///
/// Branches on the largest diagonal term so the square root never sees a
/// value close to zero.
// Adapted from http://www.euclideanspace.com/maths/geometry/rotations/conversions/matrixToQuaternion/index.htm
pub fn quaternion_from_matrix(m: &[f32; 16]) -> [f32; 4] {
    let (m00, m01, m02) = (at(m, 0, 0), at(m, 0, 1), at(m, 0, 2));
    let (m10, m11, m12) = (at(m, 1, 0), at(m, 1, 1), at(m, 1, 2));
    let (m20, m21, m22) = (at(m, 2, 0), at(m, 2, 1), at(m, 2, 2));
    let trace = m00 + m11 + m22;

    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        [(m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s]
    } else if m00 > m11 && m00 > m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        [0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s]
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        [(m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s]
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        [(m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s]
    }
}

/// Rotation matrix of a unit quaternion `[x, y, z, w]`, no translation.
pub fn quaternion_to_matrix(q: &[f32; 4]) -> [f32; 16] {
    let [x, y, z, w] = *q;
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);

    [1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz),       2.0 * (xz - wy),       0.0,
     2.0 * (xy - wz),       1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx),       0.0,
     2.0 * (xz + wy),       2.0 * (yz - wx),       1.0 - 2.0 * (xx + yy), 0.0,
     0.0,                   0.0,                   0.0,                   1.0]
}

/// `[pitch, yaw, roll]` in radians for `R = Ry(yaw) * Rx(pitch) * Rz(roll)`.
pub fn euler_angles_from_matrix(m: &[f32; 16]) -> [f32; 3] {
    let pitch = (-at(m, 1, 2)).max(-1.0).min(1.0).asin();
    let yaw = at(m, 0, 2).atan2(at(m, 2, 2));
    let roll = at(m, 1, 0).atan2(at(m, 1, 1));
    [pitch, yaw, roll]
}

/// Rotation of `radians` around the z axis.
pub fn rotation_z(radians: f32) -> [f32; 16] {
    let (s, c) = radians.sin_cos();
    [c,   s,   0.0, 0.0,
     -s,  c,   0.0, 0.0,
     0.0, 0.0, 1.0, 0.0,
     0.0, 0.0, 0.0, 1.0]
}

/// Translation by `v`.
pub fn translation(v: [f32; 3]) -> [f32; 16] {
    let mut m = identity_matrix!();
    m[12] = v[0];
    m[13] = v[1];
    m[14] = v[2];
    m
}

/// Applies the rotation part of `m` to the direction `v`.
pub fn transform_direction(m: &[f32; 16], v: [f32; 3]) -> [f32; 3] {
    let mut out = [0f32; 3];
    for row in 0..3 {
        out[row] = at(m, row, 0) * v[0] + at(m, row, 1) * v[1] + at(m, row, 2) * v[2];
    }
    out
}

/// Applies `m` to the point `p`, ignoring the projective row.
pub fn transform_point(m: &[f32; 16], p: [f32; 3]) -> [f32; 3] {
    let d = transform_direction(m, p);
    [d[0] + m[12], d[1] + m[13], d[2] + m[14]]
}

/// True when every component is a finite number.
pub fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_matrix_eq(a: &[f32; 16], b: &[f32; 16]) {
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < EPSILON, "index {}: {} != {}", i, a[i], b[i]);
        }
    }

    fn dot(a: &[f32; 4], b: &[f32; 4]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
    }

    fn normalize(q: [f32; 4]) -> [f32; 4] {
        let len = dot(&q, &q).sqrt();
        [q[0] / len, q[1] / len, q[2] / len, q[3] / len]
    }

    #[test]
    fn identity_has_fixed_layout() {
        let identity = ARTransform::identity();
        assert_eq!(matrix_to_array(&identity),
                   [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn translation_lands_in_last_column() {
        let m = ARTransform::translation(2.0, 0.0, -1.0);
        let array = matrix_to_array(&m);
        assert_eq!(matrix_position(&array), [2.0, 0.0, -1.0]);
        assert_eq!(array, translation([2.0, 0.0, -1.0]));
    }

    #[test]
    fn array_and_matrix_convert_both_ways() {
        let array = [0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, 1.5, -2.0, 1.0];
        assert_eq!(matrix_to_array(&array_to_matrix(&array)), array);
    }

    #[test]
    fn quaternion_survives_matrix_round_trip() {
        let samples = [
            [0.0, 0.0, 0.0, 1.0],
            normalize([0.9385081, -0.08066622, -0.3347714, 0.024972256]),
            normalize([0.1, 0.7, -0.2, 0.5]),
            normalize([-0.6, 0.2, 0.7, -0.1]),
            normalize([0.0, 1.0, 0.0, 0.0]),
        ];
        for q in samples.iter() {
            let m = quaternion_to_matrix(q);
            let back = quaternion_from_matrix(&m);
            assert!(dot(q, &back).abs() >= 1.0 - EPSILON, "{:?} -> {:?}", q, back);
        }
    }

    #[test]
    fn quaternion_ignores_translation() {
        let mut m = quaternion_to_matrix(&normalize([0.3, 0.1, 0.0, 0.9]));
        m[12] = 5.0;
        m[14] = -3.0;
        let q = quaternion_from_matrix(&m);
        assert!(dot(&q, &normalize([0.3, 0.1, 0.0, 0.9])).abs() >= 1.0 - EPSILON);
    }

    #[test]
    fn inverse_of_rigid_transform() {
        let m = multiply_matrix(&translation([1.0, 2.0, 3.0]), &rotation_z(0.7));
        let product = multiply_matrix(&m, &inverse_matrix(&m));
        assert_matrix_eq(&product, &identity_matrix!());
    }

    #[test]
    fn inverse_of_sheared_scale() {
        let m = [2.0, 0.0, 0.0, 0.0,
                 1.0, 3.0, 0.0, 0.0,
                 0.0, 0.5, 4.0, 0.0,
                 1.0, 2.0, 3.0, 1.0];
        assert!((determinant(&m) - 24.0).abs() < 1e-5);
        assert_matrix_eq(&multiply_matrix(&inverse_matrix(&m), &m), &identity_matrix!());
    }

    #[test]
    fn singular_inverse_is_not_sanitized() {
        let inverse = inverse_matrix(&[0f32; 16]);
        assert!(!all_finite(&inverse));
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let m = multiply_matrix(&translation([0.0, 0.0, -1.0]), &rotation_z(std::f32::consts::FRAC_PI_2));
        let p = transform_point(&m, [1.0, 0.0, 0.0]);
        assert!((p[0]).abs() < EPSILON);
        assert!((p[1] - 1.0).abs() < EPSILON);
        assert!((p[2] + 1.0).abs() < EPSILON);
    }

    #[test]
    fn euler_angles_of_yaw() {
        // Rotation of 0.5 rad around y
        let q = [0.0, (0.25f32).sin(), 0.0, (0.25f32).cos()];
        let angles = euler_angles_from_matrix(&quaternion_to_matrix(&q));
        assert!(angles[0].abs() < EPSILON);
        assert!((angles[1] - 0.5).abs() < EPSILON);
        assert!(angles[2].abs() < EPSILON);
    }

    #[test]
    fn non_finite_input_passes_through() {
        let mut m = identity_matrix!();
        m[12] = std::f32::NAN;
        assert!(matrix_position(&m)[0].is_nan());
        assert!(!all_finite(&m));
    }
}
