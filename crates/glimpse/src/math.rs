//! Just enough 4x4 matrix math for a perspective camera.
//!
//! Matrices are column-major, ready for `uniformMatrix4fv`.

use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[12] = x;
        m.0[13] = y;
        m.0[14] = z;
        m
    }

    /// Rotation of `angle` radians about the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.0[5] = c;
        m.0[6] = s;
        m.0[9] = -s;
        m.0[10] = c;
        m
    }

    /// OpenGL perspective projection, vertical field of view in degrees.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
        let depth = near - far;
        let mut m = Self([0.0; 16]);
        m.0[0] = f / aspect;
        m.0[5] = f;
        m.0[10] = (far + near) / depth;
        m.0[11] = -1.0;
        m.0[14] = 2.0 * far * near / depth;
        m
    }

    pub fn transform_point(&self, [x, y, z]: [f32; 3]) -> [f32; 4] {
        let m = &self.0;
        [
            m[0] * x + m[4] * y + m[8] * z + m[12],
            m[1] * x + m[5] * y + m[9] * z + m[13],
            m[2] * x + m[6] * y + m[10] * z + m[14],
            m[3] * x + m[7] * y + m[11] * z + m[15],
        ]
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (&self.0, &rhs.0);
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
            }
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_identity_mul() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(Mat4::IDENTITY * t, t);
        assert_eq!(t * Mat4::IDENTITY, t);
    }

    #[test]
    fn test_translation_then_rotation() {
        // Rotate first, then translate
        let m = Mat4::translation(0.0, 10.0, 0.0) * Mat4::rotation_x(FRAC_PI_2);
        let p = m.transform_point([0.0, 1.0, 0.0]);
        assert!(approx(p, [0.0, 10.0, 1.0, 1.0]));
    }

    #[test]
    fn test_perspective_maps_near_and_far() {
        let m = Mat4::perspective(60.0, 1.0, 1.0, 100.0);
        let near = m.transform_point([0.0, 0.0, -1.0]);
        let far = m.transform_point([0.0, 0.0, -100.0]);
        assert!((near[2] / near[3] + 1.0).abs() < 1e-4);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-4);
    }
}
