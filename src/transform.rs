//! Factories for the common 4x4 transforms, following the OpenGL conventions
//! (right-handed eye space, clip depth in `[-1, 1]`).

use crate::matrix::Mat4;
use crate::vector::{Vec3, Vec4};

pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn translate(v: Vec3) -> Mat4 {
    translate_xyz(v.x, v.y, v.z)
}

pub fn translate_xyz(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Counter-clockwise rotation by `theta` radians about `axis`.
pub fn rotate(theta: f32, axis: Vec3) -> Mat4 {
    let Vec3 { x, y, z } = axis.normalize();

    let c = theta.cos();
    let s = theta.sin();
    let t = 1.0 - c;

    Mat4::from([
        [c + t * x * x, t * x * y - s * z, t * x * z + s * y, 0.0],
        [t * x * y + s * z, c + t * y * y, t * y * z - s * x, 0.0],
        [t * x * z - s * y, t * y * z + s * x, c + t * z * z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Shortest rotation taking the direction of `from` onto the direction of `to`.
///
/// Opposite directions turn half a revolution about an axis perpendicular to `from`.
pub fn rotate_between(from: Vec3, to: Vec3) -> Mat4 {
    let from = from.normalize();
    let to = to.normalize();

    let mut axis = from.cross(to);
    if axis.squared_length() == 0.0 && from.dot(to) < 0.0 {
        axis = from.perp1();
    }
    let angle = axis.length().atan2(from.dot(to));

    rotate(angle, axis)
}

pub fn frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    Mat4::from([
        [2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0],
        [0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0],
        [0.0, 0.0, (f + n) / (n - f), 2.0 * f * n / (n - f)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// `fovy` is the full vertical field of view in radians.
pub fn perspective(fovy: f32, aspect: f32, n: f32, f: f32) -> Mat4 {
    let s = 1.0 / (fovy / 2.0).tan();

    Mat4::from([
        [s / aspect, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, (f + n) / (n - f), 2.0 * f * n / (n - f)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

pub fn ortho(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    Mat4::from([
        [2.0 / (r - l), 0.0, 0.0, (l + r) / (l - r)],
        [0.0, 2.0 / (t - b), 0.0, (b + t) / (b - t)],
        [0.0, 0.0, 2.0 / (n - f), (n + f) / (n - f)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// View matrix placing the eye at `from`, looking at `to`.
pub fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Mat4 {
    let z = (from - to).normalize();
    let x = up.cross(z).normalize();
    let y = z.cross(x).normalize();

    let m = Mat4::from_rows([
        Vec4::from((x, 0.0)),
        Vec4::from((y, 0.0)),
        Vec4::from((z, 0.0)),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    ]);

    m * translate(-from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn from_cgmath(m: cgmath::Matrix4<f32>) -> Mat4 {
        let cols: [[f32; 4]; 4] = m.into();

        Mat4::from_cols(cols.map(Vec4::from))
    }

    #[test]
    fn translate_and_scale_points() {
        let p = Vec4::new(1.0, 2.0, 3.0, 1.0);

        assert_eq!(
            translate(Vec3::new(1.0, -1.0, 0.5)) * p,
            Vec4::new(2.0, 1.0, 3.5, 1.0)
        );
        assert_eq!(scale(2.0, 3.0, 4.0) * p, Vec4::new(2.0, 6.0, 12.0, 1.0));
        assert_eq!(translate_xyz(1.0, 2.0, 3.0), translate(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn rotate_quarter_turn() {
        let m = rotate(FRAC_PI_2, Vec3::new(0.0, 0.0, 5.0));

        assert_relative_eq!(
            m * Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn rotate_matches_cgmath() {
        let axis = Vec3::new(1.0, -2.0, 0.5);
        let theirs = cgmath::Matrix4::from_axis_angle(
            cgmath::InnerSpace::normalize(cgmath::Vector3::new(1.0, -2.0, 0.5)),
            cgmath::Rad(0.8),
        );

        assert_relative_eq!(rotate(0.8, axis), from_cgmath(theirs), epsilon = 1e-6);
    }

    #[test]
    fn rotate_between_maps_directions() {
        let from = Vec3::new(1.0, 1.0, 0.0);
        let to = Vec3::new(0.0, 0.0, -3.0);
        let m = rotate_between(from, to);

        assert_relative_eq!(
            (m * Vec4::from((from.normalize(), 0.0))).xyz(),
            to.normalize(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn rotate_between_parallel_is_identity() {
        let v = Vec3::new(0.0, 2.0, 0.0);

        assert_relative_eq!(
            rotate_between(v, v * 3.0),
            Mat4::IDENTITY,
            epsilon = 1e-6
        );
    }

    #[test]
    fn rotate_between_opposite_is_proper_rotation() {
        for from in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(1.0, -2.0, 3.0),
        ] {
            let m = rotate_between(from, -from);

            assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(
                (m * Vec4::from((from, 0.0))).xyz(),
                -from,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn projections_match_cgmath() {
        assert_relative_eq!(
            perspective(1.0, 1.5, 0.1, 100.0),
            from_cgmath(cgmath::perspective(cgmath::Rad(1.0), 1.5, 0.1, 100.0)),
            epsilon = 1e-6,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            frustum(-1.0, 2.0, -0.5, 1.5, 0.5, 20.0),
            from_cgmath(cgmath::frustum(-1.0, 2.0, -0.5, 1.5, 0.5, 20.0)),
            epsilon = 1e-6,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            ortho(-4.0, 4.0, -3.0, 3.0, 0.1, 50.0),
            from_cgmath(cgmath::ortho(-4.0, 4.0, -3.0, 3.0, 0.1, 50.0)),
            epsilon = 1e-6,
            max_relative = 1e-5
        );
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let m = perspective(FRAC_PI_2, 1.0, 1.0, 10.0);

        let near = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -10.0, 1.0);

        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-6);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_matches_cgmath() {
        let from = Vec3::new(3.0, 2.0, 5.0);
        let to = Vec3::new(0.0, 0.5, -1.0);
        let up = Vec3::new(0.0, 1.0, 0.0);

        let theirs = cgmath::Matrix4::look_at_rh(
            cgmath::Point3::new(3.0, 2.0, 5.0),
            cgmath::Point3::new(0.0, 0.5, -1.0),
            cgmath::Vector3::new(0.0, 1.0, 0.0),
        );

        assert_relative_eq!(
            look_at(from, to, up),
            from_cgmath(theirs),
            epsilon = 1e-5,
            max_relative = 1e-5
        );
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let from = Vec3::new(1.0, 2.0, 3.0);
        let m = look_at(from, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        assert_relative_eq!(
            m * Vec4::from((from, 1.0)),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            epsilon = 1e-5
        );
        assert_relative_eq!(
            (m * Vec4::new(0.0, 0.0, 0.0, 1.0)).xyz(),
            Vec3::new(0.0, 0.0, -from.length()),
            epsilon = 1e-5
        );
    }
}
