use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul};
use std::str::FromStr;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use serde::{Deserialize, Serialize};

use crate::matrix::Mat4;
use crate::parse::{parse_floats, ParseError};
use crate::vector::{Vec3, Vec4};

/// Rotation quaternion `q0 + q1 i + q2 j + q3 k`, with `q0` the scalar part.
///
/// Most operations assume unit length; call [`Quaternion::normalize`] after integrating.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Quaternion {
    pub q0: f32,
    pub q1: f32,
    pub q2: f32,
    pub q3: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(q0: f32, q1: f32, q2: f32, q3: f32) -> Self {
        Self { q0, q1, q2, q3 }
    }

    pub const fn from_scalar_vector(q0: f32, v: Vec3) -> Self {
        Self::new(q0, v.x, v.y, v.z)
    }

    /// Rotation by `angle` radians about `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle / 2.0;

        Self::from_scalar_vector(half.cos(), half.sin() * axis.normalize())
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.q1, self.q2, self.q3)
    }

    /// Rotation angle in radians, in `[0, 2π]`.
    pub fn angle(&self) -> f32 {
        2.0 * self.q0.clamp(-1.0, 1.0).acos()
    }

    /// Unit rotation axis. The identity rotation has the zero vector as its axis.
    pub fn axis(&self) -> Vec3 {
        self.vector().normalize()
    }

    pub fn length(&self) -> f32 {
        (self.q0 * self.q0 + self.q1 * self.q1 + self.q2 * self.q2 + self.q3 * self.q3).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();

        if len == 0.0 {
            *self
        } else {
            *self * (1.0 / len)
        }
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.q0, -self.q1, -self.q2, -self.q3)
    }

    pub fn to_matrix(&self) -> Mat4 {
        let Self { q0, q1, q2, q3 } = *self;

        Mat4::from_rows([
            Vec4::new(
                2.0 * (q0 * q0 + q1 * q1 - 0.5),
                2.0 * (q1 * q2 - q0 * q3),
                2.0 * (q1 * q3 + q0 * q2),
                0.0,
            ),
            Vec4::new(
                2.0 * (q1 * q2 + q0 * q3),
                2.0 * (q0 * q0 + q2 * q2 - 0.5),
                2.0 * (q2 * q3 - q0 * q1),
                0.0,
            ),
            Vec4::new(
                2.0 * (q1 * q3 - q0 * q2),
                2.0 * (q2 * q3 + q0 * q1),
                2.0 * (q0 * q0 + q3 * q3 - 0.5),
                0.0,
            ),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ])
    }

    /// Time derivative of the orientation under body-frame angular velocity `omega`,
    /// i.e. `½ q ⊗ (0, ω)`.
    pub fn derivative(&self, omega: Vec3) -> Self {
        let Self { q0, q1, q2, q3 } = *self;
        let w = omega;

        Self::new(
            0.5 * (-q1 * w.x - q2 * w.y - q3 * w.z),
            0.5 * (q0 * w.x - q3 * w.y + q2 * w.z),
            0.5 * (q3 * w.x + q0 * w.y - q1 * w.z),
            0.5 * (-q2 * w.x + q1 * w.y + q0 * w.z),
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from([q0, q1, q2, q3]: [f32; 4]) -> Self {
        Self::new(q0, q1, q2, q3)
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(q: Quaternion) -> Self {
        [q.q0, q.q1, q.q2, q.q3]
    }
}

/// Hamilton product. `a * b` rotates by `b` first, then by `a`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;

        Self::new(
            a.q0 * b.q0 - a.q1 * b.q1 - a.q2 * b.q2 - a.q3 * b.q3,
            a.q0 * b.q1 + a.q1 * b.q0 + a.q2 * b.q3 - a.q3 * b.q2,
            a.q0 * b.q2 - a.q1 * b.q3 + a.q2 * b.q0 + a.q3 * b.q1,
            a.q0 * b.q3 + a.q1 * b.q2 - a.q2 * b.q1 + a.q3 * b.q0,
        )
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        (self.to_matrix() * Vec4::from((v, 1.0))).xyz()
    }
}

/// Component-wise scaling, used when integrating `q + dt * q'`.
impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, k: f32) -> Self {
        Self::new(self.q0 * k, self.q1 * k, self.q2 * k, self.q3 * k)
    }
}

/// Scales the rotation angle by `self`, keeping the axis.
impl Mul<Quaternion> for f32 {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Quaternion {
        Quaternion::from_axis_angle(q.axis(), self * q.angle())
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.q0 + rhs.q0,
            self.q1 + rhs.q1,
            self.q2 + rhs.q2,
            self.q3 + rhs.q3,
        )
    }
}

impl Display for Quaternion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:8.4} {:8.4} {:8.4} {:8.4}",
            self.q0, self.q1, self.q2, self.q3
        )
    }
}

impl FromStr for Quaternion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_floats::<4>(s).map(Self::from)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.q0.abs_diff_eq(&other.q0, epsilon)
            && self.q1.abs_diff_eq(&other.q1, epsilon)
            && self.q2.abs_diff_eq(&other.q2, epsilon)
            && self.q3.abs_diff_eq(&other.q3, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.q0.relative_eq(&other.q0, epsilon, max_relative)
            && self.q1.relative_eq(&other.q1, epsilon, max_relative)
            && self.q2.relative_eq(&other.q2, epsilon, max_relative)
            && self.q3.relative_eq(&other.q3, epsilon, max_relative)
    }
}

impl UlpsEq for Quaternion {
    fn default_max_ulps() -> u32 {
        f32::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
        self.q0.ulps_eq(&other.q0, epsilon, max_ulps)
            && self.q1.ulps_eq(&other.q1, epsilon, max_ulps)
            && self.q2.ulps_eq(&other.q2, epsilon, max_ulps)
            && self.q3.ulps_eq(&other.q3, epsilon, max_ulps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rotate;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn matrix_matches_axis_angle_rotation() {
        let axis = Vec3::new(1.0, 2.0, -0.5);
        let q = Quaternion::from_axis_angle(axis, 0.7);

        assert_relative_eq!(q.to_matrix(), rotate(0.7, axis), epsilon = 1e-6);
    }

    #[test]
    fn rotates_vector() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);

        assert_relative_eq!(
            q * Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(q.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn composition_matches_matrix_product() {
        let a = Quaternion::from_axis_angle(Vec3::new(0.3, -1.0, 0.2), 1.1);
        let b = Quaternion::from_axis_angle(Vec3::new(1.0, 0.5, 2.0), -0.4);

        assert_relative_eq!(
            (a * b).to_matrix(),
            a.to_matrix() * b.to_matrix(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn product_matches_cgmath() {
        let a = Quaternion::new(0.1, 0.2, 0.3, 0.4);
        let b = Quaternion::new(-0.5, 0.6, 0.7, -0.8);

        let theirs = cgmath::Quaternion::new(0.1, 0.2, 0.3, 0.4)
            * cgmath::Quaternion::new(-0.5, 0.6, 0.7, -0.8);

        assert_relative_eq!(
            a * b,
            Quaternion::from_scalar_vector(theirs.s, Vec3::new(theirs.v.x, theirs.v.y, theirs.v.z)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 2.0);

        assert_relative_eq!(q * q.conjugate(), Quaternion::IDENTITY, epsilon = 1e-6);
    }

    #[test]
    fn angle_and_axis() {
        let axis = Vec3::new(0.0, 3.0, 4.0);
        let q = Quaternion::from_axis_angle(axis, 1.2);

        assert_relative_eq!(q.angle(), 1.2, epsilon = 1e-6);
        assert_relative_eq!(q.axis(), axis.normalize(), epsilon = 1e-6);
        assert_eq!(Quaternion::IDENTITY.angle(), 0.0);
        assert_eq!(Quaternion::IDENTITY.axis(), Vec3::ZERO);
    }

    #[test]
    fn scalar_scales_angle() {
        let axis = Vec3::new(0.0, 1.0, 0.0);
        let q = Quaternion::from_axis_angle(axis, PI / 3.0);

        assert_relative_eq!(
            0.5 * q,
            Quaternion::from_axis_angle(axis, PI / 6.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(2.0 * Quaternion::IDENTITY, Quaternion::IDENTITY);
    }

    #[test]
    fn derivative_is_half_q_times_omega() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, -2.0, 0.5), 0.9);
        let omega = Vec3::new(0.3, 0.1, -0.7);

        assert_relative_eq!(
            q.derivative(omega),
            (q * Quaternion::from_scalar_vector(0.0, omega)) * 0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn integrating_derivative_spins_about_axis() {
        let omega = Vec3::new(0.0, 0.0, 1.0);
        let dt = 1e-3;
        let mut q = Quaternion::IDENTITY;

        for _ in 0..1000 {
            q = (q + q.derivative(omega) * dt).normalize();
        }

        assert_relative_eq!(q.angle(), 1.0, epsilon = 1e-3);
        assert_relative_eq!(q.axis(), omega, epsilon = 1e-4);
    }

    #[test]
    fn display_and_parse() {
        let q = Quaternion::new(1.0, 0.0, -0.25, 0.5);

        assert_eq!(q.to_string(), "  1.0000   0.0000  -0.2500   0.5000");
        assert_eq!(q.to_string().parse::<Quaternion>(), Ok(q));
    }
}
