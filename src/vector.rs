use std::fmt::{Display, Formatter};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};
use std::str::FromStr;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::parse::{parse_floats, ParseError};

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
#[repr(C)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

macro_rules! impl_vector {
    ($name:ident, $n:literal, $($field:ident),+) => {
        impl $name {
            pub const ZERO: Self = Self { $($field: 0.0),+ };

            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            pub fn squared_length(self) -> f32 {
                self.dot(self)
            }

            pub fn length(self) -> f32 {
                self.squared_length().sqrt()
            }

            /// Returns the unit vector in the same direction. The zero vector stays zero.
            pub fn normalize(self) -> Self {
                let len = self.length();

                if len == 0.0 {
                    self
                } else {
                    self / len
                }
            }

            pub fn distance(self, other: Self) -> f32 {
                (self - other).length()
            }

            pub fn lerp(self, other: Self, factor: f32) -> Self {
                self + (other - self) * factor
            }

            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }
        }

        impl From<[f32; $n]> for $name {
            fn from(array: [f32; $n]) -> Self {
                let [$($field),+] = array;
                Self { $($field),+ }
            }
        }

        impl From<$name> for [f32; $n] {
            fn from(v: $name) -> Self {
                v.to_array()
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;

            fn mul(self, k: f32) -> Self {
                Self { $($field: self.$field * k),+ }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;

            fn mul(self, v: $name) -> $name {
                v * self
            }
        }

        impl Div<f32> for $name {
            type Output = Self;

            fn div(self, k: f32) -> Self {
                Self { $($field: self.$field / k),+ }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl MulAssign<f32> for $name {
            fn mul_assign(&mut self, k: f32) {
                *self = *self * k;
            }
        }

        impl DivAssign<f32> for $name {
            fn div_assign(&mut self, k: f32) {
                *self = *self / k;
            }
        }

        impl Index<usize> for $name {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                &bytemuck::cast_ref::<Self, [f32; $n]>(self)[index]
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                &mut bytemuck::cast_mut::<Self, [f32; $n]>(self)[index]
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                for (i, value) in self.to_array().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value:8.4}")?;
                }

                Ok(())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_floats::<$n>(s).map(Self::from)
            }
        }

        impl AbsDiffEq for $name {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                true $(&& self.$field.abs_diff_eq(&other.$field, epsilon))+
            }
        }

        impl RelativeEq for $name {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                true $(&& self.$field.relative_eq(&other.$field, epsilon, max_relative))+
            }
        }

        impl UlpsEq for $name {
            fn default_max_ulps() -> u32 {
                f32::default_max_ulps()
            }

            fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
                true $(&& self.$field.ulps_eq(&other.$field, epsilon, max_ulps))+
            }
        }
    };
}

impl_vector!(Vec2, 2, x, y);
impl_vector!(Vec3, 3, x, y, z);
impl_vector!(Vec4, 4, x, y, z, w);

impl Vec3 {
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Distance from this point to the infinite line through `line_start` along `line_dir`.
    pub fn distance_to_line(self, line_start: Vec3, line_dir: Vec3) -> f32 {
        let line_dir = line_dir.normalize();
        let to_point = self - line_start;

        (to_point - to_point.dot(line_dir) * line_dir).length()
    }

    /// A unit vector perpendicular to `self`, lying in a coordinate plane where possible.
    ///
    /// The zero vector yields the x axis.
    pub fn perp1(self) -> Vec3 {
        let Vec3 { x, y, z } = self;

        let result = if x == 0.0 {
            if y == 0.0 || z == 0.0 {
                Vec3::new(1.0, 0.0, 0.0)
            } else {
                Vec3::new(0.0, -z, y)
            }
        } else if y == 0.0 {
            if z == 0.0 {
                Vec3::new(0.0, 0.0, 1.0)
            } else {
                Vec3::new(-z, 0.0, x)
            }
        } else {
            Vec3::new(-y, x, 0.0)
        };

        result.normalize()
    }

    /// A unit vector perpendicular to both `self` and [`Vec3::perp1`].
    pub fn perp2(self) -> Vec3 {
        let Vec3 { x, y, z } = self;

        if y == 0.0 {
            Vec3::new(0.0, 1.0, 0.0)
        } else if z == 0.0 {
            Vec3::new(0.0, 0.0, 1.0)
        } else if x == 0.0 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(x * z, y * z, -x * x - y * y).normalize()
        }
    }
}

impl From<(Vec2, f32)> for Vec3 {
    fn from((v, z): (Vec2, f32)) -> Self {
        Vec3::new(v.x, v.y, z)
    }
}

impl Vec4 {
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<(Vec3, f32)> for Vec4 {
    fn from((v, w): (Vec3, f32)) -> Self {
        Vec4::new(v.x, v.y, v.z, w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, -3.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, 7.0, -3.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vec3::new(2.0, -2.5, 3.0));
        assert_eq!(a.dot(b), 12.0);

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= 4.0;
        assert_eq!(c, b / 2.0);
    }

    #[test]
    fn cross_is_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);

        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalize() {
        assert_relative_eq!(Vec2::new(3.0, 4.0).normalize(), Vec2::new(0.6, 0.8));
        assert_relative_eq!(Vec4::new(0.0, 0.0, 0.0, 2.0).normalize().length(), 1.0);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn indexing() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        v[2] = 7.0;

        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 7.0);
        assert_eq!(v.z, 7.0);
        assert_eq!(v[3], 4.0);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range() {
        let v = Vec2::new(1.0, 2.0);
        let _ = v[2];
    }

    #[test]
    fn widen_and_truncate() {
        let v = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(Vec4::from((v, 1.0)), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(Vec4::from((v, 1.0)).xyz(), v);
        assert_eq!(Vec3::from((v.xy(), 0.0)), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn distance_to_line() {
        let p = Vec3::new(3.0, 4.0, 0.0);

        assert_relative_eq!(
            p.distance_to_line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
            4.0
        );
        assert_relative_eq!(
            p.distance_to_line(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)),
            5.0
        );
    }

    #[test]
    fn perpendiculars() {
        let cases = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(1.0, 0.0, 3.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];

        for v in cases {
            let p1 = v.perp1();
            let p2 = v.perp2();

            assert_relative_eq!(p1.length(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(p2.length(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(p1.dot(v), 0.0, epsilon = 1e-6);
            assert_relative_eq!(p2.dot(v), 0.0, epsilon = 1e-6);
            assert_relative_eq!(p1.dot(p2), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn display_and_parse() {
        let v = Vec3::new(1.0, -0.5, 12.25);

        assert_eq!(v.to_string(), "  1.0000  -0.5000  12.2500");
        assert_eq!(v.to_string().parse::<Vec3>(), Ok(v));
        assert!("1 2".parse::<Vec3>().is_err());
    }

    #[test]
    fn serde_as_array() {
        let v = Vec2::new(1.5, 2.0);
        let json = serde_json::to_string(&v).unwrap();

        assert_eq!(json, "[1.5,2.0]");
        assert_eq!(serde_json::from_str::<Vec2>(&json).unwrap(), v);
    }
}
