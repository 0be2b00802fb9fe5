//! Square matrices stored as arrays of row vectors.
//!
//! Products follow the column-vector convention (`m * v`), so `a * b` applies `b` first.

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut, Mul};
use std::str::FromStr;

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::parse::{parse_floats, ParseError};
use crate::vector::{Vec2, Vec3, Vec4};

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[Vec2; 2]", into = "[Vec2; 2]")]
#[repr(C)]
pub struct Mat2 {
    pub rows: [Vec2; 2],
}

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[Vec3; 3]", into = "[Vec3; 3]")]
#[repr(C)]
pub struct Mat3 {
    pub rows: [Vec3; 3],
}

#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[Vec4; 4]", into = "[Vec4; 4]")]
#[repr(C)]
pub struct Mat4 {
    pub rows: [Vec4; 4],
}

macro_rules! impl_matrix {
    ($name:ident, $vec:ident, $n:literal) => {
        impl $name {
            pub const ZERO: Self = Self {
                rows: [$vec::ZERO; $n],
            };

            pub const fn from_rows(rows: [$vec; $n]) -> Self {
                Self { rows }
            }

            pub fn from_cols(cols: [$vec; $n]) -> Self {
                Self::from_rows(cols).transpose()
            }

            /// Builds a matrix by calling `f(row, col)` for every element.
            pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
                Self {
                    rows: std::array::from_fn(|i| $vec::from(std::array::from_fn(|j| f(i, j)))),
                }
            }

            pub fn row(&self, i: usize) -> $vec {
                self.rows[i]
            }

            pub fn col(&self, j: usize) -> $vec {
                $vec::from(std::array::from_fn(|i| self.rows[i][j]))
            }

            pub fn transpose(&self) -> Self {
                Self::from_fn(|i, j| self.rows[j][i])
            }

            pub fn as_rows_array(&self) -> [[f32; $n]; $n] {
                self.rows.map(<[f32; $n]>::from)
            }

            /// Column-major element order, as expected by APIs that do not transpose.
            pub fn to_cols_array(&self) -> [[f32; $n]; $n] {
                self.transpose().as_rows_array()
            }

            /// Row-major element slice.
            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_slice(&self.rows)
            }
        }

        impl From<[$vec; $n]> for $name {
            fn from(rows: [$vec; $n]) -> Self {
                Self::from_rows(rows)
            }
        }

        impl From<$name> for [$vec; $n] {
            fn from(m: $name) -> Self {
                m.rows
            }
        }

        impl From<[[f32; $n]; $n]> for $name {
            fn from(rows: [[f32; $n]; $n]) -> Self {
                Self::from_rows(rows.map($vec::from))
            }
        }

        impl Index<usize> for $name {
            type Output = $vec;

            fn index(&self, index: usize) -> &$vec {
                &self.rows[index]
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut $vec {
                &mut self.rows[index]
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;

            fn mul(self, k: f32) -> Self {
                Self {
                    rows: self.rows.map(|row| row * k),
                }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;

            fn mul(self, m: $name) -> $name {
                m * self
            }
        }

        impl Mul<$vec> for $name {
            type Output = $vec;

            fn mul(self, v: $vec) -> $vec {
                $vec::from(self.rows.map(|row| row.dot(v)))
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self::from_fn(|i, j| self.rows[i].dot(rhs.col(j)))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                for row in &self.rows {
                    writeln!(f, "{row}")?;
                }

                Ok(())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let values = parse_floats::<{ $n * $n }>(s)?;

                Ok(Self::from_fn(|i, j| values[i * $n + j]))
            }
        }

        impl AbsDiffEq for $name {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                self.rows
                    .iter()
                    .zip(&other.rows)
                    .all(|(a, b)| a.abs_diff_eq(b, epsilon))
            }
        }

        impl RelativeEq for $name {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                self.rows
                    .iter()
                    .zip(&other.rows)
                    .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
            }
        }

        impl UlpsEq for $name {
            fn default_max_ulps() -> u32 {
                f32::default_max_ulps()
            }

            fn ulps_eq(&self, other: &Self, epsilon: f32, max_ulps: u32) -> bool {
                self.rows
                    .iter()
                    .zip(&other.rows)
                    .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::IDENTITY
            }
        }
    };
}

impl_matrix!(Mat2, Vec2, 2);
impl_matrix!(Mat3, Vec3, 3);
impl_matrix!(Mat4, Vec4, 4);

impl Mat2 {
    pub const IDENTITY: Self = Self::from_rows([Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);

    pub fn determinant(&self) -> f32 {
        let m = self.as_rows_array();

        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }

    /// Returns `None` when the determinant is exactly zero.
    pub fn inverse(&self) -> Option<Self> {
        let m = self.as_rows_array();
        let det = self.determinant();

        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;

        Some(Self::from([
            [inv_det * m[1][1], -inv_det * m[0][1]],
            [-inv_det * m[1][0], inv_det * m[0][0]],
        ]))
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self::from_rows([
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    ]);

    pub fn determinant(&self) -> f32 {
        let m = self.as_rows_array();

        m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns `None` when the determinant is exactly zero.
    #[rustfmt::skip]
    pub fn inverse(&self) -> Option<Self> {
        let m = self.as_rows_array();
        let det = self.determinant();

        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;

        let inv = [
            [
                (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv_det,
                (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv_det,
            ],
        ];

        Some(Self::from(inv))
    }
}

impl From<Mat4> for Mat3 {
    /// Upper-left 3x3 block, dropping the translation part.
    fn from(m: Mat4) -> Self {
        Self::from_rows([m[0].xyz(), m[1].xyz(), m[2].xyz()])
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self::from_rows([
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    ]);

    /// Transposed cofactor matrix, each of the 16 entries expanded explicitly.
    #[rustfmt::skip]
    fn adjugate(&self) -> [[f32; 4]; 4] {
        let m = self.as_rows_array();
        let mut inv = [[0.0_f32; 4]; 4];

        inv[0][0] = m[1][1] * m[2][2] * m[3][3] - m[1][1] * m[2][3] * m[3][2]
            - m[2][1] * m[1][2] * m[3][3] + m[2][1] * m[1][3] * m[3][2]
            + m[3][1] * m[1][2] * m[2][3] - m[3][1] * m[1][3] * m[2][2];

        inv[1][0] = -m[1][0] * m[2][2] * m[3][3] + m[1][0] * m[2][3] * m[3][2]
            + m[2][0] * m[1][2] * m[3][3] - m[2][0] * m[1][3] * m[3][2]
            - m[3][0] * m[1][2] * m[2][3] + m[3][0] * m[1][3] * m[2][2];

        inv[2][0] = m[1][0] * m[2][1] * m[3][3] - m[1][0] * m[2][3] * m[3][1]
            - m[2][0] * m[1][1] * m[3][3] + m[2][0] * m[1][3] * m[3][1]
            + m[3][0] * m[1][1] * m[2][3] - m[3][0] * m[1][3] * m[2][1];

        inv[3][0] = -m[1][0] * m[2][1] * m[3][2] + m[1][0] * m[2][2] * m[3][1]
            + m[2][0] * m[1][1] * m[3][2] - m[2][0] * m[1][2] * m[3][1]
            - m[3][0] * m[1][1] * m[2][2] + m[3][0] * m[1][2] * m[2][1];

        inv[0][1] = -m[0][1] * m[2][2] * m[3][3] + m[0][1] * m[2][3] * m[3][2]
            + m[2][1] * m[0][2] * m[3][3] - m[2][1] * m[0][3] * m[3][2]
            - m[3][1] * m[0][2] * m[2][3] + m[3][1] * m[0][3] * m[2][2];

        inv[1][1] = m[0][0] * m[2][2] * m[3][3] - m[0][0] * m[2][3] * m[3][2]
            - m[2][0] * m[0][2] * m[3][3] + m[2][0] * m[0][3] * m[3][2]
            + m[3][0] * m[0][2] * m[2][3] - m[3][0] * m[0][3] * m[2][2];

        inv[2][1] = -m[0][0] * m[2][1] * m[3][3] + m[0][0] * m[2][3] * m[3][1]
            + m[2][0] * m[0][1] * m[3][3] - m[2][0] * m[0][3] * m[3][1]
            - m[3][0] * m[0][1] * m[2][3] + m[3][0] * m[0][3] * m[2][1];

        inv[3][1] = m[0][0] * m[2][1] * m[3][2] - m[0][0] * m[2][2] * m[3][1]
            - m[2][0] * m[0][1] * m[3][2] + m[2][0] * m[0][2] * m[3][1]
            + m[3][0] * m[0][1] * m[2][2] - m[3][0] * m[0][2] * m[2][1];

        inv[0][2] = m[0][1] * m[1][2] * m[3][3] - m[0][1] * m[1][3] * m[3][2]
            - m[1][1] * m[0][2] * m[3][3] + m[1][1] * m[0][3] * m[3][2]
            + m[3][1] * m[0][2] * m[1][3] - m[3][1] * m[0][3] * m[1][2];

        inv[1][2] = -m[0][0] * m[1][2] * m[3][3] + m[0][0] * m[1][3] * m[3][2]
            + m[1][0] * m[0][2] * m[3][3] - m[1][0] * m[0][3] * m[3][2]
            - m[3][0] * m[0][2] * m[1][3] + m[3][0] * m[0][3] * m[1][2];

        inv[2][2] = m[0][0] * m[1][1] * m[3][3] - m[0][0] * m[1][3] * m[3][1]
            - m[1][0] * m[0][1] * m[3][3] + m[1][0] * m[0][3] * m[3][1]
            + m[3][0] * m[0][1] * m[1][3] - m[3][0] * m[0][3] * m[1][1];

        inv[3][2] = -m[0][0] * m[1][1] * m[3][2] + m[0][0] * m[1][2] * m[3][1]
            + m[1][0] * m[0][1] * m[3][2] - m[1][0] * m[0][2] * m[3][1]
            - m[3][0] * m[0][1] * m[1][2] + m[3][0] * m[0][2] * m[1][1];

        inv[0][3] = -m[0][1] * m[1][2] * m[2][3] + m[0][1] * m[1][3] * m[2][2]
            + m[1][1] * m[0][2] * m[2][3] - m[1][1] * m[0][3] * m[2][2]
            - m[2][1] * m[0][2] * m[1][3] + m[2][1] * m[0][3] * m[1][2];

        inv[1][3] = m[0][0] * m[1][2] * m[2][3] - m[0][0] * m[1][3] * m[2][2]
            - m[1][0] * m[0][2] * m[2][3] + m[1][0] * m[0][3] * m[2][2]
            + m[2][0] * m[0][2] * m[1][3] - m[2][0] * m[0][3] * m[1][2];

        inv[2][3] = -m[0][0] * m[1][1] * m[2][3] + m[0][0] * m[1][3] * m[2][1]
            + m[1][0] * m[0][1] * m[2][3] - m[1][0] * m[0][3] * m[2][1]
            - m[2][0] * m[0][1] * m[1][3] + m[2][0] * m[0][3] * m[1][1];

        inv[3][3] = m[0][0] * m[1][1] * m[2][2] - m[0][0] * m[1][2] * m[2][1]
            - m[1][0] * m[0][1] * m[2][2] + m[1][0] * m[0][2] * m[2][1]
            + m[2][0] * m[0][1] * m[1][2] - m[2][0] * m[0][2] * m[1][1];

        inv
    }

    /// First row of `self` against the first column of the adjugate.
    fn determinant_with(&self, adj: &[[f32; 4]; 4]) -> f32 {
        let r = self.rows[0];

        r.x * adj[0][0] + r.y * adj[1][0] + r.z * adj[2][0] + r.w * adj[3][0]
    }

    pub fn determinant(&self) -> f32 {
        self.determinant_with(&self.adjugate())
    }

    /// Inverse by cofactor expansion. Returns `None` when the determinant is exactly zero.
    pub fn inverse(&self) -> Option<Self> {
        let adj = self.adjugate();
        let det = self.determinant_with(&adj);

        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;

        Some(Self::from(adj) * inv_det)
    }
}
