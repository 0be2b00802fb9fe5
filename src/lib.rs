//! Vector, matrix and quaternion math for real-time graphics.
//!
//! All types are `f32` value types. Matrices are stored as rows and multiply column vectors.

pub mod geometry;
pub mod matrix;
pub mod quaternion;
pub mod transform;
pub mod vector;

mod parse;

pub use geometry::{point_to_edge_distance, EdgeDistance};
pub use matrix::{Mat2, Mat3, Mat4};
pub use parse::ParseError;
pub use quaternion::Quaternion;
pub use vector::{Vec2, Vec3, Vec4};
