use crate::vector::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeDistance {
    pub distance: f32,
    /// Closest point on the edge; either an interior point or one of the endpoints.
    pub closest_point: Vec3,
}

/// Distance from `point` to the segment between `edge_tail` and `edge_head`.
///
/// The point is projected onto the line through both endpoints and the projection is clamped
/// to the segment. A degenerate edge measures the distance to its single point.
pub fn point_to_edge_distance(point: Vec3, edge_tail: Vec3, edge_head: Vec3) -> EdgeDistance {
    let edge = edge_tail - edge_head;
    let len_sq = edge.squared_length();

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (point - edge_head).dot(edge) / len_sq
    };

    let closest_point = if t <= 0.0 {
        edge_head
    } else if t >= 1.0 {
        edge_tail
    } else {
        edge_head + edge * t
    };

    EdgeDistance {
        distance: point.distance(closest_point),
        closest_point,
    }
}
