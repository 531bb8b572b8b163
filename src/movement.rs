//! Heading-relative movement on the XZ plane.
//!
//! A heading of 0° faces down -Z. Neither function changes the height.

use cgmath::{Angle, Deg, Point3};

/// Move `d` units along the heading `angle`.
pub fn move_forward(pos: Point3<f32>, angle: Deg<f32>, d: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(pos.x + d * sin, pos.y, pos.z - d * cos)
}

/// Move `d` units perpendicular to the heading `angle`, to the right.
pub fn move_right(pos: Point3<f32>, angle: Deg<f32>, d: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(pos.x + d * cos, pos.y, pos.z + d * sin)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_point_eq(a: Point3<f32>, b: Point3<f32>) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn forward_at_zero_heading_is_negative_z() {
        let moved = move_forward(Point3::new(1.0, 2.0, 3.0), Deg(0.0), 4.0);
        assert_point_eq(moved, Point3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn forward_at_quarter_turn_is_positive_x() {
        let moved = move_forward(Point3::new(0.0, 0.0, 0.0), Deg(90.0), 2.0);
        assert_point_eq(moved, Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn negative_distance_moves_backwards() {
        let start = Point3::new(0.0, 1.0, 0.0);
        let moved = move_forward(start, Deg(0.0), -8.0);
        assert_point_eq(moved, Point3::new(0.0, 1.0, 8.0));
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        for heading in [0.0, 30.0, 135.0, -70.0] {
            let f = move_forward(origin, Deg(heading), 1.0);
            let r = move_right(origin, Deg(heading), 1.0);
            assert_relative_eq!(f.x * r.x + f.z * r.z, 0.0, epsilon = 1e-5);
        }
        assert_point_eq(move_right(origin, Deg(0.0), 3.0), Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn height_is_preserved() {
        let start = Point3::new(5.0, -7.5, 2.0);
        assert_eq!(move_forward(start, Deg(42.0), 10.0).y, -7.5);
        assert_eq!(move_right(start, Deg(42.0), 10.0).y, -7.5);
    }
}
