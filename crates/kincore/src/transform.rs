//! Chassis transform: the whole-robot motion descriptor
//!
//! A `Transform` carries the desired (or measured) robot-frame motion as
//! translate-X, translate-Y and a rotation rate. Solvers consume it for
//! inverse kinematics and produce it from forward kinematics.

use serde::{Deserialize, Serialize};

use crate::geometry::{Angle, Point};

/// Robot-frame motion: `(dx, dy)` translation plus a rotation rate.
///
/// The rotation component is always an instantaneous rate (per second when
/// paired with timestamps, dimensionless otherwise) — a follower chasing a
/// heading target converts to a rate before constructing a `Transform`.
///
/// When built from a start/stop point pair the pair is retained, so the axis
/// inversion operations can mirror the stop point and recompute both derived
/// distances together; the fields never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    start: Point,
    stop: Point,
    dx: f64,
    dy: f64,
    turn_rate: Angle,
}

impl Transform {
    /// Motion from raw components. Equivalent to a start at the origin and a
    /// stop at `(dx, dy)`.
    pub fn new(dx: f64, dy: f64, turn_rate: Angle) -> Self {
        Transform::between_points(Point::default(), Point::new(dx, dy), turn_rate)
    }

    /// Motion derived from a start/stop point pair; the translation is the
    /// component-wise difference `stop - start`.
    pub fn between_points(start: Point, stop: Point, turn_rate: Angle) -> Self {
        Transform {
            start,
            stop,
            dx: stop.x - start.x,
            dy: stop.y - start.y,
            turn_rate,
        }
    }

    /// Robot-frame motion from a field-frame velocity and a measured heading.
    ///
    /// Rotation by the negative heading: `dx = vx*cos + vy*sin`,
    /// `dy = -vx*sin + vy*cos`. Lets drivers command in field coordinates
    /// while the solvers stay robot-relative.
    pub fn field_relative(field_vx: f64, field_vy: f64, heading: Angle, turn_rate: Angle) -> Self {
        let (dx, dy) = (-heading).rotate_vector(field_vx, field_vy);
        Transform::new(dx, dy, turn_rate)
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn turn_rate(&self) -> Angle {
        self.turn_rate
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn stop(&self) -> Point {
        self.stop
    }

    /// Mirror the stop point across the start point along the X axis and
    /// recompute the derived distances. Used when a drivetrain's wiring
    /// reverses the lateral sign convention.
    pub fn invert_x(&self) -> Transform {
        let stop = Point::new(2.0 * self.start.x - self.stop.x, self.stop.y);
        Transform::between_points(self.start, stop, self.turn_rate)
    }

    /// Mirror the stop point across the start point along the Y axis and
    /// recompute the derived distances.
    pub fn invert_y(&self) -> Transform {
        let stop = Point::new(self.stop.x, 2.0 * self.start.y - self.stop.y);
        Transform::between_points(self.start, stop, self.turn_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_point_construction_derives_distances() {
        let t = Transform::between_points(
            Point::new(1.0, 2.0),
            Point::new(4.0, -2.0),
            Angle::degrees(10.0),
        );
        assert_relative_eq!(t.dx(), 3.0);
        assert_relative_eq!(t.dy(), -4.0);
        assert_relative_eq!(t.turn_rate().as_degrees(), 10.0);
    }

    #[test]
    fn test_invert_x_mirrors_stop_and_recomputes() {
        let t = Transform::between_points(
            Point::new(1.0, 1.0),
            Point::new(3.0, 4.0),
            Angle::ZERO,
        );
        let inverted = t.invert_x();

        assert_relative_eq!(inverted.stop().x, -1.0);
        assert_relative_eq!(inverted.stop().y, 4.0);
        assert_relative_eq!(inverted.dx(), -2.0);
        assert_relative_eq!(inverted.dy(), 3.0);
        // Original untouched
        assert_relative_eq!(t.dx(), 2.0);
    }

    #[test]
    fn test_invert_y_mirrors_stop_and_recomputes() {
        let t = Transform::new(2.0, 3.0, Angle::ZERO);
        let inverted = t.invert_y();

        assert_relative_eq!(inverted.dx(), 2.0);
        assert_relative_eq!(inverted.dy(), -3.0);
    }

    #[test]
    fn test_field_relative_identity_at_zero_heading() {
        let t = Transform::field_relative(1.0, 2.0, Angle::ZERO, Angle::ZERO);
        assert_relative_eq!(t.dx(), 1.0);
        assert_relative_eq!(t.dy(), 2.0);
    }

    #[test]
    fn test_field_relative_quarter_turn() {
        // Robot facing +90 deg: a field +X command becomes robot -Y motion
        let t = Transform::field_relative(1.0, 0.0, Angle::degrees(90.0), Angle::ZERO);
        assert_relative_eq!(t.dx(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.dy(), -1.0, epsilon = 1e-12);
    }
}
