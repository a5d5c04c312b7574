//! Geometry primitives: points, angles, poses
//!
//! Thin Copy value types used as the positional vocabulary everywhere else.
//! A `Pose` is never mutated in place; "updating" one produces a new value.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Neg, Sub};

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// A 2D position or offset, in whatever length unit the caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An angle backed by radians.
///
/// Also used for rotation rates (radians per second) when paired with a
/// timestamp; the two uses never mix inside one API.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    pub fn radians(value: f64) -> Self {
        Angle { radians: value }
    }

    pub fn degrees(value: f64) -> Self {
        Angle {
            radians: value.to_radians(),
        }
    }

    /// Angle of the vector `(x, y)`, via `atan2`.
    pub fn from_components(y: f64, x: f64) -> Self {
        Angle {
            radians: y.atan2(x),
        }
    }

    pub fn as_radians(&self) -> f64 {
        self.radians
    }

    pub fn as_degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    /// Wrapped into (-pi, pi].
    pub fn normalized(&self) -> Angle {
        let mut wrapped = self.radians % TAU;
        if wrapped > PI {
            wrapped -= TAU;
        } else if wrapped <= -PI {
            wrapped += TAU;
        }
        Angle { radians: wrapped }
    }

    pub fn sin(&self) -> f64 {
        self.radians.sin()
    }

    pub fn cos(&self) -> f64 {
        self.radians.cos()
    }

    /// Rotate the vector `(x, y)` by this angle (counter-clockwise positive).
    pub fn rotate_vector(&self, x: f64, y: f64) -> (f64, f64) {
        let rotated = Rotation2::new(self.radians) * Vector2::new(x, y);
        (rotated.x, rotated.y)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians + rhs.radians)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians - rhs.radians)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::radians(-self.radians)
    }
}

/// A chassis position plus heading.
///
/// Immutable value: the update methods return a new pose, so a caller holding
/// a previously published pose never observes it change underneath them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub heading: Angle,
}

impl Pose {
    pub fn new(position: Point, heading: Angle) -> Self {
        Pose { position, heading }
    }

    /// New pose shifted by `(dx, dy)`, heading unchanged.
    pub fn translated_by(&self, dx: f64, dy: f64) -> Pose {
        Pose {
            position: Point::new(self.position.x + dx, self.position.y + dy),
            heading: self.heading,
        }
    }

    /// New pose at the same position with a replaced heading.
    pub fn with_heading(&self, heading: Angle) -> Pose {
        Pose {
            position: self.position,
            heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);

        let sum = a + b;
        assert_relative_eq!(sum.x, 4.0);
        assert_relative_eq!(sum.y, 5.0);

        let diff = a - b;
        assert_relative_eq!(diff.x, 2.0);
        assert_relative_eq!(diff.y, 3.0);

        assert_relative_eq!(Point::default().distance_to(a), 5.0);
    }

    #[test]
    fn test_angle_normalization_wraps_into_half_open_range() {
        assert_relative_eq!(
            Angle::degrees(270.0).normalized().as_degrees(),
            -90.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            Angle::degrees(-270.0).normalized().as_degrees(),
            90.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            Angle::degrees(720.0).normalized().as_degrees(),
            0.0,
            epsilon = 1e-9
        );
        // pi maps to itself, -pi wraps to pi
        assert_relative_eq!(Angle::radians(PI).normalized().as_radians(), PI);
        assert_relative_eq!(Angle::radians(-PI).normalized().as_radians(), PI);
    }

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let (x, y) = Angle::degrees(90.0).rotate_vector(1.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pose_updates_produce_new_values() {
        let initial = Pose::new(Point::new(1.0, 2.0), Angle::degrees(30.0));
        let moved = initial.translated_by(0.5, -0.5);

        // Original untouched
        assert_relative_eq!(initial.position.x, 1.0);
        assert_relative_eq!(moved.position.x, 1.5);
        assert_relative_eq!(moved.position.y, 1.5);
        assert_relative_eq!(moved.heading.as_degrees(), 30.0);

        let turned = moved.with_heading(Angle::degrees(45.0));
        assert_relative_eq!(turned.position.x, 1.5);
        assert_relative_eq!(turned.heading.as_degrees(), 45.0);
    }
}
