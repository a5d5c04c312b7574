//! Differential (tank) drivetrain kinematics
//!
//! The simplest family: two wheel groups on a fixed track width, no steering
//! angle. Strafing is impossible, so the transform's lateral component is
//! ignored.

use kincore::{Angle, KinematicsError, Result, Transform};

/// Kinematic solver for a differential drivetrain.
#[derive(Debug, Clone, Copy)]
pub struct TankKinematics {
    track_width: f64,
}

impl TankKinematics {
    /// Build the solver for a given track width (distance between the left
    /// and right wheel groups). Non-positive widths are rejected.
    pub fn new(track_width: f64) -> Result<Self> {
        if !(track_width > 0.0) || !track_width.is_finite() {
            return Err(KinematicsError::invalid_configuration(format!(
                "track width must be positive and finite, got {track_width}"
            )));
        }
        Ok(TankKinematics { track_width })
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Inverse kinematics: chassis motion to `(left, right)` wheel speeds,
    /// `dy -/+ turn_rate * track_width / 2`.
    pub fn inverse(&self, transform: &Transform) -> (f64, f64) {
        let turn = transform.turn_rate().as_radians() * self.track_width / 2.0;
        (transform.dy() - turn, transform.dy() + turn)
    }

    /// Forward kinematics: `(left, right)` wheel speeds to chassis motion.
    /// Forward speed is the average, turn rate the difference over the track
    /// width.
    pub fn forward(&self, left: f64, right: f64) -> Transform {
        Transform::new(
            0.0,
            (left + right) / 2.0,
            Angle::radians((right - left) / self.track_width),
        )
    }
}
