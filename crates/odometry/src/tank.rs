//! Differential (tank) drivetrain odometry
//!
//! A specialized integration path for the two-wheel case: tracks cumulative
//! left/right distance readings directly and averages their deltas instead of
//! running a full kinematic solve each cycle.

use kincore::{Angle, KinematicsError, Pose, Result};

/// Incremental pose integrator for a differential drivetrain.
///
/// Wheel inputs are cumulative distances (encoder totals already converted to
/// a length unit), not velocities; the pose delta comes straight from the
/// reading deltas, so elapsed time only matters for the monotonicity guard.
#[derive(Debug, Clone)]
pub struct TankOdometry {
    track_width: f64,
    pose: Pose,
    heading_offset: Angle,
    last_timestamp: Option<f64>,
    last_left: f64,
    last_right: f64,
}

impl TankOdometry {
    /// Start tracking from `initial_pose`, with `initial_heading` being the
    /// heading sensor's reading at that moment. Non-positive track widths are
    /// rejected.
    pub fn new(track_width: f64, initial_pose: Pose, initial_heading: Angle) -> Result<Self> {
        if !(track_width > 0.0) || !track_width.is_finite() {
            return Err(KinematicsError::invalid_configuration(format!(
                "track width must be positive and finite, got {track_width}"
            )));
        }

        log::debug!(
            "TankOdometry: initialized with track width {:.3}",
            track_width
        );

        Ok(TankOdometry {
            track_width,
            pose: initial_pose,
            heading_offset: initial_heading - initial_pose.heading,
            last_timestamp: None,
            last_left: 0.0,
            last_right: 0.0,
        })
    }

    /// Last published pose snapshot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Heading synthesized from the wheel totals alone, for chassis without a
    /// heading sensor: `(right - left) / track_width`.
    pub fn heading_from_wheels(&self, left_total: f64, right_total: f64) -> Angle {
        Angle::radians((right_total - left_total) / self.track_width)
    }

    /// Re-arm the uninitialized state and recapture the heading offset.
    pub fn reset(&mut self, pose: Pose, heading: Angle) {
        log::debug!(
            "TankOdometry: reset to ({:.3}, {:.3})",
            pose.position.x,
            pose.position.y
        );
        self.pose = pose;
        self.heading_offset = heading - pose.heading;
        self.last_timestamp = None;
    }

    /// Integrate one measurement cycle and return the new pose.
    ///
    /// The first call records the distance baselines and replaces only the
    /// heading — never a position jump, whatever the readings' absolute
    /// values.
    pub fn update(
        &mut self,
        timestamp: f64,
        heading: Angle,
        left_distance: f64,
        right_distance: f64,
    ) -> Pose {
        let corrected = (heading - self.heading_offset).normalized();

        let Some(previous) = self.last_timestamp else {
            self.last_timestamp = Some(timestamp);
            self.last_left = left_distance;
            self.last_right = right_distance;
            self.pose = self.pose.with_heading(corrected);
            return self.pose;
        };

        if timestamp < previous {
            log::warn!(
                "TankOdometry: non-monotonic timestamp {timestamp:.6} after {previous:.6}, skipping integration"
            );
            return self.pose;
        }

        let left_delta = left_distance - self.last_left;
        let right_delta = right_distance - self.last_right;
        let forward = (left_delta + right_delta) / 2.0;

        let (field_dx, field_dy) = corrected.rotate_vector(0.0, forward);
        let pose = self
            .pose
            .translated_by(field_dx, field_dy)
            .with_heading(corrected);

        self.pose = pose;
        self.last_timestamp = Some(timestamp);
        self.last_left = left_distance;
        self.last_right = right_distance;
        pose
    }
}
