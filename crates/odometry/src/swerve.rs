//! Swerve drivetrain odometry
//!
//! Fuses per-module velocity measurements and a heading sensor reading into
//! an estimated pose, going through the solver's forward kinematics each
//! cycle. Module states must carry real velocities (see `speed`) — raw
//! commanded power is not a valid proxy for actual wheel motion.

use std::sync::Arc;

use kincore::{Angle, Pose, Result, WheelState};
use kinematics::SwerveKinematics;

/// Incremental pose integrator for a swerve chassis.
///
/// Two states: uninitialized (no previous timestamp) and tracking. The first
/// `update` records baselines and never produces a time-delta-driven jump,
/// whatever the timestamp's absolute value.
#[derive(Debug, Clone)]
pub struct SwerveOdometry {
    kinematics: Arc<SwerveKinematics>,
    pose: Pose,
    heading_offset: Angle,
    last_timestamp: Option<f64>,
}

impl SwerveOdometry {
    /// Start tracking from `initial_pose`, with `initial_heading` being the
    /// heading sensor's reading at that moment. The offset between the two is
    /// captured once, so the sensor's absolute zero need not align with the
    /// robot's starting heading.
    pub fn new(
        kinematics: Arc<SwerveKinematics>,
        initial_pose: Pose,
        initial_heading: Angle,
    ) -> Self {
        let heading_offset = initial_heading - initial_pose.heading;
        log::debug!(
            "SwerveOdometry: initialized with {} modules, heading offset {:.4} rad",
            kinematics.module_count(),
            heading_offset.as_radians()
        );

        SwerveOdometry {
            kinematics,
            pose: initial_pose,
            heading_offset,
            last_timestamp: None,
        }
    }

    /// Last published pose snapshot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Re-arm the uninitialized state and recapture the heading offset.
    pub fn reset(&mut self, pose: Pose, heading: Angle) {
        log::debug!(
            "SwerveOdometry: reset to ({:.3}, {:.3}) heading {:.4} rad",
            pose.position.x,
            pose.position.y,
            pose.heading.as_radians()
        );
        self.pose = pose;
        self.heading_offset = heading - pose.heading;
        self.last_timestamp = None;
    }

    /// Integrate one measurement cycle and return the new pose.
    ///
    /// `timestamp` is in seconds on any monotonic clock the caller likes;
    /// `heading` is the raw sensor reading; `states` are per-module measured
    /// velocities in the order the module offsets were supplied to the
    /// solver. A wrong-length slice fails with `DimensionMismatch` before
    /// any state is touched.
    pub fn update(
        &mut self,
        timestamp: f64,
        heading: Angle,
        states: &[WheelState],
    ) -> Result<Pose> {
        let motion = self.kinematics.forward(states)?;

        let elapsed = self.elapsed_since(timestamp);
        let corrected = (heading - self.heading_offset).normalized();

        let (field_vx, field_vy) = corrected.rotate_vector(motion.dx(), motion.dy());
        let pose = self
            .pose
            .translated_by(field_vx * elapsed, field_vy * elapsed)
            .with_heading(corrected);

        self.pose = pose;
        self.last_timestamp = Some(timestamp);
        Ok(pose)
    }

    /// Elapsed seconds since the previous update: zero on the first call, and
    /// clamped to zero on a non-monotonic timestamp so the pose never
    /// reverses.
    fn elapsed_since(&self, timestamp: f64) -> f64 {
        match self.last_timestamp {
            None => 0.0,
            Some(previous) => {
                let elapsed = timestamp - previous;
                if elapsed < 0.0 {
                    log::warn!(
                        "SwerveOdometry: non-monotonic timestamp {timestamp:.6} after {previous:.6}, clamping elapsed time to zero"
                    );
                    0.0
                } else {
                    elapsed
                }
            }
        }
    }
}
