//! General swerve drivetrain kinematics
//!
//! Works for any module count >= 2. Each module contributes two rows to a
//! (2N x 3) constraint matrix encoding the rigid-body velocity relation
//! `v_module = v_chassis + omega x r`; inverse kinematics is a direct
//! multiply, forward kinematics solves the overdetermined system in the
//! least-squares sense through a precomputed Moore-Penrose pseudo-inverse.

use kincore::{
    Angle, KinematicsError, Point, Result, SwerveState, Transform, WheelState,
};
use nalgebra::{DMatrix, DVector};

/// Singular values below this are treated as zero when computing the
/// pseudo-inverse.
const PSEUDO_INVERSE_EPSILON: f64 = 1e-10;

/// Kinematic solver for a swerve chassis with N independently steered modules.
///
/// Module offsets are relative to the robot's rotation center and fixed at
/// construction; wheel states produced and consumed by this solver are indexed
/// in the same order the offsets were supplied.
#[derive(Debug, Clone)]
pub struct SwerveKinematics {
    modules: Vec<Point>,
    constraints: DMatrix<f64>,
    solver: DMatrix<f64>,
}

impl SwerveKinematics {
    /// Build the solver for the given module offsets.
    ///
    /// Fails with `InvalidConfiguration` when fewer than two offsets are
    /// supplied: a single module cannot distinguish translation from
    /// rotation.
    pub fn new(modules: Vec<Point>) -> Result<Self> {
        if modules.len() < 2 {
            return Err(KinematicsError::invalid_configuration(format!(
                "swerve chassis needs at least 2 module offsets, got {}",
                modules.len()
            )));
        }

        let constraints = Self::constraint_matrix(&modules);
        let solver = constraints
            .clone()
            .pseudo_inverse(PSEUDO_INVERSE_EPSILON)
            .map_err(KinematicsError::invalid_configuration)?;

        log::debug!(
            "SwerveKinematics: built {}x3 constraint matrix for {} modules",
            constraints.nrows(),
            modules.len()
        );

        Ok(SwerveKinematics {
            modules,
            constraints,
            solver,
        })
    }

    /// Two rows per module: the module's local velocity equals the chassis
    /// translation plus the rotational contribution of its offset,
    /// `vx = dx - omega*ry` and `vy = dy + omega*rx`.
    fn constraint_matrix(modules: &[Point]) -> DMatrix<f64> {
        let mut matrix = DMatrix::zeros(2 * modules.len(), 3);
        for (i, offset) in modules.iter().enumerate() {
            matrix[(2 * i, 0)] = 1.0;
            matrix[(2 * i, 2)] = -offset.y;
            matrix[(2 * i + 1, 1)] = 1.0;
            matrix[(2 * i + 1, 2)] = offset.x;
        }
        matrix
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn modules(&self) -> &[Point] {
        &self.modules
    }

    /// Inverse kinematics: chassis motion to per-module speed and steering
    /// angle. Speeds come out in the same unit as the transform's translation
    /// components; the caller normalizes before actuation.
    pub fn inverse(&self, transform: &Transform) -> SwerveState {
        let chassis = DVector::from_vec(vec![
            transform.dx(),
            transform.dy(),
            transform.turn_rate().as_radians(),
        ]);
        let velocities = &self.constraints * chassis;

        let states = (0..self.modules.len())
            .map(|i| {
                let vx = velocities[2 * i];
                let vy = velocities[2 * i + 1];
                WheelState::new(vx.hypot(vy), Angle::from_components(vy, vx))
            })
            .collect();

        SwerveState::from_states(states)
    }

    /// Forward kinematics: measured module states to the best-fit chassis
    /// motion.
    ///
    /// With more than two modules the system is overdetermined; the
    /// least-squares solve averages out per-module sensor noise instead of
    /// trusting any single wheel. The state slice length must match the
    /// module count, checked before any numeric work.
    pub fn forward(&self, states: &[WheelState]) -> Result<Transform> {
        if states.len() != self.modules.len() {
            return Err(KinematicsError::DimensionMismatch {
                expected: self.modules.len(),
                actual: states.len(),
            });
        }

        let mut velocities = DVector::zeros(2 * states.len());
        for (i, state) in states.iter().enumerate() {
            velocities[2 * i] = state.speed * state.angle.cos();
            velocities[2 * i + 1] = state.speed * state.angle.sin();
        }

        let chassis = &self.solver * velocities;
        Ok(Transform::new(
            chassis[0],
            chassis[1],
            Angle::radians(chassis[2]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn square_chassis() -> SwerveKinematics {
        SwerveKinematics::new(vec![
            Point::new(6.0, 6.0),   // front left
            Point::new(6.0, -6.0),  // front right
            Point::new(-6.0, 6.0),  // back left
            Point::new(-6.0, -6.0), // back right
        ])
        .unwrap()
    }

    fn assert_round_trip(kinematics: &SwerveKinematics, transform: Transform) {
        let states = kinematics.inverse(&transform);
        let recovered = kinematics.forward(states.as_slice()).unwrap();

        assert_relative_eq!(recovered.dx(), transform.dx(), epsilon = 1e-9);
        assert_relative_eq!(recovered.dy(), transform.dy(), epsilon = 1e-9);
        assert_relative_eq!(
            recovered.turn_rate().as_radians(),
            transform.turn_rate().as_radians(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rejects_fewer_than_two_modules() {
        let result = SwerveKinematics::new(vec![Point::new(1.0, 1.0)]);
        assert!(matches!(
            result,
            Err(KinematicsError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_round_trip_pure_translation() {
        let kinematics = square_chassis();
        assert_round_trip(&kinematics, Transform::new(1.5, 0.0, Angle::ZERO));
        assert_round_trip(&kinematics, Transform::new(0.0, -2.0, Angle::ZERO));
    }

    #[test]
    fn test_round_trip_pure_rotation() {
        let kinematics = square_chassis();
        assert_round_trip(&kinematics, Transform::new(0.0, 0.0, Angle::degrees(45.0)));
    }

    #[test]
    fn test_round_trip_combined_motion() {
        let kinematics = square_chassis();
        assert_round_trip(&kinematics, Transform::new(0.8, -0.3, Angle::degrees(-30.0)));
    }

    #[test]
    fn test_round_trip_three_asymmetric_modules() {
        // Non-collinear, non-square layout
        let kinematics = SwerveKinematics::new(vec![
            Point::new(5.0, 0.0),
            Point::new(-3.0, 4.0),
            Point::new(-3.0, -4.0),
        ])
        .unwrap();
        assert_round_trip(&kinematics, Transform::new(1.0, 0.5, Angle::degrees(20.0)));
    }

    #[test]
    fn test_pure_rotation_spins_wheels_tangentially() {
        let kinematics = square_chassis();
        let states = kinematics.inverse(&Transform::new(0.0, 0.0, Angle::degrees(90.0)));

        // All speeds equal: every module sits at the same radius
        let expected_speed = FRAC_PI_2 * 72.0_f64.sqrt();
        for i in 0..4 {
            assert_relative_eq!(states[i].speed, expected_speed, epsilon = 1e-9);
        }

        // Steering angles perpendicular to each module's radius vector
        for (i, offset) in kinematics.modules().iter().enumerate() {
            let radial = offset.x * states[i].angle.cos() + offset.y * states[i].angle.sin();
            assert_relative_eq!(radial, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_pure_translation_aligns_all_modules() {
        let kinematics = square_chassis();
        let states = kinematics.inverse(&Transform::new(0.0, 1.0, Angle::ZERO));

        for i in 0..4 {
            assert_relative_eq!(states[i].speed, 1.0, epsilon = 1e-12);
            assert_relative_eq!(states[i].angle.as_degrees(), 90.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forward_rejects_wrong_state_count() {
        let kinematics = square_chassis();
        let states = vec![WheelState::from_power(1.0); 3];

        assert_eq!(
            kinematics.forward(&states),
            Err(KinematicsError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_forward_averages_noisy_measurements() {
        let kinematics = square_chassis();
        let clean = kinematics.inverse(&Transform::new(1.0, 0.0, Angle::ZERO));

        // Perturb one wheel; least-squares spreads the disagreement instead
        // of following the outlier
        let mut noisy: Vec<WheelState> = clean.as_slice().to_vec();
        noisy[0] = WheelState::new(noisy[0].speed + 0.1, noisy[0].angle);

        let recovered = kinematics.forward(&noisy).unwrap();
        assert!((recovered.dx() - 1.0).abs() < 0.1 / 4.0 + 1e-9);
    }
}
