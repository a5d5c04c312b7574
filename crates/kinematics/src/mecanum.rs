//! Mecanum drivetrain kinematics
//!
//! One solver type with two inverse strategies behind a tagged variant. The
//! matrix strategy is canonical: a closed-form (4 x 3) matrix built from the
//! wheel offsets, multiplied directly for inverse kinematics. The
//! trigonometric strategy is a documented alternative that projects the
//! movement angle onto each wheel's roller angle; it avoids the matrix but
//! covers inverse kinematics only.
//!
//! Forward kinematics is always matrix-backed so the strategy choice never
//! changes localization behavior. It is a low-fidelity approximation for this
//! family: roller slip breaks the rigid-body assumption, so treat the output
//! as a rough estimate rather than a reliable localization source.

use std::f64::consts::FRAC_PI_4;

use kincore::{
    FourWheelState, KinematicsError, Point, Result, Transform, WheelSet,
};
use nalgebra::{SMatrix, Vector3, Vector4};
use serde::{Deserialize, Serialize};

const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Inverse-kinematics strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MecanumStrategy {
    /// Canonical closed-form matrix multiply. Produces raw, unnormalized
    /// powers; apply `clamp_to_unit` before actuation.
    Matrix,
    /// Alternative geometric formulation: clamps the commanded magnitude into
    /// `[min_magnitude, max_magnitude]`, projects the movement angle onto the
    /// 45/315 degree roller pairs, then caps the result ratio-preserving.
    Trig {
        min_magnitude: f64,
        max_magnitude: f64,
    },
}

/// Kinematic solver for a four-wheel mecanum chassis.
///
/// Wheel roles are fixed front-left, front-right, back-left, back-right; the
/// produced `FourWheelState` uses the same order.
#[derive(Debug, Clone)]
pub struct MecanumKinematics {
    strategy: MecanumStrategy,
    matrix: SMatrix<f64, 4, 3>,
    solver: SMatrix<f64, 3, 4>,
}

impl MecanumKinematics {
    /// Build the solver from the four wheel offsets (relative to the rotation
    /// center) and an inverse strategy.
    pub fn new(
        front_left: Point,
        front_right: Point,
        back_left: Point,
        back_right: Point,
        strategy: MecanumStrategy,
    ) -> Result<Self> {
        if let MecanumStrategy::Trig {
            min_magnitude,
            max_magnitude,
        } = strategy
        {
            if !(0.0..=max_magnitude).contains(&min_magnitude) || !max_magnitude.is_finite() {
                return Err(KinematicsError::invalid_configuration(format!(
                    "trig magnitude range [{min_magnitude}, {max_magnitude}] is not a valid clamp range"
                )));
            }
        }

        let matrix = Self::wheel_matrix(front_left, front_right, back_left, back_right);
        let solver = matrix
            .pseudo_inverse(1e-10)
            .map_err(KinematicsError::invalid_configuration)?;

        Ok(MecanumKinematics {
            strategy,
            matrix,
            solver,
        })
    }

    /// The classic roller relation, columns `[dx, dy, turn]`, scaled by
    /// 1/sqrt(2): strafe pattern (-1, +1, +1, -1), forward all +1, and a turn
    /// contribution proportional to each wheel's offset from center, negative
    /// on the left side.
    fn wheel_matrix(
        front_left: Point,
        front_right: Point,
        back_left: Point,
        back_right: Point,
    ) -> SMatrix<f64, 4, 3> {
        let lever = |offset: Point| offset.x.abs() + offset.y.abs();
        SMatrix::<f64, 4, 3>::from_row_slice(&[
            -1.0, 1.0, -lever(front_left),
            1.0, 1.0, lever(front_right),
            1.0, 1.0, -lever(back_left),
            -1.0, 1.0, lever(back_right),
        ]) * FRAC_1_SQRT_2
    }

    pub fn strategy(&self) -> MecanumStrategy {
        self.strategy
    }

    /// Inverse kinematics: chassis motion to four raw wheel powers,
    /// dispatched on the configured strategy.
    pub fn inverse(&self, transform: &Transform) -> FourWheelState {
        match self.strategy {
            MecanumStrategy::Matrix => self.inverse_matrix(transform),
            MecanumStrategy::Trig {
                min_magnitude,
                max_magnitude,
            } => Self::inverse_trig(transform, min_magnitude, max_magnitude),
        }
    }

    fn inverse_matrix(&self, transform: &Transform) -> FourWheelState {
        let chassis = Vector3::new(
            transform.dx(),
            transform.dy(),
            transform.turn_rate().as_radians(),
        );
        let powers = self.matrix * chassis;
        FourWheelState::from_powers(powers[0], powers[1], powers[2], powers[3])
    }

    fn inverse_trig(transform: &Transform, min_magnitude: f64, max_magnitude: f64) -> FourWheelState {
        let magnitude = transform
            .dx()
            .hypot(transform.dy())
            .clamp(min_magnitude, max_magnitude);
        let direction = transform.dy().atan2(transform.dx());
        let turn = transform.turn_rate().as_radians();

        // Front-left and back-right ride the 45 degree rollers, the other
        // diagonal the 315 degree ones; turn subtracts on the left side
        let diagonal_a = (direction - FRAC_PI_4).sin();
        let diagonal_b = (direction + FRAC_PI_4).sin();

        let mut wheels = FourWheelState::from_powers(
            magnitude * diagonal_a - turn,
            magnitude * diagonal_b + turn,
            magnitude * diagonal_b - turn,
            magnitude * diagonal_a + turn,
        );
        wheels.clamp_to_unit();
        wheels
    }

    /// Forward kinematics: wheel powers to the best-fit chassis motion via
    /// the precomputed pseudo-inverse.
    ///
    /// Approximation only — see the module docs.
    pub fn forward(&self, wheels: &FourWheelState) -> Transform {
        let speeds = wheels.speeds();
        let chassis = self.solver * Vector4::new(speeds[0], speeds[1], speeds[2], speeds[3]);
        Transform::new(
            chassis[0],
            chassis[1],
            kincore::Angle::radians(chassis[2]),
        )
    }
}
