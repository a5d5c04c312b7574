//! Per-wheel states and drivetrain-wide aggregates
//!
//! A `WheelState` is one wheel's command or measurement. Aggregates own their
//! states exclusively and rescale by replacing them, preserving value
//! semantics. Normalization only ever applies a single uniform factor across
//! all wheels — commanded direction is preserved exactly, only magnitude is
//! capped.

use serde::{Deserialize, Serialize};

use crate::geometry::Angle;

/// A single wheel's command or measurement.
///
/// `speed` is commanded power in [-1, 1] by convention (not enforced at
/// construction) or a real velocity once unit conversion has been applied.
/// `angle` is the steering angle for swerve modules; fixed-roller and
/// differential wheels leave it at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelState {
    pub speed: f64,
    pub angle: Angle,
}

impl WheelState {
    pub fn new(speed: f64, angle: Angle) -> Self {
        WheelState { speed, angle }
    }

    /// A power-only state with no steering component.
    pub fn from_power(speed: f64) -> Self {
        WheelState {
            speed,
            angle: Angle::ZERO,
        }
    }

    /// Replacement state with the speed scaled and the angle untouched.
    pub fn scaled(&self, factor: f64) -> WheelState {
        WheelState {
            speed: self.speed * factor,
            angle: self.angle,
        }
    }
}

/// Shared normalization contract for wheel-state aggregates.
///
/// Every policy is ratio-preserving: one uniform scale factor across all
/// members, never an independent per-wheel clamp.
pub trait WheelSet {
    fn states(&self) -> &[WheelState];

    fn states_mut(&mut self) -> &mut [WheelState];

    /// Maximum absolute power across all wheels.
    fn max_power(&self) -> f64 {
        self.states()
            .iter()
            .map(|s| s.speed.abs())
            .fold(0.0, f64::max)
    }

    /// Replace every state with a uniformly scaled copy.
    fn scale(&mut self, factor: f64) {
        for state in self.states_mut() {
            *state = state.scaled(factor);
        }
    }

    /// Cap the maximum absolute power at `max`, scaling all wheels by
    /// `max / true_max` only when the true maximum exceeds it.
    fn normalize(&mut self, max: f64) {
        let true_max = self.max_power();
        if true_max > max && true_max > 0.0 {
            self.scale(max / true_max);
        }
    }

    /// Rescale so the current maximum becomes exactly 1, even if it is
    /// already under 1. A zero-power set is left untouched.
    fn normalize_to_unit(&mut self) {
        let true_max = self.max_power();
        if true_max > 0.0 {
            self.scale(1.0 / true_max);
        }
    }

    /// Scale down only if the maximum exceeds 1; otherwise leave every state
    /// exactly as it was. This is the policy to apply before actuation: it
    /// never artificially slows down an already-valid command.
    fn clamp_to_unit(&mut self) {
        let true_max = self.max_power();
        if true_max > 1.0 {
            self.scale(1.0 / true_max);
        }
    }
}

/// Fixed-arity aggregate for four-wheel drivetrains, addressed by wheel role.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourWheelState {
    states: [WheelState; 4],
}

impl FourWheelState {
    pub fn new(
        front_left: WheelState,
        front_right: WheelState,
        back_left: WheelState,
        back_right: WheelState,
    ) -> Self {
        FourWheelState {
            states: [front_left, front_right, back_left, back_right],
        }
    }

    /// Power-only states in role order.
    pub fn from_powers(
        front_left: f64,
        front_right: f64,
        back_left: f64,
        back_right: f64,
    ) -> Self {
        FourWheelState::new(
            WheelState::from_power(front_left),
            WheelState::from_power(front_right),
            WheelState::from_power(back_left),
            WheelState::from_power(back_right),
        )
    }

    pub fn front_left(&self) -> WheelState {
        self.states[0]
    }

    pub fn front_right(&self) -> WheelState {
        self.states[1]
    }

    pub fn back_left(&self) -> WheelState {
        self.states[2]
    }

    pub fn back_right(&self) -> WheelState {
        self.states[3]
    }

    /// Speeds in role order FL, FR, BL, BR.
    pub fn speeds(&self) -> [f64; 4] {
        [
            self.states[0].speed,
            self.states[1].speed,
            self.states[2].speed,
            self.states[3].speed,
        ]
    }

    pub fn as_slice(&self) -> &[WheelState] {
        &self.states
    }
}

impl WheelSet for FourWheelState {
    fn states(&self) -> &[WheelState] {
        &self.states
    }

    fn states_mut(&mut self) -> &mut [WheelState] {
        &mut self.states
    }
}

/// N-arity aggregate for general swerve chassis.
///
/// Positional index matches the order module offsets were supplied at solver
/// construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwerveState {
    states: Vec<WheelState>,
}

impl SwerveState {
    pub fn from_states(states: Vec<WheelState>) -> Self {
        SwerveState { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WheelState> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[WheelState] {
        &self.states
    }
}

impl std::ops::Index<usize> for SwerveState {
    type Output = WheelState;

    fn index(&self, index: usize) -> &WheelState {
        &self.states[index]
    }
}

impl WheelSet for SwerveState {
    fn states(&self) -> &[WheelState] {
        &self.states
    }

    fn states_mut(&mut self) -> &mut [WheelState] {
        &mut self.states
    }
}
