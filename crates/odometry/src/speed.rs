//! Wheel-speed unit conversion
//!
//! Encoder readings arrive as rotations per second; odometry needs real
//! linear velocities. The converter folds wheel circumference and gearing
//! into that conversion, and the batch helper rewrites a whole wheel-state
//! array before it is fed into forward kinematics.

use kincore::{KinematicsError, Result, WheelState};
use serde::{Deserialize, Serialize};
use uom::si::f64::{Length, Velocity};
use uom::si::length::meter;
use uom::si::velocity::{
    foot_per_minute, foot_per_second, inch_per_minute, inch_per_second, meter_per_second,
    mile_per_hour,
};

/// Output unit menu for [`WheelSpeedConverter::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    InchesPerSecond,
    FeetPerSecond,
    MetersPerSecond,
    InchesPerMinute,
    FeetPerMinute,
    MilesPerHour,
}

/// Converts a motor rotation rate into the wheel's linear velocity.
///
/// `gear_ratio` is motor rotations per wheel rotation; a direct drive is 1.0.
#[derive(Debug, Clone, Copy)]
pub struct WheelSpeedConverter {
    wheel_circumference: Length,
    gear_ratio: f64,
}

impl WheelSpeedConverter {
    /// Fails with `InvalidConfiguration` on a non-positive circumference or a
    /// zero/non-finite gear ratio, instead of letting a later division
    /// propagate infinity or NaN silently.
    pub fn new(wheel_circumference: Length, gear_ratio: f64) -> Result<Self> {
        let circumference_meters = wheel_circumference.get::<meter>();
        if !(circumference_meters > 0.0) || !circumference_meters.is_finite() {
            return Err(KinematicsError::invalid_configuration(format!(
                "wheel circumference must be positive and finite, got {circumference_meters} m"
            )));
        }
        if gear_ratio == 0.0 || !gear_ratio.is_finite() {
            return Err(KinematicsError::invalid_configuration(format!(
                "gear ratio must be nonzero and finite, got {gear_ratio}"
            )));
        }

        Ok(WheelSpeedConverter {
            wheel_circumference,
            gear_ratio,
        })
    }

    /// Convenience constructor from a wheel diameter.
    pub fn from_wheel_diameter(diameter: Length, gear_ratio: f64) -> Result<Self> {
        Self::new(diameter * std::f64::consts::PI, gear_ratio)
    }

    /// Linear velocity for a motor rotation rate in rotations per second.
    pub fn linear_velocity(&self, rotations_per_second: f64) -> Velocity {
        let meters_per_second =
            self.wheel_circumference.get::<meter>() * rotations_per_second / self.gear_ratio;
        Velocity::new::<meter_per_second>(meters_per_second)
    }

    /// Linear velocity expressed in the requested unit.
    pub fn convert(&self, rotations_per_second: f64, unit: SpeedUnit) -> f64 {
        let velocity = self.linear_velocity(rotations_per_second);
        match unit {
            SpeedUnit::InchesPerSecond => velocity.get::<inch_per_second>(),
            SpeedUnit::FeetPerSecond => velocity.get::<foot_per_second>(),
            SpeedUnit::MetersPerSecond => velocity.get::<meter_per_second>(),
            SpeedUnit::InchesPerMinute => velocity.get::<inch_per_minute>(),
            SpeedUnit::FeetPerMinute => velocity.get::<foot_per_minute>(),
            SpeedUnit::MilesPerHour => velocity.get::<mile_per_hour>(),
        }
    }
}

/// Rewrite a wheel-state array from encoder rotation rates to meters per
/// second, one converter per wheel, preserving steering angles.
///
/// This is the required transformation before wheel states are fed into
/// forward kinematics or odometry; raw commanded power is not a valid proxy
/// for actual wheel velocity. Array lengths must match, checked before any
/// conversion.
pub fn convert_states(
    states: &[WheelState],
    converters: &[WheelSpeedConverter],
) -> Result<Vec<WheelState>> {
    if states.len() != converters.len() {
        return Err(KinematicsError::DimensionMismatch {
            expected: converters.len(),
            actual: states.len(),
        });
    }

    Ok(states
        .iter()
        .zip(converters)
        .map(|(state, converter)| {
            WheelState::new(
                converter.convert(state.speed, SpeedUnit::MetersPerSecond),
                state.angle,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kincore::Angle;
    use uom::si::length::inch;

    #[test]
    fn test_rejects_degenerate_geometry() {
        assert!(WheelSpeedConverter::new(Length::new::<meter>(0.0), 1.0).is_err());
        assert!(WheelSpeedConverter::new(Length::new::<meter>(-0.1), 1.0).is_err());
        assert!(WheelSpeedConverter::new(Length::new::<meter>(0.3), 0.0).is_err());
        assert!(WheelSpeedConverter::new(Length::new::<meter>(0.3), f64::NAN).is_err());
    }

    #[test]
    fn test_direct_drive_conversion() {
        // 4 inch diameter wheel, direct drive, one rotation per second
        let converter =
            WheelSpeedConverter::from_wheel_diameter(Length::new::<inch>(4.0), 1.0).unwrap();

        let inches_per_second = converter.convert(1.0, SpeedUnit::InchesPerSecond);
        assert_relative_eq!(
            inches_per_second,
            4.0 * std::f64::consts::PI,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_gear_ratio_divides_motor_speed() {
        // 10:1 reduction: the wheel turns a tenth as fast as the motor
        let geared =
            WheelSpeedConverter::new(Length::new::<meter>(0.5), 10.0).unwrap();
        let direct = WheelSpeedConverter::new(Length::new::<meter>(0.5), 1.0).unwrap();

        assert_relative_eq!(
            geared.convert(10.0, SpeedUnit::MetersPerSecond),
            direct.convert(1.0, SpeedUnit::MetersPerSecond),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_unit_variants_agree() {
        let converter =
            WheelSpeedConverter::new(Length::new::<meter>(0.3), 1.0).unwrap();

        let per_second = converter.convert(2.0, SpeedUnit::InchesPerSecond);
        let per_minute = converter.convert(2.0, SpeedUnit::InchesPerMinute);
        assert_relative_eq!(per_minute, per_second * 60.0, epsilon = 1e-9);

        let feet = converter.convert(2.0, SpeedUnit::FeetPerSecond);
        assert_relative_eq!(per_second, feet * 12.0, epsilon = 1e-9);

        let mph = converter.convert(2.0, SpeedUnit::MilesPerHour);
        assert_relative_eq!(mph, feet * 3600.0 / 5280.0, epsilon = 1e-9);
    }

    #[test]
    fn test_batch_conversion_preserves_angles() {
        let converter =
            WheelSpeedConverter::new(Length::new::<meter>(1.0), 1.0).unwrap();
        let states = vec![
            WheelState::new(2.0, Angle::degrees(45.0)),
            WheelState::new(-1.0, Angle::degrees(-90.0)),
        ];

        let converted = convert_states(&states, &[converter, converter]).unwrap();

        assert_relative_eq!(converted[0].speed, 2.0, epsilon = 1e-12);
        assert_relative_eq!(converted[0].angle.as_degrees(), 45.0);
        assert_relative_eq!(converted[1].speed, -1.0, epsilon = 1e-12);
        assert_relative_eq!(converted[1].angle.as_degrees(), -90.0);
    }

    #[test]
    fn test_batch_conversion_rejects_length_mismatch() {
        let converter =
            WheelSpeedConverter::new(Length::new::<meter>(1.0), 1.0).unwrap();
        let states = vec![WheelState::from_power(1.0); 3];

        assert_eq!(
            convert_states(&states, &[converter, converter]),
            Err(KinematicsError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }
}
