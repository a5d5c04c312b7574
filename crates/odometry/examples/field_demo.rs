//! Drives a square swerve chassis through a short command sequence and
//! traces the odometry estimate.
//!
//! Shows the intended ownership pattern: one solver per drivetrain
//! configuration, shared by handle between the actuation path and the
//! odometry integrator (a scheduler thread wanting shared reads would wrap
//! the integrator in its own RwLock).

use std::sync::Arc;

use kincore::{Angle, Point, Pose, Transform, WheelSet};
use kinematics::SwerveKinematics;
use odometry::{convert_states, SwerveOdometry, WheelSpeedConverter};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use uom::si::f64::Length;
use uom::si::length::inch;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    // Square chassis, offsets in meters
    let modules = vec![
        Point::new(0.3, 0.3),
        Point::new(0.3, -0.3),
        Point::new(-0.3, 0.3),
        Point::new(-0.3, -0.3),
    ];
    println!("module geometry: {}", serde_json::to_string(&modules)?);

    let kinematics = Arc::new(SwerveKinematics::new(modules)?);
    let mut odometry = SwerveOdometry::new(kinematics.clone(), Pose::default(), Angle::ZERO);

    // 4 inch wheels behind a 6.75:1 reduction, one converter per module
    let converter = WheelSpeedConverter::from_wheel_diameter(Length::new::<inch>(4.0), 6.75)?;
    let converters = vec![converter; kinematics.module_count()];
    let motor_rps_per_mps = 1.0 / converter.convert(1.0, odometry::SpeedUnit::MetersPerSecond);

    // Command sequence: forward, strafe, turn in place
    let commands = [
        Transform::new(0.0, 1.0, Angle::ZERO),
        Transform::new(1.0, 0.0, Angle::ZERO),
        Transform::new(0.0, 0.0, Angle::degrees(90.0)),
    ];

    let dt = 0.02; // 50 Hz control cycle
    let mut t = 0.0;
    let mut heading = Angle::ZERO;

    for command in &commands {
        for _ in 0..50 {
            // Actuation path: inverse kinematics, then the pre-actuation cap
            let mut setpoints = kinematics.inverse(command);
            setpoints.clamp_to_unit();

            // Pretend the chassis tracks perfectly: synthesize encoder rates
            // from the commanded module velocities, then convert them back to
            // real velocities for the odometry path
            let measured: Vec<_> = kinematics
                .inverse(command)
                .iter()
                .map(|state| state.scaled(motor_rps_per_mps))
                .collect();
            let velocities = convert_states(&measured, &converters)?;

            heading = heading + Angle::radians(command.turn_rate().as_radians() * dt);
            odometry.update(t, heading, &velocities)?;
            t += dt;
        }

        let pose = odometry.pose();
        println!(
            "t={:5.2}s  pose=({:6.3}, {:6.3})  heading={:7.2} deg",
            t,
            pose.position.x,
            pose.position.y,
            pose.heading.as_degrees()
        );
    }

    Ok(())
}
