//! Pose estimation from wheel and heading measurements
//!
//! This crate provides:
//! - Incremental odometry integrators for swerve and tank drivetrains
//! - A wheel-speed unit converter that turns encoder rotation rates into
//!   real linear velocities before forward kinematics
//!
//! Integrators hold mutable previous-reading state and are single-writer by
//! construction: `update` takes `&mut self`, and the returned `Pose` is a
//! `Copy` snapshot. The intended caller is one periodic scheduler thread;
//! anyone wanting shared access wraps an integrator in their own lock.

pub mod speed;
pub mod swerve;
pub mod tank;

pub use speed::*;
pub use swerve::*;
pub use tank::*;
