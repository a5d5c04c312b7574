//! Kinematic solvers for the supported drivetrain families
//!
//! This crate provides:
//! - A general N-module swerve solver (least-squares constraint matrix)
//! - A mecanum solver with a matrix and a trigonometric inverse strategy
//! - A differential (tank) solver
//!
//! All solvers are immutable after construction; the constraint and
//! pseudo-inverse matrices are computed once, so a solver can be shared and
//! called concurrently without locking.

pub mod mecanum;
pub mod swerve;
pub mod tank;

pub use mecanum::*;
pub use swerve::*;
pub use tank::*;
