//! Closed-loop simulation rig
//!
//! Hardware-free stand-ins for the pieces the command processor treats
//! as external collaborators: the board floor with its guide lines, the
//! gyro with its calibration electronics, and a first-order heading
//! plant in place of the PID heading controller and drive train.
//!
//! The rig is deliberately simple; it exists to exercise the processor's
//! sequencing and counting, not to model robot dynamics.

pub mod board;
pub mod gyro;
pub mod rig;

pub use board::Board;
pub use gyro::GyroModel;
pub use rig::SimRig;
