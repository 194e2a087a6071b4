//! Motion bookkeeping subsystem
//!
//! Leaf components driven by the command processor: the speed ramp, the
//! square/edge tracker, the y-offset calibrator, and the heading-error
//! computation.

pub mod calibrator;
pub mod heading;
pub mod ramp;
pub mod tracker;

pub use calibrator::YOffsetCalibrator;
pub use ramp::SpeedRamp;
pub use tracker::SquareTracker;
