//! Heading-error computation
//!
//! Pure functions over the current sensor snapshot and phase context.
//! The error output feeds the downstream heading controller; its
//! magnitude gates the start of every motion phase.

use crate::config::ProcessorConfig;
use crate::sensors::SensorSnapshot;

/// Due north in 12-bit heading units
pub const HEADING_NORTH: i16 = 0x000;

/// 90 degrees clockwise from north
pub const HEADING_CLOCKWISE_90: i16 = 0x400;

/// Due south (maximum positive 12-bit heading)
pub const HEADING_SOUTH: i16 = 0x7FF;

/// Drift correction from the side line sensors.
///
/// Left trigger pulls the error positive, right trigger negative; both
/// or neither cancel to zero.
pub fn nudge(snapshot: &SensorSnapshot, config: &ProcessorConfig) -> i16 {
    match (snapshot.left, snapshot.right) {
        (true, false) => config.nudge_left,
        (false, true) => config.nudge_right,
        _ => 0,
    }
}

/// Signed heading error: actual minus desired, plus drift nudge
pub fn heading_error(
    snapshot: &SensorSnapshot,
    desired: i16,
    config: &ProcessorConfig,
) -> i16 {
    snapshot
        .heading
        .wrapping_sub(desired)
        .wrapping_add(nudge(snapshot, config))
}

/// Error magnitude is inside the alignment gate
pub fn aligned(error: i16, config: &ProcessorConfig) -> bool {
    error.unsigned_abs() < config.heading_threshold
}
