//! Sensor inputs consumed by the command processor
//!
//! All fields are read-only from the processor's point of view; the
//! values are owned and refreshed by external drivers (or the sim rig).

/// One tick's worth of sensor readings
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Left floor proximity sensor triggered (drift across the guide line)
    pub left: bool,
    /// Center floor proximity sensor triggered (on a guide line)
    pub center: bool,
    /// Right floor proximity sensor triggered (drift across the guide line)
    pub right: bool,
    /// Current heading from the gyro, signed 12-bit range
    pub heading: i16,
    /// One-tick pulse marking `heading` as a fresh valid sample
    pub heading_valid: bool,
    /// Gyro calibration routine finished
    pub calibration_done: bool,
}
