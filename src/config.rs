//! Configuration for the command processor
//!
//! Two numeric presets exist: a fast-simulation preset with aggressive
//! ramp steps and nudge magnitudes, and a real-time preset matching the
//! physical robot. The preset is selected once at construction and never
//! re-decided per tick.

use crate::error::{AshvaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maximum forward-speed value (top two bits of the 10-bit register set)
pub const MAX_SPEED: u16 = 0x300;

/// Heading alignment gate: motion phases begin only below this error magnitude
pub const HEADING_THRESHOLD: u16 = 0x02C;

/// Numeric preset for the command processor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessorConfig {
    /// Speed added per valid heading sample during ramp-up
    pub ramp_increment: u16,
    /// Speed removed per valid heading sample during ramp-down
    pub ramp_decrement: u16,
    /// Heading-error correction when the left sensor detects drift
    pub nudge_left: i16,
    /// Heading-error correction when the right sensor detects drift
    pub nudge_right: i16,
    /// Error magnitude below which heading counts as aligned
    pub heading_threshold: u16,
}

impl ProcessorConfig {
    /// Preset for accelerated simulation runs
    pub fn fast_sim() -> Self {
        Self {
            ramp_increment: 0x20,
            ramp_decrement: 0x40,
            nudge_left: 0x1FF,
            nudge_right: -0x1FF,
            heading_threshold: HEADING_THRESHOLD,
        }
    }

    /// Preset matching the physical robot timing
    pub fn real_time() -> Self {
        Self {
            ramp_increment: 0x03,
            ramp_decrement: 0x06,
            nudge_left: 0x05F,
            nudge_right: -0x05F,
            heading_threshold: HEADING_THRESHOLD,
        }
    }

    /// Validate numeric ranges
    pub fn validate(&self) -> Result<()> {
        if self.ramp_increment == 0 || self.ramp_decrement == 0 {
            return Err(AshvaError::InvalidParameter(
                "ramp increment/decrement must be nonzero".to_string(),
            ));
        }
        if self.heading_threshold == 0 {
            return Err(AshvaError::InvalidParameter(
                "heading threshold must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::real_time()
    }
}

/// Top-level application configuration for the demo binary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub processor: ProcessorConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

/// Simulation rig configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Board dimension in squares per side
    pub board_squares: u8,
    /// Guide-line width in square units
    pub line_width: f32,
    /// Distance traveled per tick at speed 1, in square units
    pub distance_per_tick: f32,
    /// Fraction of the heading error cancelled per tick by the plant (0..1)
    pub heading_gain: f32,
    /// Ticks between the calibrate pulse and calibration-done
    pub calibration_ticks: u32,
    /// Stddev of gaussian heading jitter, in heading units (0 = none)
    pub heading_noise: f32,
    /// RNG seed for jitter; 0 selects a deterministic no-noise run
    pub random_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            board_squares: 5,
            line_width: 0.12,
            distance_per_tick: 5.0e-5,
            heading_gain: 0.125,
            calibration_ticks: 32,
            heading_noise: 0.0,
            random_seed: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.processor.validate()?;
        Ok(config)
    }

    /// Defaults suitable for simulation runs
    pub fn sim_defaults() -> Self {
        Self {
            processor: ProcessorConfig::fast_sim(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
