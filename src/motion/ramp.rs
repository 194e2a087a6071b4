//! Speed ramp regulator
//!
//! Maintains the bounded forward-speed value. The processor calls
//! `ramp_up`/`ramp_down` once per valid heading sample; the actuator
//! interface reads `value()` continuously. Saturation at both ends is
//! silent and intentional.

use crate::config::{ProcessorConfig, MAX_SPEED};

/// Bounded forward-speed register with configured ramp steps
#[derive(Debug, Clone)]
pub struct SpeedRamp {
    value: u16,
    increment: u16,
    decrement: u16,
}

impl SpeedRamp {
    /// Create a stopped ramp with the preset's step sizes
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            value: 0,
            increment: config.ramp_increment,
            decrement: config.ramp_decrement,
        }
    }

    /// Current forward-speed value, always in [0, MAX_SPEED]
    pub fn value(&self) -> u16 {
        self.value
    }

    /// At maximum when the top two bits of the 10-bit register are set
    pub fn at_max(&self) -> bool {
        self.value & MAX_SPEED == MAX_SPEED
    }

    /// Fully stopped
    pub fn is_stopped(&self) -> bool {
        self.value == 0
    }

    /// Add one increment unless already at maximum
    pub fn ramp_up(&mut self) {
        if !self.at_max() {
            self.value = (self.value + self.increment).min(MAX_SPEED);
        }
    }

    /// Subtract one decrement, flooring at zero
    pub fn ramp_down(&mut self) {
        self.value = self.value.saturating_sub(self.decrement);
    }

    /// Force the register to zero immediately
    pub fn clear(&mut self) {
        self.value = 0;
    }
}
