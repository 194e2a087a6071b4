//! Y-offset calibrator
//!
//! Discovers the robot's distance (in squares) from its start square to
//! the board edge. Runs only during the pre-tour calibration sequence:
//! the working counter goes up once per completed outward leg and comes
//! back down once per square crossed on the return. Calibration is done
//! when the counter returns to exactly zero; the discovered offset is
//! latched at the moment the board edge was reached.

/// Tracks outward/return progress during the CalibrateY sequence
#[derive(Debug, Clone, Default)]
pub struct YOffsetCalibrator {
    counter: u8,
    discovered: u8,
    decremented: bool,
}

/// Counter ceiling, matching the 4-bit square-count field
const MAX_OFFSET: u8 = 15;

impl YOffsetCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for a fresh calibration sequence
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One outward leg completed
    pub fn leg_out(&mut self) {
        if self.counter < MAX_OFFSET {
            self.counter += 1;
        }
        log::debug!("YOffsetCalibrator: outward leg {} complete", self.counter);
    }

    /// Board edge reached; latch the discovered offset
    pub fn reach_edge(&mut self) {
        self.discovered = self.counter;
        log::info!(
            "YOffsetCalibrator: board edge at {} squares from start",
            self.discovered
        );
    }

    /// One square crossed on the return leg
    pub fn leg_back(&mut self) {
        if self.counter > 0 {
            self.counter -= 1;
            self.decremented = true;
        }
        log::debug!("YOffsetCalibrator: {} squares from origin", self.counter);
    }

    /// Back at the start square after at least one return decrement
    pub fn returned_to_origin(&self) -> bool {
        self.decremented && self.counter == 0
    }

    /// Working counter value (squares between robot and start square)
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Discovered distance from the start square to the board edge
    pub fn y_offset(&self) -> u8 {
        self.discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_out_and_back() {
        let mut cal = YOffsetCalibrator::new();
        for _ in 0..4 {
            cal.leg_out();
        }
        cal.reach_edge();
        assert_eq!(cal.y_offset(), 4);
        assert!(!cal.returned_to_origin());

        for i in 0..4 {
            assert!(!cal.returned_to_origin(), "early origin at leg {}", i);
            cal.leg_back();
        }
        assert!(cal.returned_to_origin());
        // discovered offset survives the return
        assert_eq!(cal.y_offset(), 4);
    }

    #[test]
    fn test_never_negative() {
        let mut cal = YOffsetCalibrator::new();
        cal.leg_out();
        cal.leg_back();
        cal.leg_back();
        cal.leg_back();
        assert_eq!(cal.counter(), 0);
    }

    #[test]
    fn test_origin_requires_a_decrement() {
        let cal = YOffsetCalibrator::new();
        // counter is zero but nothing has come back yet
        assert!(!cal.returned_to_origin());
    }

    #[test]
    fn test_counter_caps_at_field_width() {
        let mut cal = YOffsetCalibrator::new();
        for _ in 0..20 {
            cal.leg_out();
        }
        assert_eq!(cal.counter(), 15);
    }

    #[test]
    fn test_reset() {
        let mut cal = YOffsetCalibrator::new();
        cal.leg_out();
        cal.reach_edge();
        cal.leg_back();
        cal.reset();
        assert_eq!(cal.counter(), 0);
        assert_eq!(cal.y_offset(), 0);
        assert!(!cal.returned_to_origin());
    }
}
