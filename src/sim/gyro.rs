//! Gyro and heading-plant model
//!
//! Stands in for the gyro driver, its calibration electronics, and the
//! downstream heading controller: each tick the plant cancels a
//! configured fraction of the processor's heading-error output, which is
//! exactly what a well-tuned controller converging on zero error looks
//! like from the processor's side.

use crate::config::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// First-order heading plant plus calibration timer
pub struct GyroModel {
    heading: f32,
    gain: f32,
    noise: f32,
    cal_remaining: Option<u32>,
    cal_ticks: u32,
    calibrated: bool,
    rng: Option<StdRng>,
}

impl GyroModel {
    pub fn new(config: &SimulationConfig) -> Self {
        // Seed 0 selects a deterministic, noise-free run
        let rng = (config.random_seed != 0 && config.heading_noise > 0.0)
            .then(|| StdRng::seed_from_u64(config.random_seed));
        Self {
            heading: 0.0,
            gain: config.heading_gain,
            noise: config.heading_noise,
            cal_remaining: None,
            cal_ticks: config.calibration_ticks,
            calibrated: false,
            rng,
        }
    }

    /// Current heading sample, signed 12-bit range
    pub fn heading(&self) -> i16 {
        self.heading.round() as i16
    }

    /// Calibration routine has finished
    pub fn calibration_done(&self) -> bool {
        self.calibrated
    }

    /// Begin the calibration routine
    pub fn start_calibration(&mut self) {
        log::debug!("GyroModel: calibration started ({} ticks)", self.cal_ticks);
        self.calibrated = false;
        self.cal_remaining = Some(self.cal_ticks);
    }

    /// Advance one tick.
    ///
    /// `error` is the processor's heading-error output; the plant acts
    /// on it only while the heading controller is enabled (`moving`).
    pub fn advance(&mut self, error: i16, moving: bool) {
        if moving {
            self.heading -= self.gain * error as f32;
        }
        if let Some(rng) = self.rng.as_mut() {
            self.heading += rng.gen_range(-self.noise..=self.noise);
        }
        if let Some(remaining) = self.cal_remaining {
            if remaining <= 1 {
                log::debug!("GyroModel: calibration done");
                self.cal_remaining = None;
                self.calibrated = true;
            } else {
                self.cal_remaining = Some(remaining - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEADING_THRESHOLD;

    fn gyro() -> GyroModel {
        GyroModel::new(&SimulationConfig::default())
    }

    #[test]
    fn test_converges_on_error() {
        let mut gyro = gyro();
        let desired = 0x7FF;
        for _ in 0..200 {
            let error = gyro.heading().wrapping_sub(desired);
            gyro.advance(error, true);
        }
        let final_error = (gyro.heading() - desired).unsigned_abs();
        assert!(final_error < HEADING_THRESHOLD, "error {}", final_error);
    }

    #[test]
    fn test_heading_frozen_when_not_moving() {
        let mut gyro = gyro();
        gyro.advance(0x100, false);
        assert_eq!(gyro.heading(), 0);
    }

    #[test]
    fn test_calibration_timer() {
        let mut gyro = gyro();
        assert!(!gyro.calibration_done());
        gyro.start_calibration();
        for _ in 0..31 {
            gyro.advance(0, false);
            assert!(!gyro.calibration_done());
        }
        gyro.advance(0, false);
        assert!(gyro.calibration_done());
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let config = SimulationConfig {
            heading_noise: 4.0,
            random_seed: 7,
            ..Default::default()
        };
        let mut a = GyroModel::new(&config);
        let mut b = GyroModel::new(&config);
        for _ in 0..50 {
            a.advance(0, false);
            b.advance(0, false);
        }
        assert_eq!(a.heading(), b.heading());
    }
}
