//! Closed-loop simulation rig
//!
//! Wires the command processor to the board and gyro models: processor
//! outputs drive the plant, plant state feeds back as the next tick's
//! sensor snapshot. One `tick()` is one global timing tick.

use crate::config::{AppConfig, SimulationConfig};
use crate::processor::{CommandProcessor, TickInput, TickOutput};
use crate::sensors::SensorSnapshot;
use crate::sim::{Board, GyroModel};

/// Full closed-loop rig: processor, board, gyro, robot pose
pub struct SimRig {
    processor: CommandProcessor,
    board: Board,
    gyro: GyroModel,
    sim: SimulationConfig,
    x: f32,
    y: f32,
    /// Vertical guide line the robot follows
    guide_x: f32,
    ticks: u64,
}

impl SimRig {
    /// Build a rig with the robot parked on the square center (x, y)
    pub fn new(config: &AppConfig, start_x: f32, start_y: f32) -> Self {
        let board = Board::new(config.simulation.board_squares, config.simulation.line_width);
        Self {
            processor: CommandProcessor::new(config.processor.clone()),
            board,
            gyro: GyroModel::new(&config.simulation),
            sim: config.simulation.clone(),
            x: start_x,
            y: start_y,
            guide_x: start_x,
            ticks: 0,
        }
    }

    /// Robot position in square units
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Current gyro heading
    pub fn heading(&self) -> i16 {
        self.gyro.heading()
    }

    /// Ticks elapsed since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    /// One tick with a command presented (command-ready pulse)
    pub fn issue(&mut self, word: u16) -> TickOutput {
        self.step(Some(word))
    }

    /// One tick with no command presented
    pub fn tick(&mut self) -> TickOutput {
        self.step(None)
    }

    /// Tick until the processor pulses a response, bounded by `max_ticks`.
    ///
    /// Returns `None` on timeout, the supervisory failure mode of the
    /// external harness.
    pub fn run_until_response(&mut self, max_ticks: u64) -> Option<TickOutput> {
        for _ in 0..max_ticks {
            let out = self.tick();
            if out.response.is_some() {
                return Some(out);
            }
        }
        None
    }

    fn step(&mut self, command: Option<u16>) -> TickOutput {
        let mut sensors = SensorSnapshot {
            heading: self.gyro.heading(),
            heading_valid: true,
            calibration_done: self.gyro.calibration_done(),
            ..Default::default()
        };
        self.board.sense(&mut sensors, self.x, self.y, self.guide_x);

        let out = self.processor.step(&TickInput { command, sensors });

        if out.calibrate_gyro {
            self.gyro.start_calibration();
        }
        self.gyro.advance(out.heading_error, out.moving);

        // Advance the pose along the current heading
        let distance = out.forward_speed as f32 * self.sim.distance_per_tick;
        if distance > 0.0 {
            let theta = self.gyro.heading() as f32 / 4096.0 * std::f32::consts::TAU;
            self.x += distance * theta.sin();
            self.y += distance * theta.cos();
        }

        self.ticks += 1;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{Phase, RESP_POSITIVE_ACK};

    fn rig_at(start_y: f32) -> SimRig {
        SimRig::new(&AppConfig::sim_defaults(), 2.5, start_y)
    }

    #[test]
    fn test_calibrate_round_trip() {
        let mut rig = rig_at(0.5);
        let out = rig.issue(0x2000);
        assert!(out.command_consumed);

        let out = rig.run_until_response(200).expect("calibration timed out");
        assert_eq!(out.response, Some(RESP_POSITIVE_ACK));
        assert_eq!(rig.processor().phase(), Phase::Idle);
    }

    #[test]
    fn test_single_square_move_north() {
        let mut rig = rig_at(0.5);
        rig.issue(0x4001);
        let out = rig.run_until_response(5_000).expect("move timed out");
        assert_eq!(out.response, Some(RESP_POSITIVE_ACK));

        let (_, y) = rig.position();
        assert!((y - 1.5).abs() < 0.5, "ended at y={}", y);
    }

    #[test]
    fn test_heading_frozen_while_idle() {
        let mut rig = rig_at(0.5);
        for _ in 0..50 {
            rig.tick();
        }
        assert_eq!(rig.heading(), 0);
    }
}
