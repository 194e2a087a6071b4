//! Command processor finite-state machine
//!
//! Top-level sequencer for the robot: decodes the latched command word,
//! drives the speed ramp, square tracker, and y-offset calibrator, and
//! implements the command-ready/command-consumed handshake with the
//! external command source.
//!
//! All state updates happen in [`CommandProcessor::step`], one call per
//! global tick. Outputs are default-initialized at the top of every step
//! and overridden per phase, so the transition function stays total and
//! side-effect-free outside the session state it owns. Reset is
//! out-of-band via [`CommandProcessor::reset`].

use crate::command::{CommandWord, Opcode};
use crate::config::ProcessorConfig;
use crate::motion::heading::{
    aligned, heading_error, HEADING_CLOCKWISE_90, HEADING_NORTH, HEADING_SOUTH,
};
use crate::motion::{SpeedRamp, SquareTracker, YOffsetCalibrator};
use crate::sensors::SensorSnapshot;

/// Positive acknowledgment: calibration or move completed
pub const RESP_POSITIVE_ACK: u8 = 0xA5;

/// Generic acknowledgment: command dispatched
pub const RESP_ACK: u8 = 0x5A;

/// Motion phase of the command processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for a command
    #[default]
    Idle,
    /// Gyro calibration in progress
    Calibrate,
    /// Square count loaded, waiting for heading alignment
    Move,
    /// Accelerating and counting edges
    RampUp,
    /// Decelerating to a stop
    RampDown,
    /// First 90-degree clockwise turn at the board edge
    Rotate,
    /// Second 90-degree clockwise turn, facing back down the board
    Backup,
    /// Accelerating on the return leg (kept distinct from RampUp)
    RampUpReverse,
}

/// What kind of motion the current command drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MoveKind {
    /// Plain board move (includes tour legs and unrecognized opcodes)
    #[default]
    Ordinary,
    /// Board move that sounds the fanfare on completion
    Fanfare,
    /// Outward calibration leg, one square at a time, due north
    CalOutward,
    /// Return calibration leg back to the start square
    CalReturn,
}

/// Inputs sampled by one processor tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Command word, present only while the source pulses command-ready
    pub command: Option<u16>,
    /// Current sensor readings
    pub sensors: SensorSnapshot,
}

/// Outputs produced by one processor tick.
///
/// Pulse fields are true for exactly one tick; `forward_speed`,
/// `moving`, and `heading_error` are level outputs read continuously by
/// the actuator interface and heading controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutput {
    /// The presented command was accepted this tick
    pub command_consumed: bool,
    /// Response byte, pulsed with response-ready
    pub response: Option<u8>,
    /// Forward-speed value for the motor interface
    pub forward_speed: u16,
    /// Heading controller enable
    pub moving: bool,
    /// Signed heading error for the heading controller
    pub heading_error: i16,
    /// Tour playback should begin
    pub tour_start: bool,
    /// Fanfare should sound
    pub fanfare: bool,
    /// Gyro calibration should begin
    pub calibrate_gyro: bool,
    /// Y-offset discovery finished; tour may be issued
    pub tour_ready: bool,
    /// Phase after this tick, for observability
    pub phase: Phase,
}

/// Hierarchical command FSM and the session state it owns
pub struct CommandProcessor {
    config: ProcessorConfig,
    phase: Phase,
    kind: MoveKind,
    command: Option<CommandWord>,
    ramp: SpeedRamp,
    tracker: SquareTracker,
    calibrator: YOffsetCalibrator,
}

impl CommandProcessor {
    /// Create an idle processor with the given preset
    pub fn new(config: ProcessorConfig) -> Self {
        let ramp = SpeedRamp::new(&config);
        Self {
            config,
            phase: Phase::Idle,
            kind: MoveKind::Ordinary,
            command: None,
            ramp,
            tracker: SquareTracker::new(),
            calibrator: YOffsetCalibrator::new(),
        }
    }

    /// Force idle with a zeroed speed register, independent of the tick
    pub fn reset(&mut self) {
        log::debug!("CommandProcessor: reset to idle");
        self.phase = Phase::Idle;
        self.kind = MoveKind::Ordinary;
        self.command = None;
        self.ramp.clear();
        self.tracker.reset();
        self.calibrator.reset();
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Discovered y-offset, valid once tour-ready has been asserted
    pub fn y_offset(&self) -> u8 {
        self.calibrator.y_offset()
    }

    /// Rising edges counted since the last tracker load
    pub fn edges_counted(&self) -> u8 {
        self.tracker.edge_count()
    }

    /// Desired heading for the current phase and move kind
    fn desired_heading(&self) -> i16 {
        match self.phase {
            Phase::Rotate => HEADING_CLOCKWISE_90,
            Phase::Backup | Phase::RampUpReverse => HEADING_SOUTH,
            Phase::Move | Phase::RampUp | Phase::RampDown => match self.kind {
                MoveKind::CalOutward => HEADING_NORTH,
                MoveKind::CalReturn => HEADING_SOUTH,
                MoveKind::Ordinary | MoveKind::Fanfare => self
                    .command
                    .map(|cmd| cmd.heading())
                    .unwrap_or(HEADING_NORTH),
            },
            Phase::Idle | Phase::Calibrate => HEADING_NORTH,
        }
    }

    /// Load the square tracker for the current move kind
    fn load_tracker(&mut self, center_now: bool) {
        let squares = match self.kind {
            MoveKind::Ordinary | MoveKind::Fanfare => self
                .command
                .map(|cmd| cmd.square_count())
                .unwrap_or_default(),
            MoveKind::CalOutward => 1,
            MoveKind::CalReturn => self.calibrator.counter(),
        };
        self.tracker.load(squares, center_now);
    }

    /// Advance one global tick
    pub fn step(&mut self, input: &TickInput) -> TickOutput {
        let mut out = TickOutput::default();
        let snap = &input.sensors;

        let error = heading_error(snap, self.desired_heading(), &self.config);
        out.heading_error = error;

        // Edge counting runs only while the robot is in motion.
        if matches!(
            self.phase,
            Phase::RampUp | Phase::RampDown | Phase::RampUpReverse
        ) {
            let event = self.tracker.sample(snap.center);
            if event.square_crossed && self.kind == MoveKind::CalReturn {
                self.calibrator.leg_back();
            }
        }

        match self.phase {
            Phase::Idle => {
                if let Some(word) = input.command {
                    self.dispatch(CommandWord(word), snap, &mut out);
                }
            }

            Phase::Calibrate => {
                if snap.calibration_done {
                    log::info!("CommandProcessor: gyro calibration done");
                    out.response = Some(RESP_POSITIVE_ACK);
                    self.phase = Phase::Idle;
                }
            }

            Phase::Move => {
                out.moving = true;
                if aligned(error, &self.config) {
                    self.ramp.clear();
                    self.phase = Phase::RampUp;
                }
            }

            Phase::RampUp | Phase::RampUpReverse => {
                out.moving = true;
                if snap.heading_valid {
                    self.ramp.ramp_up();
                }
                if self.tracker.move_complete() {
                    if self.kind == MoveKind::Fanfare && self.phase == Phase::RampUp {
                        log::info!("CommandProcessor: fanfare move complete");
                        out.fanfare = true;
                    }
                    self.phase = Phase::RampDown;
                }
            }

            Phase::RampDown => {
                out.moving = true;
                if snap.heading_valid {
                    self.ramp.ramp_down();
                }
                if self.ramp.is_stopped() {
                    self.finish_ramp_down(snap, &mut out);
                }
            }

            Phase::Rotate => {
                out.moving = true;
                if aligned(error, &self.config) {
                    log::debug!("CommandProcessor: first quarter turn aligned");
                    self.phase = Phase::Backup;
                }
            }

            Phase::Backup => {
                out.moving = true;
                if aligned(error, &self.config) {
                    log::debug!(
                        "CommandProcessor: facing back, returning {} squares",
                        self.calibrator.counter()
                    );
                    self.kind = MoveKind::CalReturn;
                    self.ramp.clear();
                    self.load_tracker(snap.center);
                    self.phase = Phase::RampUpReverse;
                }
            }
        }

        out.forward_speed = self.ramp.value();
        out.phase = self.phase;
        out
    }

    /// Accept a command word in the idle phase
    fn dispatch(&mut self, cmd: CommandWord, snap: &SensorSnapshot, out: &mut TickOutput) {
        out.command_consumed = true;
        let opcode = cmd.opcode();
        log::info!("CommandProcessor: dispatch {:?} (0x{:04X})", opcode, cmd.0);

        match opcode {
            Opcode::StartTour => {
                out.tour_start = true;
                out.response = Some(RESP_ACK);
            }
            Opcode::Calibrate => {
                out.calibrate_gyro = true;
                self.phase = Phase::Calibrate;
            }
            Opcode::CalibrateY => {
                self.calibrator.reset();
                self.kind = MoveKind::CalOutward;
                self.command = Some(cmd);
                self.load_tracker(snap.center);
                self.phase = Phase::Move;
            }
            Opcode::Move | Opcode::FanfareMove | Opcode::Other(_) => {
                // Unrecognized opcodes deliberately take the generic move path.
                if let Opcode::Other(nibble) = opcode {
                    log::warn!(
                        "CommandProcessor: unknown opcode {:#06b}, treating as move",
                        nibble
                    );
                }
                self.kind = if opcode == Opcode::FanfareMove {
                    MoveKind::Fanfare
                } else {
                    MoveKind::Ordinary
                };
                self.command = Some(cmd);
                self.load_tracker(snap.center);
                self.phase = Phase::Move;
            }
        }
    }

    /// Branch at the end of a ramp-down, once the robot has stopped
    fn finish_ramp_down(&mut self, snap: &SensorSnapshot, out: &mut TickOutput) {
        match self.kind {
            MoveKind::Ordinary | MoveKind::Fanfare => {
                log::info!("CommandProcessor: move complete");
                out.response = Some(RESP_POSITIVE_ACK);
                self.command = None;
                self.phase = Phase::Idle;
            }
            MoveKind::CalOutward => {
                self.calibrator.leg_out();
                if SquareTracker::off_board(self.ramp.is_stopped(), snap.center) {
                    self.calibrator.reach_edge();
                    self.phase = Phase::Rotate;
                } else {
                    self.load_tracker(snap.center);
                    self.phase = Phase::Move;
                }
            }
            MoveKind::CalReturn => {
                if self.calibrator.returned_to_origin() {
                    log::info!(
                        "CommandProcessor: returned to origin, y-offset {}",
                        self.calibrator.y_offset()
                    );
                    out.tour_ready = true;
                    out.response = Some(RESP_POSITIVE_ACK);
                    self.command = None;
                    self.phase = Phase::Idle;
                } else {
                    // Stopped short of the origin; finish the remaining squares.
                    log::warn!(
                        "CommandProcessor: return stopped {} squares short",
                        self.calibrator.counter()
                    );
                    self.load_tracker(snap.center);
                    self.phase = Phase::Move;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> CommandProcessor {
        CommandProcessor::new(ProcessorConfig::fast_sim())
    }

    fn quiet(heading: i16) -> SensorSnapshot {
        SensorSnapshot {
            heading,
            heading_valid: true,
            ..Default::default()
        }
    }

    fn tick(
        proc: &mut CommandProcessor,
        command: Option<u16>,
        sensors: SensorSnapshot,
    ) -> TickOutput {
        proc.step(&TickInput { command, sensors })
    }

    #[test]
    fn test_start_tour_stays_idle() {
        let mut proc = processor();
        let out = tick(&mut proc, Some(0x6000), quiet(0));
        assert!(out.command_consumed);
        assert!(out.tour_start);
        assert_eq!(out.response, Some(RESP_ACK));
        assert_eq!(proc.phase(), Phase::Idle);
    }

    #[test]
    fn test_calibrate_waits_for_done() {
        let mut proc = processor();
        let out = tick(&mut proc, Some(0x2000), quiet(0));
        assert!(out.command_consumed);
        assert!(out.calibrate_gyro);
        assert_eq!(proc.phase(), Phase::Calibrate);

        // Holds while the gyro driver works
        for _ in 0..10 {
            let out = tick(&mut proc, None, quiet(0));
            assert_eq!(out.response, None);
        }

        let mut snap = quiet(0);
        snap.calibration_done = true;
        let out = tick(&mut proc, None, snap);
        assert_eq!(out.response, Some(RESP_POSITIVE_ACK));
        assert_eq!(proc.phase(), Phase::Idle);
    }

    #[test]
    fn test_unknown_opcode_becomes_move() {
        let mut proc = processor();
        let out = tick(&mut proc, Some(0xF012), quiet(0));
        assert!(out.command_consumed);
        assert_eq!(proc.phase(), Phase::Move);
    }

    #[test]
    fn test_command_ready_ignored_mid_sequence() {
        let mut proc = processor();
        tick(&mut proc, Some(0x4002), quiet(0));
        assert_eq!(proc.phase(), Phase::Move);

        // A second command mid-sequence must not be consumed
        let out = tick(&mut proc, Some(0x6000), quiet(0));
        assert!(!out.command_consumed);
        assert!(!out.tour_start);
    }

    #[test]
    fn test_motion_gated_on_alignment() {
        let mut proc = processor();
        // Due-south move; actual heading still north
        tick(&mut proc, Some(0x47F1), quiet(0));
        assert_eq!(proc.phase(), Phase::Move);

        for _ in 0..5 {
            let out = tick(&mut proc, None, quiet(0));
            assert_eq!(out.forward_speed, 0);
            assert_eq!(proc.phase(), Phase::Move);
        }

        // Heading converged: ramp-up may begin
        let out = tick(&mut proc, None, quiet(0x7FF));
        assert_eq!(proc.phase(), Phase::RampUp);
        assert!(out.moving);
    }

    #[test]
    fn test_move_counts_edges_and_responds() {
        let mut proc = processor();
        // North move of two squares; already aligned
        tick(&mut proc, Some(0x4002), quiet(0));
        tick(&mut proc, None, quiet(0));
        assert_eq!(proc.phase(), Phase::RampUp);

        // Feed four rising edges (two per square)
        let mut responded = None;
        let mut center = false;
        for _ in 0..4 {
            center = !center;
            let mut snap = quiet(0);
            snap.center = center;
            tick(&mut proc, None, snap);
            center = !center;
            let mut snap = quiet(0);
            snap.center = center;
            tick(&mut proc, None, snap);
        }
        assert_eq!(proc.phase(), Phase::RampDown);

        // Ramp down to a stop
        for _ in 0..64 {
            let out = tick(&mut proc, None, quiet(0));
            if let Some(resp) = out.response {
                responded = Some(resp);
                break;
            }
        }
        assert_eq!(responded, Some(RESP_POSITIVE_ACK));
        assert_eq!(proc.phase(), Phase::Idle);
    }

    #[test]
    fn test_fanfare_pulse_on_completion() {
        let mut proc = processor();
        tick(&mut proc, Some(0x5001), quiet(0));
        tick(&mut proc, None, quiet(0));

        // Two rising edges complete the single square; the fanfare pulse
        // fires on the completing edge
        let mut fanfare_seen = false;
        for i in 0..4 {
            let mut snap = quiet(0);
            snap.center = i % 2 == 0;
            let out = tick(&mut proc, None, snap);
            fanfare_seen |= out.fanfare;
        }
        assert!(fanfare_seen);
    }

    #[test]
    fn test_speed_bounded_throughout() {
        let mut proc = processor();
        tick(&mut proc, Some(0x400F), quiet(0));
        for i in 0..500 {
            let mut snap = quiet(0);
            snap.center = (i / 3) % 2 == 0;
            let out = tick(&mut proc, None, snap);
            assert!(out.forward_speed <= crate::config::MAX_SPEED);
        }
    }

    #[test]
    fn test_reset_forces_idle() {
        let mut proc = processor();
        tick(&mut proc, Some(0x4003), quiet(0));
        tick(&mut proc, None, quiet(0));
        tick(&mut proc, None, quiet(0));
        assert_ne!(proc.phase(), Phase::Idle);

        proc.reset();
        assert_eq!(proc.phase(), Phase::Idle);
        let out = tick(&mut proc, None, quiet(0));
        assert_eq!(out.forward_speed, 0);
    }

    /// Drive a full CalibrateY sequence with hand-rolled sensor inputs:
    /// two squares to the board edge, rotate, return.
    #[test]
    fn test_calibrate_y_sequence() {
        let mut proc = processor();
        tick(&mut proc, Some(0x7000), quiet(0));
        assert_eq!(proc.phase(), Phase::Move);

        // Leg 1: aligned north immediately, two edges, stop off the line
        tick(&mut proc, None, quiet(0));
        assert_eq!(proc.phase(), Phase::RampUp);
        for i in 0..4 {
            let mut snap = quiet(0);
            snap.center = i % 2 == 1;
            tick(&mut proc, None, snap);
        }
        assert_eq!(proc.phase(), Phase::RampDown);
        let mut guard = 0;
        while proc.phase() == Phase::RampDown {
            tick(&mut proc, None, quiet(0));
            guard += 1;
            assert!(guard < 64);
        }
        // Stopped with center low: not off board, next leg
        assert_eq!(proc.phase(), Phase::Move);

        // Leg 2: two edges, then hold the center sensor high through the
        // stop (the painted border region off the board edge)
        tick(&mut proc, None, quiet(0));
        assert_eq!(proc.phase(), Phase::RampUp);
        for i in 0..4 {
            let mut snap = quiet(0);
            snap.center = i % 2 == 1;
            tick(&mut proc, None, snap);
        }
        assert_eq!(proc.phase(), Phase::RampDown);
        let mut guard = 0;
        while proc.phase() == Phase::RampDown {
            let mut snap = quiet(0);
            snap.center = true;
            tick(&mut proc, None, snap);
            guard += 1;
            assert!(guard < 64);
        }
        assert_eq!(proc.phase(), Phase::Rotate);
        assert_eq!(proc.y_offset(), 2);

        // Quarter turn, then face south
        tick(&mut proc, None, quiet(HEADING_CLOCKWISE_90));
        assert_eq!(proc.phase(), Phase::Backup);
        tick(&mut proc, None, quiet(HEADING_SOUTH));
        assert_eq!(proc.phase(), Phase::RampUpReverse);

        // Return: four rising edges (two squares)
        let mut tour_ready = false;
        let mut response = None;
        for _ in 0..4 {
            let mut snap = quiet(HEADING_SOUTH);
            snap.center = false;
            tick(&mut proc, None, snap);
            snap.center = true;
            tick(&mut proc, None, snap);
        }
        let mut guard = 0;
        loop {
            let out = tick(&mut proc, None, quiet(HEADING_SOUTH));
            if out.tour_ready {
                tour_ready = true;
                response = out.response;
                break;
            }
            guard += 1;
            assert!(guard < 128);
        }
        assert!(tour_ready);
        assert_eq!(response, Some(RESP_POSITIVE_ACK));
        assert_eq!(proc.phase(), Phase::Idle);
        assert_eq!(proc.y_offset(), 2);
    }
}
