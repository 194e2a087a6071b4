//! AshvaCtrl - Command processor for a board-traversing robot
//!
//! The core is [`processor::CommandProcessor`]: a hierarchical FSM that
//! decodes 16-bit command words, sequences ramp-up/cruise/ramp-down
//! motion phases, computes the heading-error signal for the downstream
//! heading controller, counts traveled squares from line-sensor edges,
//! and discovers the robot's y-offset from the board edge before a tour.
//!
//! The [`sim`] module provides a closed-loop simulation rig (board
//! geometry, line sensors, heading plant) for hardware-free testing.

pub mod command;
pub mod config;
pub mod error;
pub mod motion;
pub mod processor;
pub mod sensors;
pub mod sim;

// Re-export commonly used types
pub use command::{CommandWord, Opcode};
pub use config::{AppConfig, ProcessorConfig};
pub use error::{AshvaError, Result};
pub use processor::{CommandProcessor, Phase, TickInput, TickOutput};
pub use sensors::SensorSnapshot;
