//! AshvaCtrl demo - runs the command processor against the simulation rig
//!
//! Loads an optional TOML configuration, then drives a representative
//! session: gyro calibration, a couple of board moves, and the full
//! y-offset discovery routine.

use ashva_ctrl::processor::{RESP_ACK, RESP_POSITIVE_ACK};
use ashva_ctrl::sim::SimRig;
use ashva_ctrl::{AppConfig, Result};
use std::env;

/// Parse config path from command line arguments.
///
/// Supports `ashva-ctrl <path>` and `ashva-ctrl --config <path>`;
/// defaults apply when no path is given.
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    None
}

fn describe(resp: u8) -> &'static str {
    match resp {
        RESP_POSITIVE_ACK => "positive ack",
        RESP_ACK => "ack",
        _ => "unknown",
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match parse_config_path() {
        Some(path) => {
            log::info!("Using config: {}", path);
            AppConfig::from_file(&path)?
        }
        None => {
            log::info!("Using built-in simulation defaults");
            AppConfig::sim_defaults()
        }
    };

    let mut rig = SimRig::new(&config, 2.5, 0.5);
    log::info!(
        "Board: {}x{} squares, robot at {:?}",
        config.simulation.board_squares,
        config.simulation.board_squares,
        rig.position()
    );

    // Gyro calibration first, as any session would start
    rig.issue(0x2000);
    match rig.run_until_response(10_000) {
        Some(out) => log::info!(
            "calibrate: {} after {} ticks",
            describe(out.response.unwrap_or_default()),
            rig.ticks()
        ),
        None => log::error!("calibrate: no response within bound"),
    }

    // A two-square move north, then a fanfare move back south
    for &cmd in &[0x4002u16, 0x57F2] {
        rig.issue(cmd);
        match rig.run_until_response(100_000) {
            Some(out) => log::info!(
                "move 0x{:04X}: {}, position {:?}",
                cmd,
                describe(out.response.unwrap_or_default()),
                rig.position()
            ),
            None => log::error!("move 0x{:04X}: no response within bound", cmd),
        }
    }

    // Y-offset discovery from wherever the moves left us
    rig.issue(0x7000);
    match rig.run_until_response(500_000) {
        Some(out) if out.tour_ready => log::info!(
            "calibrate-y: tour ready, y-offset {} squares, position {:?}",
            rig.processor().y_offset(),
            rig.position()
        ),
        Some(_) => log::warn!("calibrate-y: response without tour-ready"),
        None => log::error!("calibrate-y: no response within bound"),
    }

    Ok(())
}
