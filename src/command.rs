//! Command word decoding
//!
//! A command is a single 16-bit word: bits[15:12] select the opcode,
//! bits[11:4] carry a signed heading byte, bits[3:0] a square count.
//! The word is latched on dispatch and owned by the processor until the
//! response goes out.

/// Command category selected by bits[15:12]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Run the gyro calibration routine
    Calibrate,
    /// Move the commanded heading and square count
    Move,
    /// Move, then sound the fanfare on completion
    FanfareMove,
    /// Kick off tour playback (handled by the external tour generator)
    StartTour,
    /// Discover the y-offset from the board edge before a tour
    CalibrateY,
    /// Unrecognized opcode nibble; dispatched as a generic move
    Other(u8),
}

impl Opcode {
    /// Decode the opcode nibble of a command word
    pub fn decode(word: u16) -> Self {
        match (word >> 12) as u8 {
            0b0010 => Opcode::Calibrate,
            0b0100 => Opcode::Move,
            0b0101 => Opcode::FanfareMove,
            0b0110 => Opcode::StartTour,
            0b0111 => Opcode::CalibrateY,
            other => Opcode::Other(other),
        }
    }
}

/// A latched 16-bit command word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandWord(pub u16);

impl CommandWord {
    /// Opcode field, bits[15:12]
    pub fn opcode(&self) -> Opcode {
        Opcode::decode(self.0)
    }

    /// Signed heading byte, bits[11:4]
    pub fn heading_byte(&self) -> i8 {
        ((self.0 >> 4) & 0xFF) as u8 as i8
    }

    /// Commanded heading expanded to sub-degree resolution.
    ///
    /// The byte is shifted into the upper bits of the 12-bit heading and
    /// suffixed with 0xF when nonzero, so 0x7F expands to 0x7FF (due
    /// south) and 0x00 stays exactly north.
    pub fn heading(&self) -> i16 {
        let byte = self.heading_byte() as i16;
        let suffix = if byte != 0 { 0xF } else { 0x0 };
        (byte << 4) | suffix
    }

    /// Square count, bits[3:0]
    pub fn square_count(&self) -> u8 {
        (self.0 & 0xF) as u8
    }
}
