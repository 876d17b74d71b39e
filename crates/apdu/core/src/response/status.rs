//! Status word definitions for APDU responses

use std::fmt;

use tracing::Level;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Check if the user declined the operation on the device (69 85)
    pub const fn is_user_rejected(&self) -> bool {
        self.sw1 == 0x69 && self.sw2 == 0x85
    }

    /// Check if this status word indicates wrong length (67 00)
    pub const fn is_wrong_length(&self) -> bool {
        self.sw1 == 0x67 && self.sw2 == 0x00
    }

    /// Check if the application does not know the instruction (6D 00)
    pub const fn is_instruction_not_supported(&self) -> bool {
        self.sw1 == 0x6D && self.sw2 == 0x00
    }

    /// Check if the application does not know the class (6E 00)
    ///
    /// Usually means the wrong application is open on the device.
    pub const fn is_class_not_supported(&self) -> bool {
        self.sw1 == 0x6E && self.sw2 == 0x00
    }

    /// Get the appropriate tracing level for this status word
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() {
            Level::DEBUG
        } else if self.is_user_rejected() {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x64, 0x00) => "Execution error",
            (0x67, 0x00) => "Wrong length",
            (0x69, 0x82) => "Empty buffer",
            (0x69, 0x83) => "Output buffer too small",
            (0x69, 0x84) => "Data invalid",
            (0x69, 0x85) => "Conditions not satisfied (rejected by user)",
            (0x69, 0x86) => "Command not allowed",
            (0x6A, 0x80) => "Bad key handle",
            (0x6B, 0x00) => "Invalid P1/P2",
            (0x6D, 0x00) => "Instruction not supported",
            (0x6E, 0x00) => "Class not supported (is the application open?)",
            (0x6F, 0x00) => "Unknown error",
            (0x6F, 0x01) => "Sign/verify error",
            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// Execution error (64 00)
    pub const EXECUTION_ERROR: StatusWord = StatusWord::new(0x64, 0x00);

    /// Wrong length (67 00)
    pub const WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);

    /// Empty buffer (69 82)
    pub const EMPTY_BUFFER: StatusWord = StatusWord::new(0x69, 0x82);

    /// Output buffer too small (69 83)
    pub const OUTPUT_BUFFER_TOO_SMALL: StatusWord = StatusWord::new(0x69, 0x83);

    /// Data invalid (69 84)
    pub const DATA_INVALID: StatusWord = StatusWord::new(0x69, 0x84);

    /// Conditions not satisfied, the user rejected the request (69 85)
    pub const CONDITIONS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x85);

    /// Command not allowed (69 86)
    pub const COMMAND_NOT_ALLOWED: StatusWord = StatusWord::new(0x69, 0x86);

    /// Bad key handle (6A 80)
    pub const BAD_KEY_HANDLE: StatusWord = StatusWord::new(0x6A, 0x80);

    /// Invalid P1/P2 (6B 00)
    pub const INVALID_P1P2: StatusWord = StatusWord::new(0x6B, 0x00);

    /// Instruction not supported (6D 00)
    pub const INS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6D, 0x00);

    /// Class not supported (6E 00)
    pub const CLA_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6E, 0x00);

    /// Unknown error (6F 00)
    pub const UNKNOWN: StatusWord = StatusWord::new(0x6F, 0x00);

    /// Sign/verify error (6F 01)
    pub const SIGN_VERIFY_ERROR: StatusWord = StatusWord::new(0x6F, 0x01);
}
