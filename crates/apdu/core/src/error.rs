//! Core error type for all APDU operations
//!
//! Every failure of an exchange lands in one of three buckets: the transport
//! could not move packets, the packets did not form a valid frame, or the
//! device answered with a non-success status word.

use crate::frame::FramingError;
use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Result type for APDU operations
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    // Transport related errors
    //
    /// Packet I/O failed or timed out
    #[error(transparent)]
    Transport(#[from] TransportError),

    //
    // Framing related errors
    //
    /// The packet sequence could not be reassembled
    #[error(transparent)]
    Framing(#[from] FramingError),

    //
    // Response related errors
    //
    /// Device answered with a non-success status word
    #[error("Device error {status}: {}", .status.description())]
    Status {
        /// Status word returned by the device
        status: StatusWord,
    },

    //
    // Command related errors
    //
    /// Command data does not fit a single short APDU
    #[error("Command data too long: {0} bytes (max {max})", max = crate::command::MAX_DATA_LEN)]
    DataTooLong(usize),

    /// Invalid command length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),
}

impl Error {
    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Status word carried by this error, if the device rejected the command
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a timeout while waiting for the device
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout))
    }
}
