use ledger_apdu_core::{FramingError, StatusWord, TransportError};

/// Result type for Cosmos application operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cosmos application operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Packet I/O failed or timed out
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Malformed packet sequence or response
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// The device refused the command
    #[error("Device error {status}: {}", .status.description())]
    Device {
        /// Status word returned by the device
        status: StatusWord,
    },

    /// No device is attached
    #[error("No Ledger device found")]
    NotFound,

    /// Well framed response with an unexpected payload
    #[error("Invalid response: {0}")]
    InvalidResponse(&'static str),

    /// Message needs more chunks than P2 can announce
    #[error("Message too large: {len} bytes (max {max})")]
    MessageTooLarge {
        /// Length of the rejected message
        len: usize,
        /// Longest accepted message
        max: usize,
    },

    /// Seed is not a valid secp256k1 private key
    #[error("Invalid signing key seed")]
    InvalidSeed,

    /// HID backend failure during discovery
    #[cfg(feature = "hid")]
    #[error(transparent)]
    Hid(ledger_apdu_transport_hid::HidError),

    /// Command could not be serialized
    #[error("Invalid command: {0}")]
    Command(ledger_apdu_core::Error),
}

impl Error {
    /// Status word of a device refusal
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Device { status } => Some(*status),
            _ => None,
        }
    }

    /// Check whether the user declined the operation on the device
    pub const fn is_user_rejected(&self) -> bool {
        matches!(self, Self::Device { status } if status.is_user_rejected())
    }

    /// Check whether the device did not answer in time
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout))
    }
}

impl From<ledger_apdu_core::Error> for Error {
    fn from(error: ledger_apdu_core::Error) -> Self {
        use ledger_apdu_core::Error as Core;

        match error {
            Core::Transport(e) => Self::Transport(e),
            Core::Framing(e) => Self::Framing(e),
            Core::Status { status } => Self::Device { status },
            other => Self::Command(other),
        }
    }
}

#[cfg(feature = "hid")]
impl From<ledger_apdu_transport_hid::HidError> for Error {
    fn from(error: ledger_apdu_transport_hid::HidError) -> Self {
        use ledger_apdu_transport_hid::HidError;

        match error {
            HidError::NoDevicesFound | HidError::DeviceNotFound(_) => Self::NotFound,
            other => Self::Hid(other),
        }
    }
}
