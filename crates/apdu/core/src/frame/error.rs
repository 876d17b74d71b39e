//! Error types specific to HID framing

use thiserror::Error;

/// Error raised when a packet sequence cannot form a valid message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Packet arrived on another channel
    #[error("Channel mismatch: expected {expected:#06x}, got {actual:#06x}")]
    ChannelMismatch {
        /// Channel the decoder listens on
        expected: u16,
        /// Channel found in the packet
        actual: u16,
    },

    /// Packet does not carry APDU traffic
    #[error("Unexpected packet tag: {0:#04x}")]
    UnexpectedTag(u8),

    /// Sequence index skipped or repeated
    #[error("Out of order packet: expected sequence {expected}, got {actual}")]
    OutOfOrder {
        /// Sequence index the decoder waits for
        expected: u16,
        /// Sequence index found in the packet
        actual: u16,
    },

    /// Message does not fit the two byte length field
    #[error("Message too large for framing: {0} bytes")]
    PayloadTooLarge(usize),

    /// Packet received after the message was already complete
    #[error("Packet received after message completion")]
    AlreadyComplete,

    /// Reassembled response cannot hold a status word
    #[error("Response too short for a status word: {0} bytes")]
    MissingStatusWord(usize),
}
