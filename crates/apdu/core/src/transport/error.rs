//! Error types specific to packet transports

use thiserror::Error;

/// Transport error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// The handle was closed before the operation
    #[error("Device handle is closed")]
    Closed,

    /// The device wrote fewer bytes than a full packet
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted by the device
        written: usize,
        /// Bytes that should have been written
        expected: usize,
    },

    /// No packet arrived in time
    #[error("Operation timed out")]
    Timeout,

    /// I/O failure reported by the host HID layer
    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Create an I/O error from any displayable backend error
    pub fn io<E: std::fmt::Display>(error: E) -> Self {
        Self::Io(error.to_string())
    }

    /// Check if this is a timeout error
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
