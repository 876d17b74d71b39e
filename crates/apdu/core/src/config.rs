//! Configuration options for APDU exchanges

use std::time::Duration;

use crate::frame::DEFAULT_CHANNEL;

/// Default time allowed for the device to answer one exchange
///
/// Signing waits on the user pressing buttons, so this is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration options for a framed executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Upper bound for reading the complete response of one exchange
    pub timeout: Duration,

    /// HID channel identifier stamped on every packet
    pub channel: u16,
}

impl ExchangeConfig {
    /// Set the exchange timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the channel identifier
    pub const fn with_channel(mut self, channel: u16) -> Self {
        self.channel = channel;
        self
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            channel: DEFAULT_CHANNEL,
        }
    }
}
