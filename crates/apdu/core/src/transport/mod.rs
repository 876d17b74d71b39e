//! Packet transport traits
//!
//! This module provides the boundary to the host HID layer. A transport only
//! moves fixed-size packets; it knows nothing about frames or APDUs.

pub mod error;

use std::fmt;
use std::time::Duration;

pub use error::TransportError;
use tracing::{debug, trace};

/// Size of one HID report exchanged with the device
pub const PACKET_SIZE: usize = 64;

/// One fixed-size HID packet
pub type Packet = [u8; PACKET_SIZE];

/// Trait for packet transports
///
/// Both calls block. `read_packet` must give up after `timeout` and return
/// [`TransportError::Timeout`] when nothing arrived.
pub trait PacketTransport: Send + fmt::Debug {
    /// Write one packet to the device
    fn write_packet(&mut self, packet: &Packet) -> Result<(), TransportError> {
        trace!(packet = %hex::encode(packet), "Writing packet");
        let result = self.do_write_packet(packet);
        if let Err(e) = &result {
            debug!(error = ?e, "Transport error during write");
        }
        result
    }

    /// Read one packet from the device, waiting at most `timeout`
    fn read_packet(&mut self, timeout: Duration) -> Result<Packet, TransportError> {
        let result = self.do_read_packet(timeout);
        match &result {
            Ok(packet) => {
                trace!(packet = %hex::encode(packet), "Read packet");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during read");
            }
        }
        result
    }

    /// Internal implementation of write_packet
    /// This is the method that concrete implementations should override
    fn do_write_packet(&mut self, packet: &Packet) -> Result<(), TransportError>;

    /// Internal implementation of read_packet
    /// This is the method that concrete implementations should override
    fn do_read_packet(&mut self, timeout: Duration) -> Result<Packet, TransportError>;

    /// Check if the transport still holds an open device handle
    fn is_connected(&self) -> bool;

    /// Release the device handle
    ///
    /// Further reads and writes fail with [`TransportError::Closed`]. Closing
    /// twice is not an error.
    fn close(&mut self) -> Result<(), TransportError>;
}

impl<T: PacketTransport + ?Sized> PacketTransport for Box<T> {
    fn do_write_packet(&mut self, packet: &Packet) -> Result<(), TransportError> {
        (**self).do_write_packet(packet)
    }

    fn do_read_packet(&mut self, timeout: Duration) -> Result<Packet, TransportError> {
        (**self).do_read_packet(timeout)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}

#[cfg(test)]
pub(crate) use mock::MockTransport;
