//! Executor for APDU command execution
//!
//! This module provides the executor that combines a packet transport with the
//! HID frame codec to run one command and wait for its response.

use std::fmt;
use std::time::Instant;

use tracing::{Level, debug, info, instrument, trace, warn};

use crate::command::{ApduCommand, Command};
use crate::config::ExchangeConfig;
use crate::frame::FrameCodec;
use crate::response::Response;
use crate::transport::{PacketTransport, TransportError};
use crate::{Error, Result};

/// Trait for APDU command execution
pub trait Executor: Send + fmt::Debug {
    /// Send a command and wait for the complete response
    ///
    /// The response is returned whatever its status word; use
    /// [`Executor::execute`] to turn refusals into errors.
    #[instrument(level = "trace", skip_all, fields(ins = command.ins, p1 = command.p1, p2 = command.p2))]
    fn exchange(&mut self, command: &Command) -> Result<Response> {
        let response = self.do_exchange(command);
        match &response {
            Ok(response) => {
                trace!(status = %response.status(), "Received response");
            }
            Err(err) => {
                debug!(error = ?err, "Error during exchange");
            }
        }
        response
    }

    /// Internal implementation of exchange
    fn do_exchange(&mut self, command: &Command) -> Result<Response>;

    /// Execute a typed APDU command
    ///
    /// Non-success status words become [`Error::Status`] before the command
    /// gets to parse the payload.
    fn execute<C: ApduCommand>(&mut self, command: &C) -> core::result::Result<C::Success, C::Error> {
        let response = self.exchange(&command.to_command())?;
        if !response.is_success() {
            let status = response.status();
            if status.tracing_level() == Level::INFO {
                info!(%status, description = status.description(), "Command declined by user");
            } else {
                warn!(%status, description = status.description(), "Command refused");
            }
            return Err(Error::Status { status }.into());
        }
        C::parse_response(response)
    }

    /// Check whether the device handle is still open
    fn is_open(&self) -> bool;

    /// Release the device handle
    fn close(&mut self) -> Result<()>;
}

/// Executor running commands over a framed packet transport
#[derive(Debug)]
pub struct FramedExecutor<T: PacketTransport> {
    /// The transport used for communication
    transport: T,
    /// Frame codec for the configured channel
    codec: FrameCodec,
    /// Exchange configuration
    config: ExchangeConfig,
}

impl<T: PacketTransport> FramedExecutor<T> {
    /// Create a new executor with default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExchangeConfig::default())
    }

    /// Create a new executor with the given configuration
    pub const fn with_config(transport: T, config: ExchangeConfig) -> Self {
        Self {
            transport,
            codec: FrameCodec::new(config.channel),
            config,
        }
    }

    /// Get the exchange configuration
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn read_message(&mut self) -> Result<Response> {
        // A timeout too large for Instant never expires
        let deadline = Instant::now().checked_add(self.config.timeout);
        let mut decoder = self.codec.decoder();

        loop {
            let remaining = deadline.map_or(self.config.timeout, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                return Err(TransportError::Timeout.into());
            }

            let packet = self.transport.read_packet(remaining)?;
            if let Some(message) = decoder.push(&packet)? {
                return Ok(Response::from_bytes(&message)?);
            }
        }
    }
}

impl<T: PacketTransport> Executor for FramedExecutor<T> {
    fn do_exchange(&mut self, command: &Command) -> Result<Response> {
        let apdu = command.to_bytes()?;
        if !self.transport.is_connected() {
            return Err(TransportError::Closed.into());
        }

        let packets = self.codec.encode(&apdu)?;
        trace!(
            command = %hex::encode(&apdu),
            packets = packets.len(),
            "Sending command"
        );
        for packet in &packets {
            self.transport.write_packet(packet)?;
        }

        self.read_message()
    }

    fn is_open(&self) -> bool {
        self.transport.is_connected()
    }

    fn close(&mut self) -> Result<()> {
        debug!("Closing executor");
        self.transport.close().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;

    use super::*;
    use crate::transport::{MockTransport, Packet};

    fn framed(message: &[u8]) -> Vec<Packet> {
        FrameCodec::default().encode(message).unwrap()
    }

    #[test]
    fn test_exchange_writes_framed_command() {
        let transport = MockTransport::new(framed(&[0x55, 0x00, 0x00, 0x04, 0x90, 0x00]));
        let mut executor = FramedExecutor::new(transport);

        let command = Command::new_with_data(0x55, 0x63, 0x01, 0x01, vec![0xAB; 100]);
        let response = executor.exchange(&command).unwrap();
        assert!(response.is_success());
        assert_eq!(response.payload_bytes(), &[0x55, 0x00, 0x00, 0x04]);

        let written = &executor.transport().written;
        assert_eq!(written.len(), 2);
        let (sent, complete) = FrameCodec::default().decode(written).unwrap();
        assert!(complete);
        assert_eq!(sent, command.to_bytes().unwrap());
    }

    #[test]
    fn test_multi_packet_response() {
        let mut message = vec![0x04; 65];
        message.extend_from_slice(&[0x90, 0x00]);
        let mut executor = FramedExecutor::new(MockTransport::new(framed(&message)));

        let response = executor.exchange(&Command::new(0x55, 0x01, 0x00, 0x00)).unwrap();
        assert_eq!(response.payload_bytes().len(), 65);
    }

    #[test]
    fn test_execute_maps_status_to_error() {
        let mut executor = FramedExecutor::new(MockTransport::new(framed(&[0x69, 0x85])));

        let err = executor
            .execute(&Command::new(0x55, 0x02, 0x01, 0x01))
            .unwrap_err();
        assert_eq!(err.status_word(), Some((0x69, 0x85).into()));
    }

    #[test]
    fn test_exchange_keeps_refusal_as_response() {
        let mut executor = FramedExecutor::new(MockTransport::new(framed(&[0x6D, 0x00])));

        let response = executor.exchange(&Command::new(0x55, 0x7F, 0x00, 0x00)).unwrap();
        assert!(!response.is_success());
        assert!(response.status().is_instruction_not_supported());
    }

    #[test]
    fn test_silent_device_times_out() {
        let config = ExchangeConfig::default().with_timeout(Duration::from_millis(50));
        let mut executor = FramedExecutor::with_config(MockTransport::new(Vec::new()), config);

        let err = executor.exchange(&Command::new(0x55, 0x00, 0x00, 0x00)).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_unbounded_timeout_does_not_overflow() {
        let config = ExchangeConfig::default().with_timeout(Duration::MAX);
        let response = framed(&[0x55, 0x00, 0x00, 0x04, 0x90, 0x00]);
        let mut executor = FramedExecutor::with_config(MockTransport::new(response), config);

        let response = executor.exchange(&Command::new(0x55, 0x00, 0x00, 0x00)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.payload_bytes(), &[0x55, 0x00, 0x00, 0x04]);
    }

    #[test]
    fn test_truncated_response_times_out() {
        let mut message = vec![0x00; 100];
        message.extend_from_slice(&[0x90, 0x00]);
        let mut packets = framed(&message);
        packets.truncate(1);

        let mut executor = FramedExecutor::new(MockTransport::new(packets));
        let err = executor.exchange(&Command::new(0x55, 0x01, 0x00, 0x00)).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_short_response_is_framing_error() {
        let mut executor = FramedExecutor::new(MockTransport::new(framed(&[0x90])));

        let err = executor.exchange(&Command::new(0x55, 0x00, 0x00, 0x00)).unwrap_err();
        assert!(matches!(
            err,
            Error::Framing(crate::FramingError::MissingStatusWord(1))
        ));
    }

    #[test]
    fn test_oversized_command_is_rejected_before_io() {
        let mut executor = FramedExecutor::new(MockTransport::new(Vec::new()));

        let command = Command::new_with_data(0x55, 0x63, 0x01, 0x01, Bytes::from(vec![0u8; 256]));
        assert!(matches!(
            executor.exchange(&command),
            Err(Error::DataTooLong(256))
        ));
        assert!(executor.transport().written.is_empty());
    }

    #[test]
    fn test_exchange_after_close() {
        let mut executor = FramedExecutor::new(MockTransport::new(framed(&[0x90, 0x00])));
        assert!(executor.is_open());

        executor.close().unwrap();
        assert!(!executor.is_open());
        assert!(matches!(
            executor.exchange(&Command::new(0x55, 0x00, 0x00, 0x00)),
            Err(Error::Transport(TransportError::Closed))
        ));
    }
}
