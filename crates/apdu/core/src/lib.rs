//! Core traits and types for APDU exchanges with Ledger-style devices
//!
//! This crate provides the building blocks for talking to a hardware signer
//! whose application speaks APDU commands over fixed-size HID packets.
//!
//! ## Overview
//!
//! A logical exchange goes through three layers:
//!
//! - [`Command`] / [`Response`]: the APDU itself (`CLA INS P1 P2 Lc data` out,
//!   `data SW1 SW2` back)
//! - [`frame`]: the HID framing which splits one APDU over several 64 byte
//!   packets and reassembles the answer
//! - [`PacketTransport`]: the raw packet pipe supplied by a HID backend (or a
//!   software device in tests)
//!
//! [`FramedExecutor`] ties the layers together and exposes a synchronous
//! request/response [`Executor`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod config;
pub mod executor;
pub mod frame;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result};

// Re-exports for common types
pub use command::{ApduCommand, Command};
pub use config::ExchangeConfig;
pub use executor::{Executor, FramedExecutor};
pub use frame::{FrameCodec, FrameDecoder, FramingError, PacketHeader};
pub use response::status::StatusWord;
pub use response::Response;
pub use transport::{PACKET_SIZE, Packet, PacketTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, ExchangeConfig, Response, Result,
        command::ApduCommand,
        executor::{Executor, FramedExecutor},
        frame::{FrameCodec, FramingError},
        response::status::{StatusWord, common as status},
        transport::{PACKET_SIZE, Packet, PacketTransport, TransportError},
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x55, 0x00, 0x00, 0x00);
        assert_eq!(cmd.class(), 0x55);
        assert_eq!(cmd.instruction(), 0x00);
        assert_eq!(cmd.p1(), 0x00);
        assert_eq!(cmd.p2(), 0x00);

        let resp = Response::success(Some(Bytes::from_static(&[0x01, 0x02, 0x03])));
        assert!(resp.is_success());
        assert_eq!(resp.payload_bytes(), &[0x01, 0x02, 0x03]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
