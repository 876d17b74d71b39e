//! Client for the Cosmos application on Ledger-style hardware signers
//!
//! The device is reached over USB HID. Requests are APDU commands framed into
//! 64 byte packets; long messages go out as chunked sequences.
//!
//! ```no_run
//! # fn main() -> ledger_cosmos::Result<()> {
//! use ledger_cosmos::CosmosApp;
//!
//! let mut app = CosmosApp::find()?;
//! println!("Cosmos app {}", app.get_version()?);
//!
//! let message = b"sign me";
//! let public_key = app.get_public_key()?;
//! let signature = app.sign_quick(message)?;
//! assert!(public_key.verify(message, &signature));
//! # Ok(())
//! # }
//! ```
//!
//! [`emulator::Emulator`] is a software device speaking the same protocol,
//! used by the tests and by the CLI `--emulator` flag.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod application;
mod chunking;
pub mod commands;
mod constants;
pub mod emulator;
mod error;
mod types;
pub mod verify;

pub use application::{CosmosApp, HASH_LEN};
pub use chunking::{ChunkedSequence, SequenceState};
pub use constants::*;
pub use error::{Error, Result};
pub use types::{PublicKey, Signature, Version};
pub use verify::verify;

pub use ledger_apdu_core::prelude::{ExchangeConfig, FramedExecutor};
#[cfg(feature = "hid")]
pub use ledger_apdu_transport_hid::{
    DeviceSelector, HidConfig, HidDeviceManager, HidTransport, LedgerDevice,
};
