//! USB HID transport for Ledger-style devices
//!
//! This crate provides an implementation of the `PacketTransport` trait from
//! `ledger-apdu-core` on top of `hidapi`. It only moves 64 byte packets; the
//! framing lives in the core crate.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ledger_apdu_core::prelude::*;
//! use ledger_apdu_transport_hid::HidDeviceManager;
//!
//! let manager = HidDeviceManager::new()?;
//! for device in manager.list_devices() {
//!     println!("{device}");
//! }
//!
//! let transport = manager.open_first()?;
//! let mut executor = FramedExecutor::new(transport);
//!
//! // GET_VERSION
//! let response = executor.exchange(&Command::new(0x55, 0x00, 0x00, 0x00))?;
//! println!("Version: {}", hex::encode(response.payload_bytes()));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod device;
mod error;
mod manager;
mod transport;

pub use config::{DeviceSelector, HidConfig, LEDGER_USAGE_PAGE, LEDGER_VENDOR_ID};
pub use device::LedgerDevice;
pub use error::HidError;
pub use manager::HidDeviceManager;
pub use transport::HidTransport;
