//! HID packet transport implementation

use std::fmt;
use std::time::Duration;

use hidapi::HidDevice;
use ledger_apdu_core::prelude::*;
use tracing::debug;

use crate::device::LedgerDevice;

/// Report identifier prefixed to every write
const REPORT_ID: u8 = 0x00;

/// Transport implementation using hidapi
pub struct HidTransport {
    /// Device handle, `None` once closed
    device: Option<HidDevice>,
    /// Descriptor of the opened device
    info: LedgerDevice,
}

impl fmt::Debug for HidTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HidTransport")
            .field("info", &self.info)
            .field("open", &self.device.is_some())
            .finish()
    }
}

impl HidTransport {
    pub(crate) const fn new(device: HidDevice, info: LedgerDevice) -> Self {
        Self {
            device: Some(device),
            info,
        }
    }

    /// Get the descriptor of the opened device
    pub const fn device(&self) -> &LedgerDevice {
        &self.info
    }

    fn handle(&self) -> Result<&HidDevice, TransportError> {
        self.device.as_ref().ok_or(TransportError::Closed)
    }
}

impl PacketTransport for HidTransport {
    fn do_write_packet(&mut self, packet: &Packet) -> Result<(), TransportError> {
        let device = self.handle()?;

        let mut report = [0u8; PACKET_SIZE + 1];
        report[0] = REPORT_ID;
        report[1..].copy_from_slice(packet);

        let written = device.write(&report).map_err(TransportError::io)?;
        // Some backends do not count the report id
        if written < PACKET_SIZE {
            return Err(TransportError::ShortWrite {
                written,
                expected: report.len(),
            });
        }
        Ok(())
    }

    fn do_read_packet(&mut self, timeout: Duration) -> Result<Packet, TransportError> {
        let device = self.handle()?;

        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX).max(1);
        let mut packet = [0u8; PACKET_SIZE];
        match device.read_timeout(&mut packet, millis) {
            Ok(0) => Err(TransportError::Timeout),
            Ok(n) if n == PACKET_SIZE => Ok(packet),
            Ok(n) => Err(TransportError::Io(format!(
                "short read: {n} of {PACKET_SIZE} bytes"
            ))),
            Err(e) => Err(TransportError::io(e)),
        }
    }

    fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.device.take().is_some() {
            debug!(device = %self.info, "Closed HID device");
        }
        Ok(())
    }
}

impl Drop for HidTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
