//! Descriptor of an enumerated HID device

use std::ffi::CString;
use std::fmt;

/// Representation of a Ledger device found during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDevice {
    /// Platform path used to open the device
    path: CString,
    /// USB vendor identifier
    vendor_id: u16,
    /// USB product identifier
    product_id: u16,
    /// Serial number, when the platform reports one
    serial: Option<String>,
    /// Product string, when the platform reports one
    product: Option<String>,
    /// HID usage page
    usage_page: u16,
    /// USB interface number
    interface: i32,
}

impl LedgerDevice {
    /// Build a descriptor from hidapi device information
    pub(crate) fn from_info(info: &hidapi::DeviceInfo) -> Self {
        Self {
            path: info.path().to_owned(),
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            serial: info.serial_number().map(str::to_owned),
            product: info.product_string().map(str::to_owned),
            usage_page: info.usage_page(),
            interface: info.interface_number(),
        }
    }

    /// Get the platform path
    pub fn path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub(crate) fn path_cstr(&self) -> &CString {
        &self.path
    }

    /// Get the USB vendor identifier
    pub const fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    /// Get the USB product identifier
    pub const fn product_id(&self) -> u16 {
        self.product_id
    }

    /// Get the serial number
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Get the product string
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// Get the HID usage page
    pub const fn usage_page(&self) -> u16 {
        self.usage_page
    }

    /// Get the USB interface number
    pub const fn interface(&self) -> i32 {
        self.interface
    }
}

impl fmt::Display for LedgerDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:04x} {} ({})",
            self.vendor_id,
            self.product_id,
            self.product.as_deref().unwrap_or("Ledger"),
            self.path.to_string_lossy()
        )?;
        if let Some(serial) = &self.serial {
            write!(f, " serial {serial}")?;
        }
        Ok(())
    }
}
