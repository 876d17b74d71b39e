//! Error types for the HID transport

/// HID-specific errors
#[derive(Debug, thiserror::Error)]
pub enum HidError {
    /// Error reported by hidapi
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),

    /// No device matched the configured filter
    #[error("No Ledger device found")]
    NoDevicesFound,

    /// The selected device is not present
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// A matching device exists but could not be opened
    #[error("Failed to open device {path}: {reason}")]
    Open {
        /// Platform path of the device
        path: String,
        /// Backend error message
        reason: String,
    },
}
