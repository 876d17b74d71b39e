//! Device manager for HID discovery

use hidapi::HidApi;
use tracing::{debug, info};

use crate::config::{DeviceSelector, HidConfig};
use crate::device::LedgerDevice;
use crate::error::HidError;
use crate::transport::HidTransport;

/// Manager for HID device operations
#[allow(missing_debug_implementations)]
pub struct HidDeviceManager {
    /// hidapi context
    api: HidApi,
    /// Discovery filter and selection strategy
    config: HidConfig,
}

impl HidDeviceManager {
    /// Create a new device manager with default configuration
    pub fn new() -> Result<Self, HidError> {
        Self::with_config(HidConfig::default())
    }

    /// Create a new device manager with custom configuration
    pub fn with_config(config: HidConfig) -> Result<Self, HidError> {
        let api = HidApi::new()?;
        Ok(Self { api, config })
    }

    /// Get the configuration
    pub const fn config(&self) -> &HidConfig {
        &self.config
    }

    /// List the devices exposing the APDU interface
    pub fn list_devices(&self) -> Vec<LedgerDevice> {
        let devices: Vec<_> = self
            .api
            .device_list()
            .filter(|info| {
                self.config
                    .matches(info.vendor_id(), info.usage_page(), info.interface_number())
            })
            .map(LedgerDevice::from_info)
            .collect();

        debug!(count = devices.len(), "Enumerated Ledger devices");
        devices
    }

    /// Open a specific device
    pub fn open_device(&self, device: &LedgerDevice) -> Result<HidTransport, HidError> {
        let handle = self
            .api
            .open_path(device.path_cstr())
            .map_err(|e| HidError::Open {
                path: device.path(),
                reason: e.to_string(),
            })?;

        info!(device = %device, "Opened HID device");
        Ok(HidTransport::new(handle, device.clone()))
    }

    /// Open the device at a platform path
    pub fn open_path(&self, path: &str) -> Result<HidTransport, HidError> {
        let device = self
            .list_devices()
            .into_iter()
            .find(|d| d.path() == path)
            .ok_or_else(|| HidError::DeviceNotFound(path.to_owned()))?;
        self.open_device(&device)
    }

    /// Open the first device that accepts the connection
    pub fn open_first(&self) -> Result<HidTransport, HidError> {
        let devices = self.list_devices();
        if devices.is_empty() {
            return Err(HidError::NoDevicesFound);
        }

        let mut last_error = None;
        for device in &devices {
            match self.open_device(device) {
                Ok(transport) => return Ok(transport),
                Err(e) => {
                    debug!(device = %device, error = %e, "Failed to open device");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(HidError::NoDevicesFound))
    }

    /// Connect using the configured selection strategy
    pub fn connect(&self) -> Result<HidTransport, HidError> {
        match &self.config.selector {
            DeviceSelector::FirstAvailable => self.open_first(),
            DeviceSelector::Path(path) => self.open_path(path),
            DeviceSelector::Serial(serial) => {
                let device = self
                    .list_devices()
                    .into_iter()
                    .find(|d| d.serial() == Some(serial.as_str()))
                    .ok_or_else(|| HidError::DeviceNotFound(serial.clone()))?;
                self.open_device(&device)
            }
        }
    }
}
