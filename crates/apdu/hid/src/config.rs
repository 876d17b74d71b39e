//! Configuration options for the HID transport

/// USB vendor identifier of Ledger devices
pub const LEDGER_VENDOR_ID: u16 = 0x2c97;

/// HID usage page of the APDU interface
pub const LEDGER_USAGE_PAGE: u16 = 0xffa0;

/// Strategy for picking a device among the enumerated ones
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceSelector {
    /// Connect to the first matching device (default)
    #[default]
    FirstAvailable,

    /// Connect to the device at this platform path
    Path(String),

    /// Connect to the device with this serial number
    Serial(String),
}

/// Configuration options for HID device discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidConfig {
    /// Vendor identifier to match
    pub vendor_id: u16,

    /// Usage page identifying the APDU interface
    pub usage_page: u16,

    /// Interface number to accept when the platform reports no usage page
    pub interface: i32,

    /// Which device to open
    pub selector: DeviceSelector,
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            vendor_id: LEDGER_VENDOR_ID,
            usage_page: LEDGER_USAGE_PAGE,
            interface: 0,
            selector: DeviceSelector::FirstAvailable,
        }
    }
}

impl HidConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vendor identifier
    pub const fn with_vendor_id(mut self, vendor_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    /// Set the usage page
    pub const fn with_usage_page(mut self, usage_page: u16) -> Self {
        self.usage_page = usage_page;
        self
    }

    /// Set the fallback interface number
    pub const fn with_interface(mut self, interface: i32) -> Self {
        self.interface = interface;
        self
    }

    /// Set the device selector
    pub fn with_selector(mut self, selector: DeviceSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Check whether a device descriptor belongs to the APDU interface
    pub(crate) const fn matches(&self, vendor_id: u16, usage_page: u16, interface: i32) -> bool {
        vendor_id == self.vendor_id
            && (usage_page == self.usage_page || interface == self.interface)
    }
}
