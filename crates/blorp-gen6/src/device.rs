//! # Device Configuration
//!
//! Per-SKU limits the emitters read.

/// Sandy Bridge device limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// URB entries handed to the VS (the whole URB)
    pub max_vs_entries: u32,
    /// Pixel shader thread limit
    pub max_wm_threads: u32,
}

impl DeviceInfo {
    /// GT1 configuration
    pub const fn gt1() -> Self {
        Self {
            max_vs_entries: 256,
            max_wm_threads: 40,
        }
    }

    /// GT2 configuration
    pub const fn gt2() -> Self {
        Self {
            max_vs_entries: 256,
            max_wm_threads: 80,
        }
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self::gt2()
    }
}
