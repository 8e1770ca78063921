//! Hardware variants and their detection.
//!
//! Two boards share the firmware. They are told apart once at startup by
//! scanning the I2C bus: the display variant carries an OLED controller on
//! the bus, the headless variant has nothing attached.

use camera_proto::{FrameSize, PixelFormat};
use heapless::Vec;

/// Lowest non-reserved 7-bit I2C address.
pub const FIRST_BUS_ADDRESS: u8 = 0x08;
/// Highest non-reserved 7-bit I2C address.
pub const LAST_BUS_ADDRESS: u8 = 0x77;
/// Maximum number of addresses reported by [`BusScanner::scan`].
pub const MAX_BUS_DEVICES: usize = 8;

/// Probes a shared bus for responding devices.
pub trait BusScanner {
    /// Whether a device acknowledges `address`.
    fn probe(&mut self, address: u8) -> bool;

    /// Probe every non-reserved address and collect the ones that respond.
    ///
    /// Stops after [`MAX_BUS_DEVICES`] hits.
    fn scan(&mut self) -> Vec<u8, MAX_BUS_DEVICES> {
        let mut found = Vec::new();
        for address in FIRST_BUS_ADDRESS..=LAST_BUS_ADDRESS {
            if self.probe(address) && found.push(address).is_err() {
                break;
            }
        }
        found
    }
}

/// Board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceModel {
    /// No bus peripherals; has an illumination LED.
    Headless,
    /// Status display on the bus.
    WithDisplay,
}

impl DeviceModel {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Headless => "headless",
            Self::WithDisplay => "display",
        }
    }
}

/// Capabilities and startup defaults of a board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProfile {
    pub model: DeviceModel,
    pub has_display: bool,
    pub has_illumination: bool,
    /// Pixel format applied by the startup reset.
    pub default_pixel_format: PixelFormat,
    /// Frame size applied by the startup reset.
    pub default_frame_size: FrameSize,
    /// Exposure settle time after every sensor reset.
    pub settle_ms: u32,
}

impl DeviceProfile {
    pub const HEADLESS: Self = Self {
        model: DeviceModel::Headless,
        has_display: false,
        has_illumination: true,
        default_pixel_format: PixelFormat::Rgb565,
        default_frame_size: FrameSize::Qqvga,
        settle_ms: 100,
    };

    pub const WITH_DISPLAY: Self = Self {
        model: DeviceModel::WithDisplay,
        has_display: true,
        has_illumination: false,
        default_pixel_format: PixelFormat::Rgb565,
        default_frame_size: FrameSize::Qqvga,
        settle_ms: 100,
    };

    #[must_use]
    pub const fn for_model(model: DeviceModel) -> Self {
        match model {
            DeviceModel::Headless => Self::HEADLESS,
            DeviceModel::WithDisplay => Self::WITH_DISPLAY,
        }
    }

    /// Pick the profile from a bus scan: any responding device means the
    /// display variant.
    pub fn detect<B: BusScanner + ?Sized>(bus: &mut B) -> Self {
        let found = bus.scan();
        if found.is_empty() {
            Self::HEADLESS
        } else {
            Self::WITH_DISPLAY
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_support::MockBus;
    use std::vec;

    #[test]
    fn test_empty_bus_is_headless() {
        let mut bus = MockBus { devices: vec![] };
        let profile = DeviceProfile::detect(&mut bus);
        assert_eq!(profile.model, DeviceModel::Headless);
        assert!(profile.has_illumination);
        assert!(!profile.has_display);
    }

    #[test]
    fn test_any_device_means_display() {
        let mut bus = MockBus { devices: vec![0x3C] };
        let profile = DeviceProfile::detect(&mut bus);
        assert_eq!(profile, DeviceProfile::WITH_DISPLAY);
        assert_eq!(DeviceProfile::for_model(DeviceModel::WithDisplay), profile);
    }

    #[test]
    fn test_scan_skips_reserved_addresses() {
        let mut bus = MockBus {
            devices: vec![0x00, 0x07, 0x08, 0x3C, 0x77, 0x78],
        };
        assert_eq!(bus.scan().as_slice(), &[0x08, 0x3C, 0x77]);
    }

    #[test]
    fn test_scan_is_bounded() {
        let mut bus = MockBus {
            devices: (0x10..0x30).collect(),
        };
        assert_eq!(bus.scan().len(), MAX_BUS_DEVICES);
    }
}
