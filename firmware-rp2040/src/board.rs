//! Board glue: illumination LED, I2C bus scan, and the monotonic clock.
//!
//! # Pins
//!
//! | Function  | GPIO | Description |
//! |-----------|------|-------------|
//! | I2C0 SDA  | 4    | Status display bus |
//! | I2C0 SCL  | 5    | Status display bus |
//! | LED       | 15   | Illumination LED (active high) |

use camera_core::{BusScanner, Clock, Light};
use embassy_rp::gpio::{Level, Output};
use embassy_time::Instant;
use embedded_hal::i2c::I2c;

/// Illumination LED on a GPIO output.
pub struct LedLight<'d> {
    pin: Output<'d>,
}

impl<'d> LedLight<'d> {
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl Light for LedLight<'_> {
    fn set(&mut self, on: bool) {
        self.pin.set_level(Level::from(on));
    }
}

/// Probes an I2C bus with blocking one-byte reads.
///
/// Borrows the bus so it can be handed to the display driver afterwards.
pub struct I2cScanner<'a, B> {
    i2c: &'a mut B,
}

impl<'a, B: I2c> I2cScanner<'a, B> {
    pub fn new(i2c: &'a mut B) -> Self {
        Self { i2c }
    }
}

impl<B: I2c> BusScanner for I2cScanner<'_, B> {
    fn probe(&mut self, address: u8) -> bool {
        let mut byte = [0u8; 1];
        self.i2c.read(address, &mut byte).is_ok()
    }
}

/// Milliseconds since boot from the Embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
