//! Serial camera server firmware for RP2040.
//!
//! This crate binds the platform-agnostic [`camera_core`] engine to a
//! Raspberry Pi Pico board with a VC0706 serial camera.
//!
//! # Overview
//!
//! The firmware:
//! 1. Scans the I2C bus once to pick the board variant ([`DeviceProfile`])
//! 2. Resets the camera to the profile's default format and size
//! 3. Serves `cmd=...` request lines from the host UART (1.5 Mbaud, 8N1)
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART0 TX | 0    | Camera receive |
//! | UART0 RX | 1    | Camera transmit |
//! | I2C0 SDA | 4    | Status display (display variant only) |
//! | I2C0 SCL | 5    | Status display (display variant only) |
//! | UART1 TX | 8    | Host receive |
//! | UART1 RX | 9    | Host transmit |
//! | LED      | 15   | Illumination LED (headless variant only) |
//!
//! # Architecture
//!
//! A single Embassy task runs [`ProtocolEngine::run`]. Each iteration waits
//! at most a few milliseconds for host bytes, so the illumination timer keeps
//! running while the host is silent.
//!
//! # Modules
//!
//! - [`transport`]: Host UART ([`UartTransport`])
//! - [`vc0706`]: Camera driver ([`Vc0706`])
//! - [`sh1106`]: Status OLED ([`Sh1106`])
//! - [`board`]: LED, bus scan, clock
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use camera_core::{
    DeviceModel, DeviceProfile, EngineConfig, EngineError, Peripherals, PollOutcome,
    ProtocolEngine,
};

pub mod board;
pub mod sh1106;
pub mod transport;
pub mod vc0706;

pub use board::{EmbassyClock, I2cScanner, LedLight};
pub use sh1106::Sh1106;
pub use transport::UartTransport;
pub use vc0706::{Vc0706, Vc0706Error};

/// Host link baud rate.
pub const HOST_BAUD_RATE: u32 = 1_500_000;

/// Capacity of the compressed image buffer.
pub const IMAGE_BUFFER_SIZE: usize = 64 * 1024;
