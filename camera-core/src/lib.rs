//! Platform-agnostic protocol engine for the serial camera server.
//!
//! This crate provides the core of the device without any platform-specific
//! dependencies. It can be used both in embedded `no_std` environments and on
//! host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`transport`]: Host link trait ([`Transport`])
//! - [`framer`]: Newline framing ([`LineFramer`])
//! - [`snapshot`]: Image storage and chunked reads ([`SnapshotBuffer`])
//! - [`illumination`]: LED hold timer ([`IlluminationController`])
//! - [`sensor`]: Sensor trait and reset sequencing ([`Sensor`], [`SensorSession`])
//! - [`display`]: Status display trait ([`StatusDisplay`])
//! - [`profile`]: Board variants and bus-scan detection ([`DeviceProfile`])
//! - [`engine`]: Orchestrates request handling ([`ProtocolEngine`])
//!
//! # Main Loop
//!
//! ```text
//! poll transport ──► LineFramer ──► parse_command ──► handler ──► responses
//!        │                                              │
//!        └──────── illumination tick every iteration ◄──┘
//! ```
//!
//! One iteration polls once, handles at most one request, and never blocks
//! longer than the configured poll timeout while the host is silent.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Route logging through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations. The
//! image buffer is provided by the caller.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod config;
pub mod display;
pub mod engine;
pub mod framer;
pub mod illumination;
pub mod profile;
pub mod sensor;
pub mod session;
pub mod snapshot;
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use clock::Clock;
pub use config::EngineConfig;
pub use display::{DisplayError, StatusDisplay};
pub use engine::{EngineError, Peripherals, PollOutcome, ProtocolEngine, DISPLAY_TITLE};
pub use framer::{LineEvent, LineFramer};
pub use illumination::{IlluminationController, IlluminationState, Light};
pub use profile::{BusScanner, DeviceModel, DeviceProfile};
pub use sensor::{Sensor, SensorSession};
pub use session::Session;
pub use snapshot::{Chunk, ImageInfo, SnapshotBuffer, SnapshotError};
pub use transport::{Transport, TransportError};

pub use camera_proto;
