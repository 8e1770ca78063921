//! Line protocol types, parsing, and serialization for the serial camera server.
//!
//! This crate provides everything needed to speak the camera link protocol:
//!
//! - **Types**: Core data structures for requests and their fields
//!   - [`Command`] - A parsed host request
//!   - [`PixelFormat`], [`FrameSize`], [`SnapshotFormat`] - Field values
//!
//! - **Parsing**: Parse incoming request lines
//!   - [`parse_command()`] - Parse a request line
//!   - [`ParseError`] - Why a line produced no command
//!
//! - **Serialization**: Serialize outgoing protocol lines
//!   - [`Serialize`] trait - Extension trait for serialization
//!   - [`Response`] - Device response lines
//!
//! - **Integrity**: [`calculate_crc32()`] for image chunks
//!
//! # Protocol Format
//!
//! The protocol uses ASCII lines of space-separated `key=value` tokens,
//! terminated by `\n`. One request yields at most one response line.
//!
//! ```text
//! host:   cmd=RESET-REQ pixformat=RGB565 framesize=QQVGA
//! device: cmd=RESET-RESP result=OK
//! host:   cmd=SNAPSHOT-REQ format=JPEG quality=80
//! device: cmd=SNAPSHOT-RESP seq=1 size=4821
//! host:   cmd=DATA-REQ seq=1 offset=0 length=1024
//! device: cmd=DATA-RESP seq=1 offset=0 length=1024 crc32=2915947135
//!         <1024 raw bytes>
//! host:   cmd=PING msg=hello
//! device: cmd=PONG msg=hello
//! ```
//!
//! The raw bytes after a `DATA-RESP` header are not newline-delimited; the
//! receiver reads exactly `length` bytes. `crc32` is the standard CRC-32 of
//! those bytes, printed as an unsigned decimal.
//!
//! # Examples
//!
//! ## Parsing Requests
//!
//! ```
//! use camera_proto::{parse_command, Command, FrameSize, PixelFormat};
//!
//! let cmd = parse_command("cmd=RESET-REQ pixformat=GRAYSCALE framesize=QVGA").unwrap();
//! assert_eq!(
//!     cmd,
//!     Command::Reset {
//!         pixel_format: PixelFormat::Grayscale,
//!         frame_size: FrameSize::Qvga,
//!     }
//! );
//! ```
//!
//! ## Serializing Responses
//!
//! ```
//! use camera_proto::{calculate_crc32, Response, Serialize};
//!
//! let chunk = b"123456789";
//! let header = Response::Data {
//!     sequence: 1,
//!     offset: 0,
//!     length: chunk.len() as u32,
//!     crc32: calculate_crc32(chunk),
//! };
//!
//! let mut buf = [0u8; 96];
//! let len = header.serialize(&mut buf).unwrap();
//! assert_eq!(
//!     &buf[..len],
//!     b"cmd=DATA-RESP seq=1 offset=0 length=9 crc32=3421780262\n"
//! );
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod crc;
mod fmt;
pub mod parser;
pub mod serialize;
pub mod types;

// Re-export types at crate root for convenience
pub use command::{Command, Token};
pub use crc::calculate_crc32;
pub use parser::{parse_command, parse_command_bytes, ParseError, MAX_LINE_LENGTH, MAX_QUALITY};
pub use serialize::{Response, Serialize, SerializeError, MAX_MESSAGE_SIZE};
pub use types::{CommandKind, FrameSize, PixelFormat, SnapshotFormat};
