//! Protocol serialization for responses and requests.
//!
//! This module provides the [`Serialize`] trait for writing [`Response`]
//! lines (device → host) and [`Command`] lines (host → device) in the wire
//! format.
//!
//! # Example
//!
//! ```
//! use camera_proto::{Response, Serialize};
//!
//! let mut buf = [0u8; 64];
//! let len = Response::Snapshot { sequence: 1, size: 4821 }
//!     .serialize(&mut buf)
//!     .unwrap();
//!
//! assert_eq!(&buf[..len], b"cmd=SNAPSHOT-RESP seq=1 size=4821\n");
//! ```

use crate::command::Command;
use crate::fmt::{write_u32, MAX_U32_DIGITS};
use crate::parser::MAX_LINE_LENGTH;
use crate::types::SnapshotFormat;

/// Maximum size of any serialized protocol line, newline included.
///
/// Breakdown of the longest one (`PONG` with a full-length token):
/// `cmd=PONG msg=`(13) + token(128) + `\n`(1) = 142, rounded up.
pub const MAX_MESSAGE_SIZE: usize = MAX_LINE_LENGTH + 16;

/// A device response line.
///
/// A [`Response::Data`] header is followed on the wire by exactly `length`
/// raw bytes, which are not part of the serialized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'a> {
    /// `cmd=RESET-RESP result=OK`
    ResetOk,
    /// `cmd=SNAPSHOT-RESP seq=<uint> size=<uint>`
    Snapshot { sequence: u32, size: u32 },
    /// `cmd=DATA-RESP seq=<uint> offset=<uint> length=<uint> crc32=<uint>`
    Data {
        sequence: u32,
        offset: u32,
        length: u32,
        crc32: u32,
    },
    /// `cmd=PONG msg=<token>`
    Pong { message: &'a str },
}

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized message.
    BufferTooSmall,
    /// A write operation failed (for I/O adapters).
    WriteError,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Bounds-checked cursor over an output buffer.
struct SerializeBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SerializeBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        let end = self.pos + bytes.len();
        self.buf
            .get_mut(self.pos..end)
            .ok_or(SerializeError::BufferTooSmall)?
            .copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    #[inline]
    fn write_str(&mut self, s: &str) -> Result<(), SerializeError> {
        self.write_slice(s.as_bytes())
    }

    #[inline]
    fn write_u32(&mut self, value: u32) -> Result<(), SerializeError> {
        let mut tmp = [0u8; MAX_U32_DIGITS];
        let len = write_u32(&mut tmp, value);
        self.write_slice(&tmp[..len])
    }

    /// Write ` key=value` for a numeric field.
    #[inline]
    fn field_u32(&mut self, key: &str, value: u32) -> Result<(), SerializeError> {
        self.write_slice(b" ")?;
        self.write_str(key)?;
        self.write_slice(b"=")?;
        self.write_u32(value)
    }

    /// Write ` key=value` for a token field.
    #[inline]
    fn field_str(&mut self, key: &str, value: &str) -> Result<(), SerializeError> {
        self.write_slice(b" ")?;
        self.write_str(key)?;
        self.write_slice(b"=")?;
        self.write_str(value)
    }

    /// Terminate the line and return its length.
    #[inline]
    fn finalize(mut self) -> Result<usize, SerializeError> {
        self.write_slice(b"\n")?;
        Ok(self.pos)
    }
}

/// Extension trait for serializing protocol messages.
///
/// Implemented for [`Response`] and [`Command`], allowing them to be
/// serialized to various output targets.
pub trait Serialize {
    /// Serialize to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Serialize to a `core::fmt::Write` implementation.
    ///
    /// This can be used with types like `heapless::String`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    fn serialize_fmt<W: core::fmt::Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = self.serialize(&mut buf)?;

        let s = core::str::from_utf8(&buf[..len]).map_err(|_| SerializeError::WriteError)?;
        writer.write_str(s).map_err(|_| SerializeError::WriteError)
    }
}

impl Serialize for Response<'_> {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);

        match *self {
            Self::ResetOk => {
                sb.write_str("cmd=RESET-RESP")?;
                sb.field_str("result", "OK")?;
            }
            Self::Snapshot { sequence, size } => {
                sb.write_str("cmd=SNAPSHOT-RESP")?;
                sb.field_u32("seq", sequence)?;
                sb.field_u32("size", size)?;
            }
            Self::Data {
                sequence,
                offset,
                length,
                crc32,
            } => {
                sb.write_str("cmd=DATA-RESP")?;
                sb.field_u32("seq", sequence)?;
                sb.field_u32("offset", offset)?;
                sb.field_u32("length", length)?;
                sb.field_u32("crc32", crc32)?;
            }
            Self::Pong { message } => {
                sb.write_str("cmd=PONG")?;
                sb.field_str("msg", message)?;
            }
        }

        sb.finalize()
    }
}

impl Serialize for Command {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);

        sb.write_str("cmd=")?;
        sb.write_str(self.kind().request_name())?;

        match self {
            Self::Reset {
                pixel_format,
                frame_size,
            } => {
                sb.field_str("pixformat", pixel_format.as_str())?;
                sb.field_str("framesize", frame_size.as_str())?;
            }
            Self::Snapshot { format, quality } => {
                // An unsupported format has no token of its own; nothing
                // meaningful can be sent for it.
                let format = match format {
                    SnapshotFormat::Jpeg => "JPEG",
                    SnapshotFormat::Unsupported => return Err(SerializeError::WriteError),
                };
                sb.field_str("format", format)?;
                sb.field_u32("quality", u32::from(*quality))?;
            }
            Self::DataRequest {
                sequence,
                offset,
                length,
            } => {
                sb.field_u32("seq", *sequence)?;
                sb.field_u32("offset", *offset)?;
                sb.field_u32("length", *length)?;
            }
            Self::Ping { message } => {
                sb.field_str("msg", message)?;
            }
        }

        sb.finalize()
    }
}
