//! Typed host requests.

use heapless::String;

use crate::parser::MAX_LINE_LENGTH;
use crate::types::{CommandKind, FrameSize, PixelFormat, SnapshotFormat};

/// A whitespace-free token copied out of a request line (the `PING` message).
///
/// Sized to the longest possible line, so any token that fits on the wire
/// fits here.
pub type Token = String<MAX_LINE_LENGTH>;

/// A parsed host request.
///
/// Commands own their data so they outlive the line buffer they were parsed
/// from; they are consumed within one loop iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `cmd=RESET-REQ pixformat=<fmt> framesize=<size>`
    Reset {
        pixel_format: PixelFormat,
        frame_size: FrameSize,
    },
    /// `cmd=SNAPSHOT-REQ format=<fmt> quality=<0-100>`
    Snapshot { format: SnapshotFormat, quality: u8 },
    /// `cmd=DATA-REQ seq=<uint> offset=<uint> length=<uint>`
    DataRequest {
        sequence: u32,
        offset: u32,
        length: u32,
    },
    /// `cmd=PING msg=<token>`
    Ping { message: Token },
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Reset { .. } => CommandKind::Reset,
            Self::Snapshot { .. } => CommandKind::Snapshot,
            Self::DataRequest { .. } => CommandKind::DataRequest,
            Self::Ping { .. } => CommandKind::Ping,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Reset {
                pixel_format,
                frame_size,
            } => defmt::write!(f, "Reset({}, {})", pixel_format, frame_size),
            Self::Snapshot { format, quality } => {
                defmt::write!(f, "Snapshot({}, q={})", format, quality)
            }
            Self::DataRequest {
                sequence,
                offset,
                length,
            } => defmt::write!(
                f,
                "DataRequest(seq={}, offset={}, length={})",
                sequence,
                offset,
                length
            ),
            Self::Ping { message } => defmt::write!(f, "Ping({})", message.as_str()),
        }
    }
}
