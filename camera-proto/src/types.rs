//! Protocol value types: pixel formats, frame sizes, snapshot formats.

/// Sensor pixel format requested by `RESET-REQ`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    Rgb565,
    Grayscale,
}

impl PixelFormat {
    /// Parse the wire token (`RGB565`, `GRAYSCALE`). Case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "RGB565" => Some(Self::Rgb565),
            "GRAYSCALE" => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// Wire token for this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb565 => "RGB565",
            Self::Grayscale => "GRAYSCALE",
        }
    }
}

/// Sensor frame size requested by `RESET-REQ`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameSize {
    /// 640x480
    Vga,
    /// 320x240
    Qvga,
    /// 160x120
    Qqvga,
}

impl FrameSize {
    /// Parse the wire token (`VGA`, `QVGA`, `QQVGA`). Case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "VGA" => Some(Self::Vga),
            "QVGA" => Some(Self::Qvga),
            "QQVGA" => Some(Self::Qqvga),
            _ => None,
        }
    }

    /// Wire token for this frame size.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vga => "VGA",
            Self::Qvga => "QVGA",
            Self::Qqvga => "QQVGA",
        }
    }

    /// Width and height in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            Self::Vga => (640, 480),
            Self::Qvga => (320, 240),
            Self::Qqvga => (160, 120),
        }
    }
}

/// Compression format named in `SNAPSHOT-REQ`.
///
/// Only JPEG is produced. Any other token still parses so the engine can
/// swallow the request without a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnapshotFormat {
    Jpeg,
    Unsupported,
}

impl SnapshotFormat {
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "JPEG" {
            Self::Jpeg
        } else {
            Self::Unsupported
        }
    }
}

/// Discriminant of a [`Command`](crate::Command), used for logging and
/// dispatch outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    Reset,
    Snapshot,
    DataRequest,
    Ping,
}

impl CommandKind {
    /// The `cmd=` token a host sends for this command.
    #[must_use]
    pub const fn request_name(self) -> &'static str {
        match self {
            Self::Reset => "RESET-REQ",
            Self::Snapshot => "SNAPSHOT-REQ",
            Self::DataRequest => "DATA-REQ",
            Self::Ping => "PING",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_tokens() {
        assert_eq!(PixelFormat::from_token("RGB565"), Some(PixelFormat::Rgb565));
        assert_eq!(
            PixelFormat::from_token("GRAYSCALE"),
            Some(PixelFormat::Grayscale)
        );
        assert_eq!(PixelFormat::from_token("rgb565"), None);
        assert_eq!(PixelFormat::from_token("YUV422"), None);
        assert_eq!(PixelFormat::Grayscale.as_str(), "GRAYSCALE");
    }

    #[test]
    fn test_frame_size_tokens() {
        assert_eq!(FrameSize::from_token("QQVGA"), Some(FrameSize::Qqvga));
        assert_eq!(FrameSize::from_token("qvga"), None);
        assert_eq!(FrameSize::Vga.dimensions(), (640, 480));
        assert_eq!(FrameSize::Qqvga.dimensions(), (160, 120));
    }

    #[test]
    fn test_snapshot_format_is_case_sensitive() {
        assert_eq!(SnapshotFormat::from_token("JPEG"), SnapshotFormat::Jpeg);
        assert_eq!(
            SnapshotFormat::from_token("jpeg"),
            SnapshotFormat::Unsupported
        );
        assert_eq!(SnapshotFormat::from_token("PNG"), SnapshotFormat::Unsupported);
    }
}
