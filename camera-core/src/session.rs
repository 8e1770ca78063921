//! Per-device protocol state.

use camera_proto::{FrameSize, PixelFormat};

use crate::snapshot::SnapshotBuffer;

/// Everything the engine remembers between commands.
///
/// Invariant: whenever the snapshot buffer holds an image, its sequence is
/// `last_sequence`.
///
/// Each capture's sequence is one greater than the previous one, modulo
/// 2^32: after `u32::MAX` the next capture is numbered 0. At one capture per
/// second that takes over a century, so hosts may treat sequences as
/// strictly increasing for any realistic uptime.
pub struct Session<'a> {
    pub pixel_format: PixelFormat,
    pub frame_size: FrameSize,
    last_sequence: u32,
    snapshot: SnapshotBuffer<'a>,
}

impl<'a> Session<'a> {
    /// Start a session with no image, sequence 0, and the given sensor
    /// configuration.
    pub fn new(storage: &'a mut [u8], pixel_format: PixelFormat, frame_size: FrameSize) -> Self {
        Self {
            pixel_format,
            frame_size,
            last_sequence: 0,
            snapshot: SnapshotBuffer::new(storage),
        }
    }

    #[must_use]
    pub fn last_sequence(&self) -> u32 {
        self.last_sequence
    }

    /// Advance the sequence and drop the current image.
    ///
    /// Returns the sequence the next image will carry. Wraps to 0 after
    /// `u32::MAX`.
    pub fn begin_capture(&mut self) -> u32 {
        self.last_sequence = self.last_sequence.wrapping_add(1);
        self.snapshot.invalidate();
        self.last_sequence
    }

    #[must_use]
    pub fn snapshot(&self) -> &SnapshotBuffer<'a> {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut SnapshotBuffer<'a> {
        &mut self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_advances_and_invalidates() {
        let mut storage = [0u8; 4];
        let mut session = Session::new(&mut storage, PixelFormat::Rgb565, FrameSize::Qqvga);
        assert_eq!(session.last_sequence(), 0);

        let seq = session.begin_capture();
        session.snapshot_mut().commit(seq, 4).unwrap();
        assert!(session.snapshot().chunk(1, 0, 4).is_some());

        assert_eq!(session.begin_capture(), 2);
        assert!(session.snapshot().image().is_none());
    }

    #[test]
    fn test_sequence_wraps_after_max() {
        let mut storage = [0u8; 4];
        let mut session = Session::new(&mut storage, PixelFormat::Rgb565, FrameSize::Qqvga);
        session.last_sequence = u32::MAX;

        let seq = session.begin_capture();
        assert_eq!(seq, 0);
        session.snapshot_mut().commit(seq, 4).unwrap();
        assert!(session.snapshot().chunk(0, 0, 4).is_some());
        assert!(session.snapshot().chunk(u32::MAX, 0, 4).is_none());
    }
}
