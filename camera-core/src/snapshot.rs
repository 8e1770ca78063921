//! Storage for the most recent compressed image and chunked reads from it.

use camera_proto::calculate_crc32;

/// Sequence number and length of the image currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageInfo {
    pub sequence: u32,
    pub len: u32,
}

/// A validated byte range of the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'b> {
    pub sequence: u32,
    pub offset: u32,
    pub length: u32,
    /// CRC-32 of exactly `bytes`.
    pub crc32: u32,
    pub bytes: &'b [u8],
}

/// Error returned by [`SnapshotBuffer::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnapshotError {
    /// The reported image length exceeds the storage region.
    TooLarge,
}

/// Holds at most one image in a caller-provided byte region.
///
/// Capturing is a three-step protocol: [`begin`](Self::begin) invalidates the
/// current image and lends out the storage, the sensor fills it, and
/// [`commit`](Self::commit) publishes the new sequence and length. Until the
/// commit succeeds no image is addressable, so a failed capture can never
/// expose a half-written buffer.
pub struct SnapshotBuffer<'a> {
    storage: &'a mut [u8],
    image: Option<ImageInfo>,
}

impl<'a> SnapshotBuffer<'a> {
    /// Wrap a storage region. No image is held initially.
    #[must_use]
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self {
            storage,
            image: None,
        }
    }

    /// Size of the storage region in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The image currently held, if any.
    #[must_use]
    pub fn image(&self) -> Option<ImageInfo> {
        self.image
    }

    /// Drop the current image and return the storage for the next capture.
    pub fn begin(&mut self) -> &mut [u8] {
        self.image = None;
        &mut *self.storage
    }

    /// Drop the current image.
    pub fn invalidate(&mut self) {
        self.image = None;
    }

    /// Publish the first `len` bytes of storage as image `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::TooLarge`] if `len` exceeds the storage; the
    /// buffer then holds no image.
    pub fn commit(&mut self, sequence: u32, len: usize) -> Result<ImageInfo, SnapshotError> {
        if len > self.storage.len() {
            self.image = None;
            return Err(SnapshotError::TooLarge);
        }
        let len = u32::try_from(len).map_err(|_| SnapshotError::TooLarge)?;
        let info = ImageInfo { sequence, len };
        self.image = Some(info);
        Ok(info)
    }

    /// Read `length` bytes at `offset` from image `sequence`.
    ///
    /// Returns `None` unless an image is held, its sequence matches, and
    /// `offset + length` (computed without overflow) does not exceed its
    /// length. A zero-length range at any offset up to the end is valid.
    #[must_use]
    pub fn chunk(&self, sequence: u32, offset: u32, length: u32) -> Option<Chunk<'_>> {
        let image = self.image?;
        if image.sequence != sequence {
            return None;
        }
        let end = offset.checked_add(length)?;
        if end > image.len {
            return None;
        }

        let bytes = self
            .storage
            .get(usize::try_from(offset).ok()?..usize::try_from(end).ok()?)?;
        Some(Chunk {
            sequence,
            offset,
            length,
            crc32: calculate_crc32(bytes),
            bytes,
        })
    }
}
