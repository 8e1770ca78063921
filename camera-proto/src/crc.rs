//! CRC-32 checksum for image chunks.
//!
//! Uses the standard CRC-32 (ISO-HDLC, the zlib/PNG polynomial) with a
//! 256-entry lookup table, so hosts can verify chunks with any stock
//! `crc32()` routine.

use crc::{Crc, CRC_32_ISO_HDLC};

/// CRC-32/ISO-HDLC calculator with 256-entry lookup table.
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Calculate CRC-32 checksum of a byte slice.
#[inline]
#[must_use]
pub fn calculate_crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_empty() {
        assert_eq!(calculate_crc32(&[]), 0x0000_0000);
    }

    #[test]
    fn test_crc32_check_value() {
        // Standard check value for CRC-32/ISO-HDLC
        assert_eq!(calculate_crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_crc32_known_string() {
        assert_eq!(
            calculate_crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }
}
