//! No-std compatible number formatting utilities for protocol serialization.
//!
//! These functions write formatted numbers directly to byte buffers without
//! requiring heap allocation or the standard library.

/// Longest decimal rendering of a `u32` ("4294967295").
pub const MAX_U32_DIGITS: usize = 10;

/// Write a u32 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-10 bytes).
///
/// # Panics
///
/// Panics if `buf` is shorter than the rendered number.
#[inline]
pub fn write_u32(buf: &mut [u8], value: u32) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Write digits in reverse order to temporary buffer
    let mut temp = [0u8; MAX_U32_DIGITS];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
    }

    // Copy digits in correct order
    for i in 0..len {
        buf[i] = temp[len - 1 - i];
    }

    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u32() {
        let mut buf = [0u8; MAX_U32_DIGITS];

        let len = write_u32(&mut buf, 0);
        assert_eq!(&buf[..len], b"0");

        let len = write_u32(&mut buf, 7);
        assert_eq!(&buf[..len], b"7");

        let len = write_u32(&mut buf, 1000);
        assert_eq!(&buf[..len], b"1000");

        let len = write_u32(&mut buf, 3_421_780_262);
        assert_eq!(&buf[..len], b"3421780262");

        let len = write_u32(&mut buf, u32::MAX);
        assert_eq!(&buf[..len], b"4294967295");
    }
}
