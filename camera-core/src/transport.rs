//! Serial transport trait and error types.

use core::future::Future;

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// UART/communication I/O error.
    Io,
    /// Receive FIFO overrun, bytes were lost.
    Overrun,
    /// UART framing or break error.
    Framing,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "transport I/O error"),
            Self::Overrun => write!(f, "receive overrun"),
            Self::Framing => write!(f, "framing error"),
        }
    }
}

/// Async trait for the byte link to the host.
///
/// Implementations wrap a UART (or any order-preserving byte stream). Reads
/// are bounded: the engine polls with a short timeout so the illumination
/// timer and liveness counter keep running while the host is silent.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait Transport {
    /// Read up to `buf.len()` bytes, waiting at most `timeout_ms`.
    ///
    /// Returns the number of bytes read. `Ok(0)` means the timeout elapsed
    /// with nothing received.
    fn read(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>>;

    /// Write every byte of `data`.
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<(), TransportError>>;
}
